//! Preview binary - runs one translation through the dispatcher and prints the result
//!
//! Usage:
//!   cargo run --bin preview -- <tool-id> [--mode m] [--direction d] [--detect-only] [--no-detect] <text>
//!   cargo run --bin preview -- --list
//!
//! OPENAI_API_KEY is only needed for translators that call the generator.
//! Rule-based translators (morse-code) and --detect-only work without it.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use translator_dispatch::config::Config;
use translator_dispatch::detector::HeuristicDetector;
use translator_dispatch::generator::{OpenAiGenerator, TextGenerator};
use translator_dispatch::{Dispatcher, TranslationRequest, TranslatorRegistry};

/// Stands in for the generator when no API key is configured.
struct MissingGenerator;

#[async_trait]
impl TextGenerator for MissingGenerator {
    async fn generate(&self, _: &str, _: &str, _: f32) -> Result<String> {
        bail!("OPENAI_API_KEY not set")
    }
}

fn parse_args(args: &[String]) -> Result<TranslationRequest> {
    let mut iter = args.iter();
    let tool_id = iter.next().context("Missing <tool-id>")?;

    let mut mode = None;
    let mut direction = None;
    let mut detect_only = false;
    let mut auto_detect = true;
    let mut words = Vec::new();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mode" => mode = Some(iter.next().context("--mode needs a value")?.clone()),
            "--direction" => {
                direction = Some(iter.next().context("--direction needs a value")?.clone())
            }
            "--detect-only" => detect_only = true,
            "--no-detect" => auto_detect = false,
            _ => words.push(arg.as_str()),
        }
    }

    if words.is_empty() {
        bail!("Missing <text>");
    }

    let mut request = TranslationRequest::new(tool_id.as_str(), words.join(" "))
        .with_auto_detect(auto_detect);
    request.mode = mode;
    request.direction = direction;
    request.detect_only = detect_only;
    Ok(request)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translator_dispatch=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let registry = TranslatorRegistry::with_builtin();

    if args.first().map(String::as_str) == Some("--list") {
        for (category, tools) in registry.grouped_by_category() {
            println!("{}:", category);
            for tool in tools {
                println!("  {:<20} {}", tool.id, tool.display_name);
            }
        }
        return Ok(());
    }

    let request = parse_args(&args)?;

    let generator: Arc<dyn TextGenerator> = match Config::from_env() {
        Ok(config) => Arc::new(OpenAiGenerator::from_config(reqwest::Client::new(), &config)),
        Err(_) => Arc::new(MissingGenerator),
    };
    let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(HeuristicDetector), generator);

    let result = dispatcher.dispatch(&request).await?;

    println!("\n{}", "=".repeat(60));
    println!("{}", serde_json::to_string_pretty(&result)?);
    println!("{}\n", "=".repeat(60));

    Ok(())
}
