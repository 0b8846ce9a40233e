use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TextGenerator;
use crate::config::Config;
use crate::retry::RetryPolicy;

/// Reasoning models need headroom for hidden reasoning tokens.
const REASONING_MAX_TOKENS: u32 = 16000;

/// OpenAI Chat Completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Non-success HTTP status from the API.
#[derive(Debug, Error)]
#[error("OpenAI API error ({status}): {body}")]
struct ApiStatusError {
    status: u16,
    body: String,
}

/// Check if a model is a reasoning model that doesn't support temperature
fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("gpt-5")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
}

/// Retry 429 and 5xx responses plus transport failures.
/// Other 4xx client errors are not retried.
fn is_retryable_error(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<ApiStatusError>() {
        Some(api) => api.status == 429 || api.status >= 500,
        None => true,
    }
}

/// [`TextGenerator`] backed by the OpenAI Chat Completions API.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl OpenAiGenerator {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            api_url: api_url.into(),
            max_tokens: 2048,
            retry: RetryPolicy::generation(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            &config.openai_api_key,
            &config.openai_model,
            &config.openai_api_url,
        )
        .with_max_tokens(config.generation_max_tokens)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, system_prompt: &str, user_text: &str, temperature: f32) -> ChatRequest {
        let is_reasoning = is_reasoning_model(&self.model);

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_text.to_string(),
                },
            ],
            max_completion_tokens: if is_reasoning {
                REASONING_MAX_TOKENS
            } else {
                self.max_tokens
            },
            // Reasoning models don't support temperature - use reasoning_effort instead
            temperature: if is_reasoning { None } else { Some(temperature) },
            reasoning_effort: is_reasoning.then(|| "low".to_string()),
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send generation request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ApiStatusError { status, body }.into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI generation response")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("OpenAI generation response contained no choices")
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> Result<String> {
        let request = self.build_request(system_prompt, user_text, temperature);
        self.retry
            .run_if(
                &format!("Generation with {}", self.model),
                || self.send(&request),
                is_retryable_error,
            )
            .await
    }
}
