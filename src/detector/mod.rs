//! Language detection collaborator.
//!
//! The dispatcher only ever talks to [`LanguageDetector`]; the bundled
//! [`HeuristicDetector`] is one implementation and tests plug in stubs.

mod heuristic;

pub use heuristic::HeuristicDetector;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw detector output: a language label and a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub language: String,
    pub confidence: f64,
}

impl Detection {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            language: language.into(),
            confidence,
        }
    }
}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Guess whether `text` is written in `reference_language`, English, or
    /// something else (`"unknown"`).
    async fn detect(&self, text: &str, reference_language: &str) -> anyhow::Result<Detection>;
}
