//! Error taxonomy for the dispatch pipeline.
//!
//! Collaborators (detector, generator, config loading) report failures with
//! `anyhow`; everything that reaches a caller of [`crate::dispatch::Dispatcher`]
//! is narrowed to one of the kinds below.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid input ({field}): {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid mode '{mode}'. Available modes: {}", supported.join(", "))]
    UnsupportedMode { mode: String, supported: Vec<String> },

    #[error("Invalid direction '{direction}'. Available directions: {}", supported.join(", "))]
    UnsupportedDirection {
        direction: String,
        supported: Vec<String>,
    },

    #[error("Tool mismatch: request targets '{requested}' but was dispatched to '{expected}'")]
    ToolMismatch { expected: String, requested: String },

    #[error("Translator not found: {tool_id}")]
    ToolNotFound { tool_id: String },

    #[error("Translator '{tool_id}' refused at registration: {reason}")]
    InvalidTranslator { tool_id: String, reason: String },

    #[error("Translator registry is empty; '{tool_id}' was resolved before registration")]
    RegistryNotInitialized { tool_id: String },

    #[error("Failed to translate text with '{tool_id}': {reason}")]
    GenerationFailed { tool_id: String, reason: String },
}

impl DispatchError {
    /// Stable snake_case label, used in logs and JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::UnsupportedMode { .. } => "unsupported_mode",
            Self::UnsupportedDirection { .. } => "unsupported_direction",
            Self::ToolMismatch { .. } => "tool_mismatch",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::InvalidTranslator { .. } => "invalid_translator",
            Self::RegistryNotInitialized { .. } => "registry_not_initialized",
            Self::GenerationFailed { .. } => "generation_failed",
        }
    }

    /// Errors caused by the request itself. These are never worth retrying.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::UnsupportedMode { .. }
                | Self::UnsupportedDirection { .. }
                | Self::ToolNotFound { .. }
        )
    }

    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn generation_failed(tool_id: &str, reason: impl Into<String>) -> Self {
        Self::GenerationFailed {
            tool_id: tool_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
