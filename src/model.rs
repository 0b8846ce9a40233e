//! Request, result and catalog types shared by every translator.
//!
//! All JSON field names are camelCase so route handlers can pass these types
//! straight through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog grouping of a translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Real-world language pairs
    Language,
    /// Invented languages and ciphers from fiction
    Fictional,
    /// Register and style rewrites
    Stylistic,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Language, Category::Fictional, Category::Stylistic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Language => "language",
            Category::Fictional => "fictional",
            Category::Stylistic => "stylistic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "language" => Ok(Category::Language),
            "fictional" => Ok(Category::Fictional),
            "stylistic" => Ok(Category::Stylistic),
            other => Err(format!("Unknown category: '{}'", other)),
        }
    }
}

/// A tone/register variant with its own prompt instructions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSpec {
    pub id: &'static str,
    pub name: &'static str,
    /// Tone and register instructions merged into the system prompt
    #[serde(skip_serializing)]
    pub prompt: &'static str,
    pub description: &'static str,
}

/// Immutable catalog entry describing one translator variant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub supported_directions: Vec<&'static str>,
    pub supported_modes: Vec<ModeSpec>,
    pub default_mode: &'static str,
    pub default_direction: &'static str,
    /// Maximum input length in characters (Unicode scalar values)
    pub max_input_length: usize,
    pub temperature: f32,
    /// False for rule-based variants that never call the text generator.
    /// Must agree with the translator's engine; registration refuses a mismatch.
    pub requires_ai: bool,
}

impl TranslatorDescriptor {
    pub fn mode(&self, id: &str) -> Option<&ModeSpec> {
        self.supported_modes.iter().find(|m| m.id == id)
    }

    pub fn supports_direction(&self, direction: &str) -> bool {
        self.supported_directions.iter().any(|d| *d == direction)
    }

    pub fn mode_ids(&self) -> Vec<String> {
        self.supported_modes.iter().map(|m| m.id.to_string()).collect()
    }

    pub fn direction_ids(&self) -> Vec<String> {
        self.supported_directions
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    /// Check the structural invariants every descriptor must satisfy.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.supported_directions.is_empty() {
            return Err(format!("{}: no supported directions", self.id));
        }
        if self.supported_modes.is_empty() {
            return Err(format!("{}: no supported modes", self.id));
        }
        if !self.supports_direction(self.default_direction) {
            return Err(format!(
                "{}: default direction '{}' is not supported",
                self.id, self.default_direction
            ));
        }
        if self.mode(self.default_mode).is_none() {
            return Err(format!(
                "{}: default mode '{}' is not supported",
                self.id, self.default_mode
            ));
        }
        if self.max_input_length == 0 {
            return Err(format!("{}: max input length must be positive", self.id));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Input DTO for a single translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    #[serde(alias = "tool")]
    pub tool_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default = "default_true")]
    pub auto_detect: bool,
    #[serde(default)]
    pub detect_only: bool,
}

impl TranslationRequest {
    pub fn new(tool_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_id: tool_id.into(),
            mode: None,
            direction: None,
            auto_detect: true,
            detect_only: false,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn with_auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect = auto_detect;
        self
    }

    pub fn detect_only(mut self) -> Self {
        self.detect_only = true;
        self
    }
}

/// What the language detector saw, and what the translator made of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub detected_language: String,
    pub confidence: f64,
    pub suggested_direction: Option<String>,
    /// Set when the translator's policy judged the detection too weak to act on
    #[serde(default)]
    pub ambiguous: bool,
}

impl DetectionOutcome {
    /// Confidence as an integer percentage in 0..=100.
    pub fn confidence_percent(&self) -> u8 {
        confidence_percent(self.confidence)
    }
}

pub(crate) fn confidence_percent(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Human-readable summary shown next to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub detected_language: String,
    pub direction: String,
    pub confidence: u8,
    pub explanation: String,
}

/// Output DTO for a single translation (or detection-only pass).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub original_text: String,
    pub tool_id: String,
    pub mode: String,
    pub direction: String,
    pub detection: Option<DetectionOutcome>,
    pub auto_detected: bool,
    pub language_info: LanguageInfo,
}
