//! The contract every translator variant satisfies.
//!
//! A translator is configuration plus a handful of pure labelling callbacks.
//! It never performs I/O itself: the [`crate::dispatch::Dispatcher`] owns
//! detection and generation, and asks the translator how to interpret the
//! results. How text is actually transformed is chosen through [`Engine`].

use crate::model::{DetectionOutcome, TranslatorDescriptor};

/// Label the detector uses when it cannot tell which language it saw.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Label the detector uses for English input.
pub const ENGLISH: &str = "english";

/// Deterministic text transformation used by rule-based translators.
pub trait RuleSet: Send + Sync {
    /// Transform `text` for an already-validated direction and mode.
    fn apply(&self, text: &str, direction: &str, mode: &str) -> String;
}

/// How a translator turns input text into output text.
pub enum Engine<'a> {
    /// Build a system prompt and delegate to the text generator.
    Generative,
    /// Run a local table-driven transformation; the generator is never called.
    RuleBased(&'a dyn RuleSet),
}

impl Engine<'_> {
    pub fn is_generative(&self) -> bool {
        matches!(self, Engine::Generative)
    }
}

/// Whether a weak detection may still choose the direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmbiguityPolicy {
    /// Act on every detection, falling back to the translator default for
    /// unrecognised labels.
    SilentDefault,
    /// Treat `unknown` labels and confidences below the threshold as
    /// ambiguous: report them, and keep the default direction.
    ReportBelow(f64),
}

impl AmbiguityPolicy {
    pub fn is_ambiguous(&self, detected_language: &str, confidence: f64) -> bool {
        match self {
            AmbiguityPolicy::SilentDefault => false,
            AmbiguityPolicy::ReportBelow(threshold) => {
                detected_language == UNKNOWN_LANGUAGE || confidence < *threshold
            }
        }
    }
}

pub trait Translator: Send + Sync {
    fn descriptor(&self) -> &TranslatorDescriptor;

    fn id(&self) -> &'static str {
        self.descriptor().id
    }

    fn supported_directions(&self) -> &[&'static str] {
        &self.descriptor().supported_directions
    }

    fn is_valid_direction(&self, direction: &str) -> bool {
        self.descriptor().supports_direction(direction)
    }

    /// Pure prompt construction for a validated direction and mode.
    fn build_system_prompt(&self, direction: &str, mode: &str) -> String;

    /// Label handed to the language detector as the "home" language.
    fn reference_language(&self) -> &'static str;

    /// Map a detected label to a direction. Must be total: every label,
    /// including [`UNKNOWN_LANGUAGE`], yields a supported direction.
    fn infer_direction(&self, detected_language: &str) -> &'static str;

    /// An explicit caller direction always wins over detection.
    fn suggest_direction(&self, detected_language: &str, explicit: Option<&str>) -> String {
        match explicit {
            Some(direction) => direction.to_string(),
            None => self.infer_direction(detected_language).to_string(),
        }
    }

    fn format_language_name(&self, label: &str) -> String;

    fn describe_direction(&self, detected_language: &str, explicit: Option<&str>) -> String;

    fn explain_detection(&self, outcome: Option<&DetectionOutcome>) -> String;

    fn explain_translation(
        &self,
        outcome: Option<&DetectionOutcome>,
        explicit: Option<&str>,
    ) -> String;

    fn ambiguity_policy(&self) -> AmbiguityPolicy {
        AmbiguityPolicy::SilentDefault
    }

    fn engine(&self) -> Engine<'_> {
        Engine::Generative
    }
}
