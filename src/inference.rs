//! Direction inference for a single request.
//!
//! `NoDirectionYet` → `Detected` → `Resolved`. Detection is optional: a
//! request may go straight from `NoDirectionYet` to `Resolved`. Resolution
//! always lands on a direction the translator supports.

use crate::detector::Detection;
use crate::model::DetectionOutcome;
use crate::translator::Translator;

#[derive(Debug, Clone, PartialEq)]
pub enum DirectionInference {
    /// Detection has not run. `explicit` is the caller's direction, if any.
    NoDirectionYet { explicit: Option<String> },
    /// The detector has answered (`outcome` is `None` if it failed).
    Detected {
        explicit: Option<String>,
        outcome: Option<DetectionOutcome>,
    },
    /// A direction has been chosen.
    Resolved {
        direction: String,
        auto_detected: bool,
    },
}

impl DirectionInference {
    pub fn start(explicit: Option<&str>) -> Self {
        Self::NoDirectionYet {
            explicit: explicit.map(str::to_string),
        }
    }

    /// Record the detector's answer. Has no effect outside `NoDirectionYet`.
    pub fn observe(self, translator: &dyn Translator, detection: Option<Detection>) -> Self {
        match self {
            Self::NoDirectionYet { explicit } => {
                let outcome = detection
                    .map(|d| interpret(translator, d, explicit.as_deref()));
                Self::Detected { explicit, outcome }
            }
            other => other,
        }
    }

    /// Pick the direction. An explicit direction always wins; otherwise an
    /// actionable detection is used, then the translator's default.
    pub fn resolve(self, translator: &dyn Translator) -> Self {
        let default = || translator.descriptor().default_direction.to_string();
        match self {
            Self::NoDirectionYet { explicit } => Self::Resolved {
                direction: explicit.unwrap_or_else(default),
                auto_detected: false,
            },
            Self::Detected {
                explicit: Some(direction),
                ..
            } => Self::Resolved {
                direction,
                auto_detected: false,
            },
            Self::Detected {
                explicit: None,
                outcome,
            } => match outcome.and_then(|o| o.suggested_direction) {
                Some(direction) => Self::Resolved {
                    direction,
                    auto_detected: true,
                },
                None => Self::Resolved {
                    direction: default(),
                    auto_detected: false,
                },
            },
            resolved @ Self::Resolved { .. } => resolved,
        }
    }

    /// Resolve and return `(direction, auto_detected)`.
    pub fn finish(self, translator: &dyn Translator) -> (String, bool) {
        match self.resolve(translator) {
            Self::Resolved {
                direction,
                auto_detected,
            } => (direction, auto_detected),
            _ => (translator.descriptor().default_direction.to_string(), false),
        }
    }

    pub fn outcome(&self) -> Option<&DetectionOutcome> {
        match self {
            Self::Detected { outcome, .. } => outcome.as_ref(),
            _ => None,
        }
    }

    /// The chosen direction and whether it came from detection.
    pub fn resolved(&self) -> Option<(&str, bool)> {
        match self {
            Self::Resolved {
                direction,
                auto_detected,
            } => Some((direction.as_str(), *auto_detected)),
            _ => None,
        }
    }
}

/// Apply the translator's ambiguity policy and direction mapping to a raw detection.
pub fn interpret(
    translator: &dyn Translator,
    detection: Detection,
    explicit: Option<&str>,
) -> DetectionOutcome {
    let ambiguous = translator
        .ambiguity_policy()
        .is_ambiguous(&detection.language, detection.confidence);
    let suggested_direction =
        (!ambiguous).then(|| translator.suggest_direction(&detection.language, explicit));

    tracing::debug!(
        tool_id = translator.id(),
        language = %detection.language,
        confidence = detection.confidence,
        ambiguous,
        suggested = ?suggested_direction,
        "Interpreted detection"
    );

    DetectionOutcome {
        detected_language: detection.language,
        confidence: detection.confidence,
        suggested_direction,
        ambiguous,
    }
}
