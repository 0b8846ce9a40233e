//! Al Bhed letter-substitution cipher.
//!
//! Every English letter maps to one Al Bhed letter; case is preserved and
//! anything that is not an ASCII letter passes through unchanged.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::{Category, DetectionOutcome, ModeSpec, TranslatorDescriptor};
use crate::translator::{Engine, RuleSet, Translator, ENGLISH};

/// Detector label for Al Bhed text.
pub const ALBHED_LANGUAGE: &str = "albhed";

pub const TO_ALBHED: &str = "toAlBhed";
pub const TO_ENGLISH: &str = "toEnglish";

/// English → Al Bhed, in English alphabetical order.
const CIPHER: [char; 26] = [
    'y', 'p', 'l', 't', 'a', 'v', 'r', 'o', 'e', 'b', 'g', 'm', 'n', 'h', 'u', 'c', 'd', 'i', 'j',
    's', 'v', 'k', 'w', 'z', 'q', 'x',
];

fn encode_table() -> &'static HashMap<char, char> {
    static TABLE: OnceLock<HashMap<char, char>> = OnceLock::new();
    TABLE.get_or_init(|| ('a'..='z').zip(CIPHER).collect())
}

/// Al Bhed → English. `v` is shared by F and U; the later letter wins.
fn decode_table() -> &'static HashMap<char, char> {
    static TABLE: OnceLock<HashMap<char, char>> = OnceLock::new();
    TABLE.get_or_init(|| CIPHER.into_iter().zip('a'..='z').collect())
}

fn substitute(text: &str, table: &HashMap<char, char>) -> String {
    text.chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            match table.get(&lower) {
                Some(&mapped) if c.is_ascii_uppercase() => mapped.to_ascii_uppercase(),
                Some(&mapped) => mapped,
                None => c,
            }
        })
        .collect()
}

pub fn encode(text: &str) -> String {
    substitute(text, encode_table())
}

pub fn decode(text: &str) -> String {
    substitute(text, decode_table())
}

const CIPHER_MODE: ModeSpec = ModeSpec {
    id: "cipher",
    name: "Cipher",
    prompt: "Official Al Bhed letter substitution",
    description: "Letter-for-letter substitution as used in Final Fantasy X; numbers and punctuation are kept",
};

pub struct AlBhedTranslator {
    descriptor: TranslatorDescriptor,
}

impl AlBhedTranslator {
    pub fn new() -> Self {
        Self {
            descriptor: TranslatorDescriptor {
                id: "al-bhed",
                display_name: "Al Bhed Translator",
                category: Category::Fictional,
                supported_directions: vec![TO_ALBHED, TO_ENGLISH],
                supported_modes: vec![CIPHER_MODE],
                default_mode: "cipher",
                default_direction: TO_ALBHED,
                max_input_length: 10000,
                temperature: 0.0,
                requires_ai: false,
            },
        }
    }

    fn direction_label(direction: &str) -> &'static str {
        if direction == TO_ENGLISH {
            "Al Bhed → English"
        } else {
            "English → Al Bhed"
        }
    }
}

impl Default for AlBhedTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for AlBhedTranslator {
    fn apply(&self, text: &str, direction: &str, _mode: &str) -> String {
        if direction == TO_ENGLISH {
            decode(text)
        } else {
            encode(text)
        }
    }
}

impl Translator for AlBhedTranslator {
    fn descriptor(&self) -> &TranslatorDescriptor {
        &self.descriptor
    }

    fn build_system_prompt(&self, direction: &str, _mode: &str) -> String {
        format!(
            "{}\n\n## Task\n{}\n- Substitute letter for letter, keeping case\n- Return ONLY the converted text",
            CIPHER_MODE.prompt,
            Self::direction_label(direction)
        )
    }

    fn reference_language(&self) -> &'static str {
        ALBHED_LANGUAGE
    }

    fn infer_direction(&self, detected_language: &str) -> &'static str {
        if detected_language == ALBHED_LANGUAGE {
            TO_ENGLISH
        } else {
            TO_ALBHED
        }
    }

    fn format_language_name(&self, label: &str) -> String {
        match label {
            ALBHED_LANGUAGE => "Al Bhed".to_string(),
            ENGLISH => "English".to_string(),
            _ => "Unknown".to_string(),
        }
    }

    fn describe_direction(&self, detected_language: &str, explicit: Option<&str>) -> String {
        let direction = explicit.unwrap_or_else(|| self.infer_direction(detected_language));
        Self::direction_label(direction).to_string()
    }

    fn explain_detection(&self, outcome: Option<&DetectionOutcome>) -> String {
        let Some(outcome) = outcome else {
            return "Language detection failed".to_string();
        };
        let percent = outcome.confidence_percent();
        match outcome.detected_language.as_str() {
            ALBHED_LANGUAGE => format!(
                "Detected Al Bhed input with {}% confidence, will translate to English",
                percent
            ),
            ENGLISH => format!(
                "Detected English input with {}% confidence, will translate to Al Bhed",
                percent
            ),
            _ => format!(
                "Language detection uncertain ({}% confidence), will translate to Al Bhed",
                percent
            ),
        }
    }

    fn explain_translation(
        &self,
        outcome: Option<&DetectionOutcome>,
        explicit: Option<&str>,
    ) -> String {
        if let Some(direction) = explicit {
            return format!("Manual translation: {}", Self::direction_label(direction));
        }
        match outcome {
            None => "Translation completed".to_string(),
            Some(o) if o.detected_language == ALBHED_LANGUAGE => {
                "Auto-detected Al Bhed input, translated to English".to_string()
            }
            Some(_) => "Translated English to Al Bhed".to_string(),
        }
    }

    fn engine(&self) -> Engine<'_> {
        Engine::RuleBased(self)
    }
}
