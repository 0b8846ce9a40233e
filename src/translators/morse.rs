//! Rule-based Morse code translator. Never calls the text generator.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::{Category, DetectionOutcome, ModeSpec, TranslatorDescriptor};
use crate::translator::{Engine, RuleSet, Translator};

/// Detector label for input that looks like Morse code.
pub const MORSE_LANGUAGE: &str = "morse";

pub const TO_MORSE: &str = "toMorse";
pub const TO_TEXT: &str = "toText";

const WORD_SEPARATOR: &str = "/";
const UNKNOWN_CODE: char = '?';

/// International Morse code, letters, digits and punctuation.
const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

fn encode_table() -> &'static HashMap<char, &'static str> {
    static TABLE: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| MORSE_TABLE.iter().copied().collect())
}

fn decode_table() -> &'static HashMap<&'static str, char> {
    static TABLE: OnceLock<HashMap<&'static str, char>> = OnceLock::new();
    TABLE.get_or_init(|| MORSE_TABLE.iter().map(|&(c, code)| (code, c)).collect())
}

const STANDARD: ModeSpec = ModeSpec {
    id: "standard",
    name: "Standard Morse",
    prompt: "Standard International Morse Code translation",
    description: "Standard Morse Code using dots (.) and dashes (-), with spaces between letters and / for word separation",
};

const SOUND: ModeSpec = ModeSpec {
    id: "sound",
    name: "Sound Representation",
    prompt: "Morse Code with sound mnemonics",
    description: "Morse Code with \"dit\" for dots and \"dah\" for dashes, representing the actual sound",
};

const VISUAL: ModeSpec = ModeSpec {
    id: "visual",
    name: "Visual Representation",
    prompt: "Morse Code with visual symbols",
    description: "Morse Code using bullet points (•) and dashes (▬) for better visual distinction",
};

/// Encode text as International Morse code in the given rendering mode.
///
/// Letters are separated by a single space and words by `/`. Characters
/// without a Morse code are dropped.
pub fn encode(text: &str, mode: &str) -> String {
    let table = encode_table();
    let mut symbols: Vec<&str> = Vec::new();

    for c in text.chars() {
        if c.is_whitespace() {
            if symbols.last().is_some_and(|s| *s != WORD_SEPARATOR) {
                symbols.push(WORD_SEPARATOR);
            }
        } else if let Some(code) = table.get(&c.to_ascii_uppercase()) {
            symbols.push(*code);
        }
    }
    if symbols.last() == Some(&WORD_SEPARATOR) {
        symbols.pop();
    }

    let standard = symbols.join(" ");
    match mode {
        "sound" => standard
            .replace('.', "dit")
            .replace('-', "dah")
            .replace(WORD_SEPARATOR, " / "),
        "visual" => standard.replace('.', "•").replace('-', "▬"),
        _ => standard,
    }
}

/// Decode Morse code back to uppercase text. Unknown codes become `?`.
pub fn decode(morse: &str, mode: &str) -> String {
    let normalized = match mode {
        "sound" => morse.to_lowercase().replace("dit", ".").replace("dah", "-"),
        "visual" => morse.replace('•', ".").replace('▬', "-"),
        _ => morse.to_string(),
    };

    let table = decode_table();
    normalized
        .split(WORD_SEPARATOR)
        .map(|word| {
            word.split_whitespace()
                .map(|code| table.get(code).copied().unwrap_or(UNKNOWN_CODE))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct MorseCodeTranslator {
    descriptor: TranslatorDescriptor,
}

impl MorseCodeTranslator {
    pub fn new() -> Self {
        Self {
            descriptor: TranslatorDescriptor {
                id: "morse-code",
                display_name: "Morse Code Translator",
                category: Category::Language,
                supported_directions: vec![TO_MORSE, TO_TEXT],
                supported_modes: vec![STANDARD, SOUND, VISUAL],
                default_mode: "standard",
                default_direction: TO_MORSE,
                max_input_length: 10000,
                temperature: 0.0,
                requires_ai: false,
            },
        }
    }

    fn direction_label(direction: &str) -> &'static str {
        if direction == TO_TEXT {
            "Morse Code → Text"
        } else {
            "Text → Morse Code"
        }
    }
}

impl Default for MorseCodeTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for MorseCodeTranslator {
    fn apply(&self, text: &str, direction: &str, mode: &str) -> String {
        if direction == TO_TEXT {
            decode(text, mode)
        } else {
            encode(text, mode)
        }
    }
}

impl Translator for MorseCodeTranslator {
    fn descriptor(&self) -> &TranslatorDescriptor {
        &self.descriptor
    }

    fn build_system_prompt(&self, direction: &str, mode: &str) -> String {
        let rendering = self
            .descriptor
            .mode(mode)
            .map(|m| m.prompt)
            .unwrap_or(STANDARD.prompt);
        let task = if direction == TO_TEXT {
            "Convert Morse Code to text\n- Decode International Morse Code\n- Return ONLY the decoded text"
        } else {
            "Convert text to Morse Code\n- Use International Morse Code standard\n- Return ONLY the Morse Code translation"
        };
        format!("{rendering}\n\n## Task\n{task}")
    }

    fn reference_language(&self) -> &'static str {
        MORSE_LANGUAGE
    }

    fn infer_direction(&self, detected_language: &str) -> &'static str {
        if detected_language == MORSE_LANGUAGE {
            TO_TEXT
        } else {
            TO_MORSE
        }
    }

    fn format_language_name(&self, label: &str) -> String {
        if label == MORSE_LANGUAGE {
            "Morse Code".to_string()
        } else {
            "Text".to_string()
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
        if outcome.detected_language == MORSE_LANGUAGE {
            format!(
                "Detected Morse Code input with {}% confidence, will decode to text",
                outcome.confidence_percent()
            )
        } else {
            format!(
                "Detected text input with {}% confidence, will encode to Morse Code",
                outcome.confidence_percent()
            )
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
            Some(o) if o.detected_language == MORSE_LANGUAGE => {
                "Auto-detected Morse Code input, decoded to text".to_string()
            }
            Some(_) => "Auto-detected text input, encoded to Morse Code".to_string(),
        }
    }

    fn engine(&self) -> Engine<'_> {
        Engine::RuleBased(self)
    }
}
