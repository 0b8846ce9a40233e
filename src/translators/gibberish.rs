//! Playful gibberish: syllables spliced into words, stretched vowels, or
//! scrambled word middles. Encoding is deterministic; decoding is a
//! best-effort strip of the inserted material.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{Category, DetectionOutcome, ModeSpec, TranslatorDescriptor};
use crate::translator::{Engine, RuleSet, Translator};

/// Detector label for gibberish text.
pub const GIBBERISH_LANGUAGE: &str = "gibberish";
/// Detector label for ordinary text when the reference is gibberish.
pub const TEXT_LANGUAGE: &str = "text";

pub const TO_GIBBERISH: &str = "toGibberish";
pub const TO_TEXT: &str = "toText";

/// Inserted syllables, used in rotation.
const SYLLABLES: [&str; 13] = [
    "ib", "ob", "ub", "ag", "ig", "og", "ug", "idig", "odig", "udig", "ithag", "othag", "uthag",
];

const STRETCHED_VOWELS: [(char, &str); 10] = [
    ('a', "ah"),
    ('e', "eh"),
    ('i', "ee"),
    ('o', "oh"),
    ('u', "uh"),
    ('A', "Ah"),
    ('E', "Eh"),
    ('I', "Ee"),
    ('O', "Oh"),
    ('U', "Uh"),
];

/// Share of words carrying gibberish markers above which text counts as gibberish.
const GIBBERISH_DENSITY: f64 = 0.2;

fn syllable_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // Longest alternatives first so "idig" is not stripped as "ig"
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)ithag|othag|uthag|idig|odig|udig|ib|ob|ub|ag|ig|og|ug").unwrap()
    })
}

fn stretched_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[AEOU]h|[aeou]h|[Ee]e").unwrap())
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn stretch(c: char) -> Option<&'static str> {
    STRETCHED_VOWELS
        .iter()
        .find(|(vowel, _)| *vowel == c)
        .map(|(_, stretched)| *stretched)
}

struct Syllables(usize);

impl Syllables {
    fn next(&mut self) -> &'static str {
        let syllable = SYLLABLES[self.0 % SYLLABLES.len()];
        self.0 += 1;
        syllable
    }
}

/// Insert a syllable after every vowel that is followed by another letter.
fn splice(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut syllables = Syllables(0);
    let mut out = String::with_capacity(text.len() * 2);

    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        let next_is_letter = chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic());
        if is_vowel(c) && next_is_letter {
            out.push_str(syllables.next());
        }
    }
    out
}

fn stretch_vowels(text: &str) -> String {
    text.chars()
        .map(|c| stretch(c).map(str::to_string).unwrap_or_else(|| c.to_string()))
        .collect()
}

/// Reverse the middle of each word and tuck a syllable before its last letter.
/// Words of three letters or fewer just get a syllable appended.
fn scramble(text: &str) -> String {
    let mut syllables = Syllables(0);
    let mut out = String::with_capacity(text.len() * 2);
    let mut word = String::new();

    let mut flush = |word: &mut String, out: &mut String| {
        let letters: Vec<char> = word.chars().collect();
        match letters.len() {
            0 => {}
            1..=3 => {
                out.push_str(word.as_str());
                out.push_str(syllables.next());
            }
            n => {
                out.push(letters[0]);
                out.extend(letters[1..n - 1].iter().rev());
                out.push_str(syllables.next());
                out.push(letters[n - 1]);
            }
        }
        word.clear();
    };

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

pub fn encode(text: &str, mode: &str) -> String {
    match mode {
        "vowels" => stretch_vowels(text),
        "reverse" => scramble(text),
        _ => splice(text),
    }
}

/// Strip inserted syllables and shrink stretched vowels.
pub fn decode(text: &str) -> String {
    let stripped = syllable_regex().replace_all(text, "");
    stretched_regex()
        .replace_all(&stripped, |caps: &regex::Captures| {
            let found = &caps[0];
            STRETCHED_VOWELS
                .iter()
                .find(|(_, stretched)| *stretched == found)
                .map(|(vowel, _)| vowel.to_string())
                .unwrap_or_else(|| found.to_string())
        })
        .into_owned()
}

/// Gibberish markers per whitespace-separated word.
pub fn marker_density(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }
    let markers = syllable_regex().find_iter(text).count() + stretched_regex().find_iter(text).count();
    markers as f64 / words as f64
}

pub fn looks_like_gibberish(text: &str) -> bool {
    marker_density(text) > GIBBERISH_DENSITY
}

const SYLLABLE: ModeSpec = ModeSpec {
    id: "syllable",
    name: "Syllable Insertion",
    prompt: "Insert gibberish syllables after vowels",
    description: "Splices syllables like \"ib\" and \"idig\" into words after each vowel",
};

const VOWELS: ModeSpec = ModeSpec {
    id: "vowels",
    name: "Stretched Vowels",
    prompt: "Stretch every vowel into a drawn-out sound",
    description: "Turns a, e, i, o, u into ah, eh, ee, oh, uh",
};

const REVERSE: ModeSpec = ModeSpec {
    id: "reverse",
    name: "Reverse & Shuffle",
    prompt: "Reverse the middle of each word and add a syllable",
    description: "Keeps the first and last letter of each word and scrambles the rest",
};

pub struct GibberishTranslator {
    descriptor: TranslatorDescriptor,
}

impl GibberishTranslator {
    pub fn new() -> Self {
        Self {
            descriptor: TranslatorDescriptor {
                id: "gibberish",
                display_name: "Gibberish Translator",
                category: Category::Stylistic,
                supported_directions: vec![TO_GIBBERISH, TO_TEXT],
                supported_modes: vec![SYLLABLE, VOWELS, REVERSE],
                default_mode: "syllable",
                default_direction: TO_GIBBERISH,
                max_input_length: 5000,
                temperature: 0.0,
                requires_ai: false,
            },
        }
    }

    fn direction_label(direction: &str) -> &'static str {
        if direction == TO_TEXT {
            "Gibberish → Text"
        } else {
            "Text → Gibberish"
        }
    }
}

impl Default for GibberishTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet for GibberishTranslator {
    fn apply(&self, text: &str, direction: &str, mode: &str) -> String {
        if direction == TO_TEXT {
            decode(text)
        } else {
            encode(text, mode)
        }
    }
}

impl Translator for GibberishTranslator {
    fn descriptor(&self) -> &TranslatorDescriptor {
        &self.descriptor
    }

    fn build_system_prompt(&self, direction: &str, mode: &str) -> String {
        let style = self
            .descriptor
            .mode(mode)
            .map(|m| m.prompt)
            .unwrap_or(SYLLABLE.prompt);
        format!(
            "{style}\n\n## Task\n{}\n- Return ONLY the converted text",
            Self::direction_label(direction)
        )
    }

    fn reference_language(&self) -> &'static str {
        GIBBERISH_LANGUAGE
    }

    fn infer_direction(&self, detected_language: &str) -> &'static str {
        if detected_language == GIBBERISH_LANGUAGE {
            TO_TEXT
        } else {
            TO_GIBBERISH
        }
    }

    fn format_language_name(&self, label: &str) -> String {
        if label == GIBBERISH_LANGUAGE {
            "Gibberish".to_string()
        } else {
            "Text".to_string()
        }
    }

    fn describe_direction(&self, detected_language: &str, explicit: Option<&str>) -> String {
        let direction = explicit.unwrap_or_else(|| self.infer_direction(detected_language));
        Self::direction_label(direction).to_string()
    }

    fn explain_detection(&self, outcome: Option<&DetectionOutcome>) -> String {
        match outcome {
            None => "Language detection failed".to_string(),
            Some(o) if o.detected_language == GIBBERISH_LANGUAGE => format!(
                "Detected gibberish with {}% confidence, will decode to text",
                o.confidence_percent()
            ),
            Some(o) => format!(
                "Detected plain text with {}% confidence, will convert to gibberish",
                o.confidence_percent()
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
            Some(o) if o.detected_language == GIBBERISH_LANGUAGE => {
                "Auto-detected gibberish, decoded to text".to_string()
            }
            Some(_) => "Auto-detected plain text, converted to gibberish".to_string(),
        }
    }

    fn engine(&self) -> Engine<'_> {
        Engine::RuleBased(self)
    }
}
