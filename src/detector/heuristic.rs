//! Pattern-scoring language detector.
//!
//! English evidence and evidence for the reference language are scored
//! side by side. One side must outscore the other by half again to win;
//! anything closer is reported as `unknown`.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::{Detection, LanguageDetector};
use crate::translator::{ENGLISH, UNKNOWN_LANGUAGE};
use crate::translators::albhed::ALBHED_LANGUAGE;
use crate::translators::gibberish::{self, GIBBERISH_LANGUAGE};
use crate::translators::morse::MORSE_LANGUAGE;

/// Ratio one score must exceed the other by to be called.
const DOMINANCE: f64 = 1.5;
/// Confidence reported when both sides scored but neither dominated.
const MIXED_CONFIDENCE: f64 = 0.3;
/// No non-empty detection reports less than this.
const CONFIDENCE_FLOOR: f64 = 0.1;
/// Bonus for non-ASCII text, except where the reference script is Han.
const NON_ASCII_BONUS: u32 = 3;
const MORSE_CONFIDENCE: f64 = 0.95;
/// Label for plain text when the reference is Morse code or gibberish.
const TEXT_LABEL: &str = "text";
/// Confidence for a decided letter-frequency or gibberish-marker call.
const CIPHER_CONFIDENCE: f64 = 0.8;
/// Letter-frequency tie margin, as a share of the letters seen.
const FREQUENCY_MARGIN: f64 = 0.1;
/// Letters most frequent in English, and in English run through the Al Bhed cipher.
const COMMON_ENGLISH: &str = "etaoinsh";
const COMMON_ALBHED: &str = "asyuehjo";

struct Pattern {
    regex: Regex,
    weight: u32,
    /// Score every match instead of only the first.
    count_all: bool,
}

impl Pattern {
    fn first(pattern: &str, weight: u32) -> Self {
        Self::build(pattern, weight, false)
    }

    fn each(pattern: &str, weight: u32) -> Self {
        Self::build(pattern, weight, true)
    }

    fn build(pattern: &str, weight: u32, count_all: bool) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            weight,
            count_all,
        }
    }

    fn score(&self, text: &str) -> u32 {
        let hits = if self.count_all {
            self.regex.find_iter(text).count() as u32
        } else {
            u32::from(self.regex.is_match(text))
        };
        hits * self.weight
    }
}

static ENGLISH_PATTERNS: OnceLock<Vec<Pattern>> = OnceLock::new();
static LANGUAGE_PATTERNS: OnceLock<HashMap<&'static str, Vec<Pattern>>> = OnceLock::new();
static MORSE_REGEX: OnceLock<Regex> = OnceLock::new();

fn english_patterns() -> &'static [Pattern] {
    ENGLISH_PATTERNS.get_or_init(|| {
        vec![
            Pattern::first(
                r"\b(the|be|to|of|and|a|in|that|have|it|for|not|on|with|he|as|you|do|at|this|but|his|by|from|they|we|say|her|she|or|an|will|my|one|all|would|there|their|what|so|up|out|if|about|who|get|which|go|me|when|make|can|like|time|no|just|him|know|take|people|into|year|your|good|some|could|them|see|other|than|then|now|look|only|come|its|over|think|also|back|after|use|two|how|our|work|first|well|way|even|new|want|because|any|these|give|day|most|us)\b",
                2,
            ),
            Pattern::first(
                r"\b(hello|hi|hey|goodbye|bye|thanks|thank you|please|yes|no|sorry|excuse me|good morning|good night|how are you|what's up|nice to meet you)\b",
                2,
            ),
            Pattern::first(r"\b(\w+ed|\w+ing|\w+s|'s|'re|'ll|'ve|n't)\b", 1),
            Pattern::first(
                r"^(what|where|when|why|how|who|which|whose|do|does|did|can|could|will|would|should|may|might|must|is|are|was|were|have|has|had)\b.*\?$",
                1,
            ),
        ]
    })
}

fn language_patterns(language: &str) -> &'static [Pattern] {
    let table = LANGUAGE_PATTERNS.get_or_init(|| {
        let mut table = HashMap::new();
        table.insert(
            "chinese",
            vec![
                Pattern::each(r"\p{Han}", 2),
                Pattern::first(
                    r"(你好|谢谢|再见|请|不是|怎么样|你好吗|今天|明天|昨天|我们|他们|这个|那个|什么|为什么|哪里|什么时候|多少)",
                    2,
                ),
                Pattern::first(
                    r"\b(wǒ|hěn|hǎo|xièxiè|zàijiàn|qǐng|shì|búshì|zěnmeyàng|jīntiān|míngtiān|zuótiān|wǒmen|tāmen|zhège|nàge|shénme|duōshǎo)\b",
                    1,
                ),
            ],
        );
        table.insert(
            "japanese",
            vec![
                Pattern::each(r"[\p{Hiragana}\p{Katakana}]", 2),
                Pattern::first(
                    r"(こんにちは|ありがとう|さようなら|おはよう|すみません|はい|いいえ|です|ます)",
                    2,
                ),
                Pattern::each(r"\p{Han}", 1),
            ],
        );
        table.insert(
            "greek",
            vec![
                Pattern::each(r"\p{Greek}", 2),
                Pattern::first(
                    r"\b(και|είναι|το|τα|της|του|για|με|που|δεν|θα|να|αυτό|καλημέρα|ευχαριστώ|γεια|σας|ναι|όχι|χαῖρε|καί|γάρ|δέ)\b",
                    2,
                ),
            ],
        );
        table.insert(
            "albanian",
            vec![
                Pattern::first(
                    r"\b(përshëndetje|mirëmëngjes|mirupafshim|faleminderit|tungjatjeta|po|jo|ju lutem|si je|si jeni|qyteti|mirëdita|mirëmbrëma|natën e mirë|punë|shtëpi|familja|amiq|dashuri|paqja|liri|bashkimi|pavarësia|shqip|shqipëria|tiranë|durrës|vlorë|unë|ti|ai|ajo|ne|ata|ato|ky|kjo|këta|këto)\b",
                    2,
                ),
                Pattern::each(r"[ëç]", 2),
                Pattern::first(
                    r"\b(jam|jeni|është|kemi|keni|ka|kan|bëj|bën|bëjmë|bëni|bëjnë|kam|ke|kanë|flas|flet|flasin|them|thoni|thotë|duke|që|për|me|pa|në|deri|nga|tek|së|të|janë|ishte|ishin)\b",
                    1,
                ),
            ],
        );
        table.insert(
            "polish",
            vec![
                Pattern::first(
                    r"\b(dzień dobry|cześć|dziękuję|proszę|tak|nie|jest|jestem|się|że|być|mam|mamy|który|która|które|jak|gdzie|kiedy|dlaczego|bardzo|dobrze|przepraszam|do widzenia|przez|dla|czy|ale|oraz)\b",
                    2,
                ),
                Pattern::each(r"[ąćęłńóśźż]", 2),
                Pattern::each(r"(rz|sz|cz|dz)", 1),
            ],
        );
        table.insert(
            "esperanto",
            vec![
                Pattern::first(
                    r"\b(saluton|dankon|bonvolu|jes|ne|mi|vi|li|ŝi|ĝi|ni|ili|la|de|da|en|al|sur|sub|inter|kun|sen|anstataŭ|krom|por|dum|antaŭ|post|ĉe|trans|tra|ĝis|je|pri|kaj|sed|aŭ|ke|se|kvankam|ĉar|tial|tiam|kiam|kie|kien|kiel|kiom|kiu|kio|kia|kies|ĉiu|ĉio|ĉia|ĉies|neniu|nenio|nenia|ĉi|tiu|tio|tia|ties|estas|estis|estos|estus|havas|havis|havos|havus|faras|faris|faros|farus|iras|iris|iros|irus|venas|venis|venos|venus|parolas|parolis|parolos|parolus|vidas|vidis|vidos|vidus)\b",
                    2,
                ),
                Pattern::each(r"[ĉĝĥĵŝŭ]", 5),
                Pattern::first(
                    r"\b(bona|bela|nova|granda|malgranda|juna|maljuna|forta|malforta|varma|malvarma|vera|facila|malfacila|laboras|laboris|studas|studis|manĝas|trinkas|dormas)\b",
                    1,
                ),
            ],
        );
        table.insert(
            "swahili",
            vec![
                Pattern::first(
                    r"\b(habari|jambo|asante|sana|karibu|ndiyo|hapana|rafiki|mimi|wewe|yeye|sisi|ninyi|wao|kwa|katika|lakini|pia|sasa|leo|kesho|jana|nzuri|mzuri|watoto|mtoto|chakula|maji|nyumba|kazi|shule|pole|kwaheri|samahani|tafadhali)\b",
                    2,
                ),
                Pattern::each(r"\b(ni|u|a|tu|m|wa)(na|li|ta|me)[a-z]{2,}\b", 1),
            ],
        );
        table.insert(
            "dragon",
            vec![
                Pattern::each(
                    r"\b(fus|ro|dah|dovah|dovahkiin|dov|yol|toor|shul|lok|vah|koor|zul|thu'um|joor|zah|frul|krosis|drem|los|mul|qah|diiv|strun|bah|qo|wuld|nah|kest|tiid|klo|ul|zun|haal|viik|bex|feim|zii|gron|od|viing|laas|yah|nir|krii|lun|aus|rii|vaaz|zol|mid|vur|shaan|kaan|dinok|vahzen|sahrot|laan|mey|nid|fahdon|qostiid|ruth|vaal)\b",
                    2,
                ),
                Pattern::each(r"\b\w*(aa|ii|uu)\w*\b", 1),
            ],
        );
        table
    });
    table.get(language).map(Vec::as_slice).unwrap_or(&[])
}

fn looks_like_morse(text: &str) -> bool {
    MORSE_REGEX
        .get_or_init(|| Regex::new(r"(?i)^(?:[.\-/•▬\s]+|(?:dit|dah|\s|/)+)$").unwrap())
        .is_match(text)
}

/// Call English or Al Bhed by comparing counts of each side's most common letters.
fn classify_albhed(text: &str) -> Detection {
    let letters: Vec<char> = text.chars().filter(|c| c.is_ascii_lowercase()).collect();
    if letters.len() < 3 {
        return Detection::new(UNKNOWN_LANGUAGE, CONFIDENCE_FLOOR);
    }

    let count = |common: &str| letters.iter().filter(|c| common.contains(**c)).count() as f64;
    let english = count(COMMON_ENGLISH);
    let albhed = count(COMMON_ALBHED);

    if (english - albhed).abs() < letters.len() as f64 * FREQUENCY_MARGIN {
        Detection::new(UNKNOWN_LANGUAGE, MIXED_CONFIDENCE)
    } else if english > albhed {
        Detection::new(ENGLISH, CIPHER_CONFIDENCE)
    } else {
        Detection::new(ALBHED_LANGUAGE, CIPHER_CONFIDENCE)
    }
}

/// Score `text` against English and `reference_language`.
pub fn detect_language(text: &str, reference_language: &str) -> Detection {
    let clean = text.trim().to_lowercase();
    if clean.is_empty() {
        return Detection::new(UNKNOWN_LANGUAGE, 0.0);
    }

    if reference_language == MORSE_LANGUAGE {
        return if looks_like_morse(&clean) {
            Detection::new(MORSE_LANGUAGE, MORSE_CONFIDENCE)
        } else {
            Detection::new(TEXT_LABEL, MORSE_CONFIDENCE)
        };
    }
    if reference_language == ALBHED_LANGUAGE {
        return classify_albhed(&clean);
    }
    if reference_language == GIBBERISH_LANGUAGE {
        let label = if gibberish::looks_like_gibberish(&clean) {
            GIBBERISH_LANGUAGE
        } else {
            TEXT_LABEL
        };
        return Detection::new(label, CIPHER_CONFIDENCE);
    }

    let mut english_score: u32 = english_patterns().iter().map(|p| p.score(&clean)).sum();
    let mut target_score: u32 = language_patterns(reference_language)
        .iter()
        .map(|p| p.score(&clean))
        .sum();

    if !clean.is_ascii() {
        if reference_language != "chinese" {
            target_score += NON_ASCII_BONUS;
        }
    } else {
        english_score += 1;
    }

    let english = f64::from(english_score);
    let target = f64::from(target_score);
    let (language, confidence) = if english_score == 0 && target_score == 0 {
        (UNKNOWN_LANGUAGE, 0.0)
    } else if english > target * DOMINANCE {
        (ENGLISH, ((english - target) / english).min(1.0))
    } else if target > english * DOMINANCE {
        (reference_language, ((target - english) / target).min(1.0))
    } else {
        (UNKNOWN_LANGUAGE, MIXED_CONFIDENCE)
    };

    Detection::new(language, confidence.max(CONFIDENCE_FLOOR))
}

/// Detector backed by [`detect_language`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDetector;

#[async_trait]
impl LanguageDetector for HeuristicDetector {
    async fn detect(&self, text: &str, reference_language: &str) -> anyhow::Result<Detection> {
        let detection = detect_language(text, reference_language);
        tracing::debug!(
            reference = reference_language,
            language = %detection.language,
            confidence = detection.confidence,
            "Heuristic language detection"
        );
        Ok(detection)
    }
}
