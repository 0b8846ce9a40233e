//! Built-in AI-delegated translators.

use crate::model::{Category, ModeSpec};
use crate::translator::AmbiguityPolicy;
use crate::translators::modes::{CASUAL, FORMAL, GENERAL, IDIOMS, LEGAL, LITERARY, TECHNICAL};
use crate::translators::pair::{LanguagePairTranslator, PairConfig};

/// Detections weaker than this are reported instead of acted on, for the
/// pairs whose scripts the heuristic detector cannot tell apart from English.
const LATIN_SCRIPT_THRESHOLD: f64 = 0.3;

pub fn chinese_english() -> LanguagePairTranslator {
    PairConfig {
        id: "chinese-english",
        display_name: "Chinese-English Translator",
        category: Category::Language,
        language: "chinese",
        language_name: "Chinese",
        into_english: "zh-to-en",
        from_english: Some("en-to-zh"),
        default_direction: "zh-to-en",
        modes: vec![GENERAL, TECHNICAL, LEGAL, LITERARY, IDIOMS],
        into_english_notes: r#"- Explain chengyu (成语) only when no English equivalent exists
- Resolve omitted subjects from context
- Render measure words naturally instead of literally"#,
        from_english_notes: r#"- Use Simplified Chinese characters
- Use full-width Chinese punctuation (，。！？)
- Prefer idiomatic Chinese word order over English sentence structure"#,
        policy: AmbiguityPolicy::SilentDefault,
    }
    .build()
}

pub fn japanese_english() -> LanguagePairTranslator {
    PairConfig {
        id: "japanese-english",
        display_name: "Japanese-English Translator",
        category: Category::Language,
        language: "japanese",
        language_name: "Japanese",
        into_english: "ja-to-en",
        from_english: Some("en-to-ja"),
        default_direction: "ja-to-en",
        modes: vec![GENERAL, FORMAL, CASUAL, LITERARY, TECHNICAL],
        into_english_notes: r#"- Handle kanji, hiragana, and katakana appropriately
- Preserve cultural context and nuances
- Handle Japanese-specific expressions and onomatopoeia"#,
        from_english_notes: r#"- Use appropriate kanji, hiragana, and katakana
- Use katakana for technical loanwords
- Match keigo (敬語) to the requested register
- Follow Japanese subject-object-verb sentence structure"#,
        policy: AmbiguityPolicy::SilentDefault,
    }
    .build()
}

pub fn albanian_english() -> LanguagePairTranslator {
    PairConfig {
        id: "albanian-english",
        display_name: "Albanian-English Translator",
        category: Category::Language,
        language: "albanian",
        language_name: "Albanian",
        into_english: "albanian-to-en",
        from_english: Some("en-to-albanian"),
        default_direction: "albanian-to-en",
        modes: vec![GENERAL, FORMAL, CASUAL, LITERARY],
        into_english_notes: r#"- Capture Albanian cultural nuances
- Handle postposed definite articles and other Albanian structures
- Preserve idiomatic expressions"#,
        from_english_notes: r#"- Use proper Albanian grammar and syntax
- Handle the Albanian case system and verb conjugations
- Use the letters ë and ç where required"#,
        policy: AmbiguityPolicy::ReportBelow(LATIN_SCRIPT_THRESHOLD),
    }
    .build()
}

pub fn greek_english() -> LanguagePairTranslator {
    PairConfig {
        id: "greek-english",
        display_name: "Greek-English Translator",
        category: Category::Language,
        language: "greek",
        language_name: "Greek",
        into_english: "greek-to-en",
        from_english: Some("en-to-greek"),
        default_direction: "en-to-greek",
        modes: vec![GENERAL, FORMAL, CASUAL, LITERARY],
        into_english_notes: r#"- Read polytonic and monotonic Greek alike
- Recognise classical and mythological references"#,
        from_english_notes: r#"- Write modern monotonic Greek with correct accent marks
- Use the Greek question mark (;) and Greek alphabet throughout"#,
        policy: AmbiguityPolicy::SilentDefault,
    }
    .build()
}

pub fn english_polish() -> LanguagePairTranslator {
    PairConfig {
        id: "english-polish",
        display_name: "English-Polish Translator",
        category: Category::Language,
        language: "polish",
        language_name: "Polish",
        into_english: "pl-to-en",
        from_english: Some("en-to-pl"),
        default_direction: "en-to-pl",
        modes: vec![GENERAL, FORMAL, CASUAL],
        into_english_notes: r#"- Resolve Polish cases and aspect into natural English tense
- Preserve diminutives as tone rather than literal size"#,
        from_english_notes: r#"- Handle Polish grammar and its seven cases properly
- Use Polish diacritics (ą, ć, ę, ł, ń, ó, ś, ź, ż)
- Use Pan/Pani forms of address in formal text"#,
        policy: AmbiguityPolicy::ReportBelow(LATIN_SCRIPT_THRESHOLD),
    }
    .build()
}

pub fn esperanto() -> LanguagePairTranslator {
    PairConfig {
        id: "esperanto",
        display_name: "Esperanto Translator",
        category: Category::Language,
        language: "esperanto",
        language_name: "Esperanto",
        into_english: "toEnglish",
        from_english: Some("toEsperanto"),
        default_direction: "toEsperanto",
        modes: vec![GENERAL, FORMAL, CASUAL, LITERARY],
        into_english_notes: r#"- Understand Esperanto grammar (accusative -n, verb tenses)
- Recognise word compounds and affixes
- Translate to natural English"#,
        from_english_notes: r#"- Use proper Esperanto grammar rules
- Apply correct word endings and affixes
- Use proper Esperanto characters (ĉ, ĝ, ĥ, ĵ, ŝ, ŭ)"#,
        policy: AmbiguityPolicy::ReportBelow(LATIN_SCRIPT_THRESHOLD),
    }
    .build()
}

/// One-way: English input is still translated as if it were Swahili.
pub fn swahili_english() -> LanguagePairTranslator {
    PairConfig {
        id: "swahili-english",
        display_name: "Swahili to English Translator",
        category: Category::Language,
        language: "swahili",
        language_name: "Swahili",
        into_english: "swahili-to-en",
        from_english: None,
        default_direction: "swahili-to-en",
        modes: vec![GENERAL, FORMAL, CASUAL, LITERARY],
        into_english_notes: r#"- Resolve Swahili noun classes and verb prefixes into natural English
- Keep proverbs (methali) meaningful rather than literal"#,
        from_english_notes: "",
        policy: AmbiguityPolicy::SilentDefault,
    }
    .build()
}

const POETIC: ModeSpec = ModeSpec {
    id: "poetic",
    name: "Poetic Dragon Speech",
    prompt: r#"Use a poetic style.

Focus on:
- Dragon songs and chants
- Metaphorical expressions
- Ancient dragon wisdom and proverbs
- Lyrical flow and cadence"#,
    description: "Poetic translation for dragon songs and wisdom",
};

const BATTLE: ModeSpec = ModeSpec {
    id: "battle",
    name: "Battle Shouts (Thu'um)",
    prompt: r#"Translate for a battle context.

Focus on:
- Powerful Thu'um (Dragon Shouts)
- War cries and battle commands
- Short, impactful phrases of power"#,
    description: "Battle translation for Thu'um and war cries",
};

pub fn dragon_language() -> LanguagePairTranslator {
    PairConfig {
        id: "dragon-language",
        display_name: "Dragon Language Translator",
        category: Category::Fictional,
        language: "dragon",
        language_name: "Dragon Language",
        into_english: "toEnglish",
        from_english: Some("toDragon"),
        default_direction: "toDragon",
        modes: vec![GENERAL, FORMAL, POETIC, BATTLE],
        into_english_notes: r#"- Dragon Language is Dovahzul, the Thu'um of Skyrim lore
- Recognise Thu'um and translate compound dragon words accurately
- Thu'um are three-word shouts; each word carries weight"#,
        from_english_notes: r#"- Dragon Language is Dovahzul, the Thu'um of Skyrim lore
- Use authentic vocabulary: Fus (Force), Ro (Balance), Dah (Push), Yol (Fire), Toor (Inferno), Shul (Sun)
- Prefer subject-object-verb order and short, powerful phrases
- Build compound meanings through word combinations"#,
        policy: AmbiguityPolicy::SilentDefault,
    }
    .build()
}
