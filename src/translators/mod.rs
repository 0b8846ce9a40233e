//! Built-in translator variants.

pub mod albhed;
pub mod gibberish;
pub mod languages;
pub mod modes;
pub mod morse;
pub mod pair;

use std::sync::Arc;
use tracing::warn;

use crate::registry::TranslatorRegistry;
use crate::translator::Translator;

pub use albhed::AlBhedTranslator;
pub use gibberish::GibberishTranslator;
pub use morse::MorseCodeTranslator;
pub use pair::{LanguagePairTranslator, PairConfig};

type Factory = fn() -> Arc<dyn Translator>;

fn arc<T: Translator + 'static>(translator: T) -> Arc<dyn Translator> {
    Arc::new(translator)
}

/// Every built-in tool id with the constructor that builds it.
pub const BUILTIN: &[(&str, Factory)] = &[
    ("chinese-english", || arc(languages::chinese_english())),
    ("japanese-english", || arc(languages::japanese_english())),
    ("albanian-english", || arc(languages::albanian_english())),
    ("greek-english", || arc(languages::greek_english())),
    ("english-polish", || arc(languages::english_polish())),
    ("esperanto", || arc(languages::esperanto())),
    ("swahili-english", || arc(languages::swahili_english())),
    ("dragon-language", || arc(languages::dragon_language())),
    ("morse-code", || arc(MorseCodeTranslator::new())),
    ("al-bhed", || arc(AlBhedTranslator::new())),
    ("gibberish", || arc(GibberishTranslator::new())),
];

/// Register every built-in translator. A built-in that fails registration
/// checks is logged and left out.
pub fn register_builtin(registry: &mut TranslatorRegistry) {
    for &(id, factory) in BUILTIN {
        if let Err(e) = registry.register(id, factory) {
            warn!(tool_id = id, "Skipping built-in translator: {}", e);
        }
    }
}
