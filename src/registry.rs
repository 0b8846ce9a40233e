//! Translator registry: maps tool ids to translator instances.
//!
//! The registry is an ordinary value. It is populated at startup, then
//! shared read-only (usually behind an `Arc`) by the dispatcher and the
//! HTTP layer. Re-registration needs `&mut self`, so it cannot race with
//! lookups on a shared registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{DispatchError, Result};
use crate::model::{Category, TranslatorDescriptor};
use crate::translator::Translator;
use crate::translators;

struct Entry {
    id: String,
    translator: Arc<dyn Translator>,
}

#[derive(Default)]
pub struct TranslatorRegistry {
    /// Registration order is catalog order.
    entries: Vec<Entry>,
}

impl TranslatorRegistry {
    /// An empty registry. Every lookup fails until something is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in translator.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        translators::register_builtin(&mut registry);
        registry
    }

    /// Build a translator with `factory` and store it under `tool_id`.
    ///
    /// Registering an id again replaces the earlier translator in place.
    /// A translator whose descriptor is inconsistent is refused and any
    /// earlier registration under `tool_id` is kept.
    pub fn register<F>(&mut self, tool_id: &str, factory: F) -> Result<()>
    where
        F: FnOnce() -> Arc<dyn Translator>,
    {
        let translator = factory();
        check_translator(translator.as_ref()).map_err(|reason| {
            DispatchError::InvalidTranslator {
                tool_id: tool_id.to_string(),
                reason,
            }
        })?;

        match self.entries.iter_mut().find(|e| e.id == tool_id) {
            Some(entry) => {
                tracing::debug!(tool_id, "Replacing registered translator");
                entry.translator = translator;
            }
            None => self.entries.push(Entry {
                id: tool_id.to_string(),
                translator,
            }),
        }
        Ok(())
    }

    /// Look up the translator registered under `tool_id`.
    pub fn resolve(&self, tool_id: &str) -> Result<Arc<dyn Translator>> {
        if self.entries.is_empty() {
            return Err(DispatchError::RegistryNotInitialized {
                tool_id: tool_id.to_string(),
            });
        }
        self.entries
            .iter()
            .find(|e| e.id == tool_id)
            .map(|e| Arc::clone(&e.translator))
            .ok_or_else(|| DispatchError::ToolNotFound {
                tool_id: tool_id.to_string(),
            })
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.entries.iter().any(|e| e.id == tool_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    /// Descriptors of every registered translator, in registration order.
    pub fn list_all(&self) -> Vec<TranslatorDescriptor> {
        self.entries
            .iter()
            .map(|e| e.translator.descriptor().clone())
            .collect()
    }

    pub fn list_by_category(&self, category: Category) -> Vec<TranslatorDescriptor> {
        self.list_all()
            .into_iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Descriptors grouped by category. Empty categories are omitted.
    pub fn grouped_by_category(&self) -> BTreeMap<Category, Vec<TranslatorDescriptor>> {
        let mut groups: BTreeMap<Category, Vec<TranslatorDescriptor>> = BTreeMap::new();
        for descriptor in self.list_all() {
            groups.entry(descriptor.category).or_default().push(descriptor);
        }
        groups
    }

    /// Case-insensitive substring search over ids and display names.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<TranslatorDescriptor> {
        let query = query.trim().to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|d| {
                query.is_empty()
                    || d.id.to_lowercase().contains(&query)
                    || d.display_name.to_lowercase().contains(&query)
            })
            .collect()
    }
}

/// Descriptor invariants, plus agreement between `requires_ai` and the engine.
fn check_translator(translator: &dyn Translator) -> std::result::Result<(), String> {
    let descriptor = translator.descriptor();
    descriptor.check_invariants()?;

    let generative = translator.engine().is_generative();
    if descriptor.requires_ai != generative {
        return Err(format!(
            "{}: requires_ai is {} but the engine is {}",
            descriptor.id,
            descriptor.requires_ai,
            if generative { "generative" } else { "rule-based" }
        ));
    }
    Ok(())
}
