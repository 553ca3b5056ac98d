//! Translation overlay interface.
//!
//! Player-supplied translations live in a subtree of the project (commonly
//! `Language/<id>/...`) mirroring the asset directory layout. The resolver
//! consults the active translation *before* the game's own files, so a
//! translated picture shadows the original. Which translation is active is
//! the embedder's business; the resolver only asks through this trait.

use std::sync::Arc;

/// Supplies the currently active translation, if any.
///
/// An empty id means no translation is active; the translation stage of a
/// lookup is then skipped entirely, not treated as a failed search.
pub trait TranslationProvider: Send + Sync {
    /// Identifier of the active translation (e.g. `"de"`); empty when none.
    fn current_translation_id(&self) -> String;

    /// Name of the directory inside the project that holds translations.
    fn translation_root(&self) -> String;
}

/// A provider with a fixed root and a switchable active id.
#[derive(Debug)]
pub struct FixedTranslation {
    root: String,
    id: parking_lot::RwLock<String>,
}

impl FixedTranslation {
    /// Provider rooted at `root` with no translation active yet.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            id: parking_lot::RwLock::new(String::new()),
        }
    }

    /// Provider rooted at `root` with `id` already active.
    pub fn with_active(root: impl Into<String>, id: impl Into<String>) -> Arc<Self> {
        let provider = Self::new(root);
        *provider.id.write() = id.into();
        Arc::new(provider)
    }

    /// Activate a translation (empty deactivates).
    pub fn set_active(&self, id: impl Into<String>) {
        *self.id.write() = id.into();
    }
}

impl TranslationProvider for FixedTranslation {
    fn current_translation_id(&self) -> String {
        self.id.read().clone()
    }

    fn translation_root(&self) -> String {
        self.root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_translation_switches() {
        let provider = FixedTranslation::new("Language");
        assert_eq!(provider.translation_root(), "Language");
        assert!(provider.current_translation_id().is_empty());

        provider.set_active("de");
        assert_eq!(provider.current_translation_id(), "de");

        provider.set_active("");
        assert!(provider.current_translation_id().is_empty());
    }

    #[test]
    fn test_with_active_constructor() {
        let provider = FixedTranslation::with_active("Language", "es");
        assert_eq!(provider.current_translation_id(), "es");
    }
}
