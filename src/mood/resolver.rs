//! Resolves the taxonomy in effect: the saved one, or the built-in defaults.

use super::MoodTaxonomy;
use crate::errors::AppResult;
use crate::store::ConfigStore;
use tracing::{debug, info};

/// Loads and saves the active mood taxonomy through a [`ConfigStore`].
///
/// Only the absence of a saved taxonomy falls back to defaults. A store that
/// cannot be reached is reported to the caller; it is never mistaken for
/// "nothing saved".
pub struct TaxonomyResolver<'a, S: ConfigStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConfigStore + ?Sized> TaxonomyResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        TaxonomyResolver { store }
    }

    /// The saved taxonomy, if any. A saved but empty list counts as absent.
    pub fn load(&self) -> AppResult<Option<MoodTaxonomy>> {
        let saved = self.store.load_mood_config()?;
        Ok(saved.filter(|taxonomy| !taxonomy.is_empty()))
    }

    pub fn resolve(&self) -> AppResult<MoodTaxonomy> {
        match self.load()? {
            Some(taxonomy) => {
                debug!("Using saved mood taxonomy ({} moods)", taxonomy.len());
                Ok(taxonomy)
            }
            None => {
                debug!("No saved mood taxonomy, using defaults");
                Ok(MoodTaxonomy::defaults())
            }
        }
    }

    /// Validates and persists `taxonomy`, replacing the previous one.
    pub fn save(&self, taxonomy: &MoodTaxonomy) -> AppResult<()> {
        taxonomy.validate()?;
        self.store.save_mood_config(taxonomy)?;
        info!("Saved mood taxonomy with {} moods", taxonomy.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::mood::MoodDefinition;
    use crate::store::MemoryStore;

    fn custom() -> MoodTaxonomy {
        MoodTaxonomy::new(vec![
            MoodDefinition::new("calm", "😌", "Calm", Some("#0ea5e9")),
            MoodDefinition::new("wired", "⚡", "Wired", None),
        ])
    }

    #[test]
    fn test_resolve_without_saved_config_returns_defaults() {
        let store = MemoryStore::new();
        let resolved = TaxonomyResolver::new(&store).resolve().unwrap();
        assert_eq!(resolved, MoodTaxonomy::defaults());
    }

    #[test]
    fn test_saved_config_replaces_defaults_wholesale() {
        let store = MemoryStore::new();
        let resolver = TaxonomyResolver::new(&store);
        resolver.save(&custom()).unwrap();
        assert_eq!(resolver.resolve().unwrap(), custom());

        let smaller = MoodTaxonomy::new(vec![MoodDefinition::new("ok", "👌", "Ok", None)]);
        resolver.save(&smaller).unwrap();
        assert_eq!(resolver.resolve().unwrap(), smaller);
    }

    #[test]
    fn test_invalid_taxonomy_is_not_written() {
        let store = MemoryStore::new();
        let resolver = TaxonomyResolver::new(&store);
        resolver.save(&custom()).unwrap();

        let err = resolver.save(&MoodTaxonomy::new(vec![])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(resolver.resolve().unwrap(), custom());
    }

    #[test]
    fn test_empty_saved_list_counts_as_absent() {
        let store = MemoryStore::new();
        store.save_mood_config(&MoodTaxonomy::new(vec![])).unwrap();
        let resolver = TaxonomyResolver::new(&store);
        assert!(resolver.load().unwrap().is_none());
        assert_eq!(resolver.resolve().unwrap(), MoodTaxonomy::defaults());
    }

    #[test]
    fn test_unavailable_store_is_surfaced_not_defaulted() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = TaxonomyResolver::new(&store).resolve().unwrap_err();
        assert!(err.is_transient());
    }
}
