//! Mood taxonomy operations.

use super::with_read_retry;
use crate::errors::AppResult;
use crate::mood::{MoodTaxonomy, TaxonomyResolver};
use crate::store::ConfigStore;
use tracing::info;

/// The built-in taxonomy. Never touches the store.
pub fn get_mood_defaults() -> MoodTaxonomy {
    MoodTaxonomy::defaults()
}

/// The taxonomy in effect: the saved one, else the defaults.
pub fn get_mood_config<S: ConfigStore + ?Sized>(store: &S) -> AppResult<MoodTaxonomy> {
    with_read_retry("Loading mood config", || TaxonomyResolver::new(store).resolve())
}

/// Validates and saves `taxonomy`, replacing any previous one.
///
/// # Errors
///
/// Returns `AppError::Validation` for an empty list or duplicate values; the
/// stored taxonomy is left untouched in that case.
pub fn set_mood_config<S: ConfigStore + ?Sized>(store: &S, taxonomy: &MoodTaxonomy) -> AppResult<()> {
    info!("Setting mood config ({} moods)", taxonomy.len());
    TaxonomyResolver::new(store).save(taxonomy)
}
