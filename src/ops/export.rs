//! Range export.

use super::entries::list_entries_open;
use super::moods::get_mood_config;
use crate::errors::AppResult;
use crate::export::{export_document, ExportDocument};
use crate::range::{DateRange, OpenRange};
use crate::store::{ConfigStore, EntryStore};
use tracing::info;

/// Renders every entry in `range` as a PDF report, colored with the taxonomy
/// in effect now.
///
/// A range with no entries gives a valid document saying so.
pub fn export_range<S>(store: &S, range: &DateRange) -> AppResult<ExportDocument>
where
    S: EntryStore + ConfigStore + ?Sized,
{
    export_open_range(store, &OpenRange::from(*range))
}

/// [`export_range`] for a range that may be open at either end. The report
/// says `All time` or leaves `...` in place of an open end.
pub fn export_open_range<S>(store: &S, range: &OpenRange) -> AppResult<ExportDocument>
where
    S: EntryStore + ConfigStore + ?Sized,
{
    let entries = list_entries_open(store, range)?;
    let taxonomy = get_mood_config(store)?;
    let document = export_document(&entries, &taxonomy, range);
    info!(
        "Exported {} entries for {} ({} bytes)",
        entries.len(),
        range,
        document.bytes.len()
    );
    Ok(document)
}
