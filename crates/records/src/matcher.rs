use crate::document::Document;
use crate::view::ViewResponse;
use serde_json::Value;
use std::collections::HashSet;

/// Tombstone every snapset Prefs Safe returned by the view.
///
/// No row is skipped; the result has one document per row.
pub fn mark_snapshots_for_deletion(view: ViewResponse) -> Vec<Document> {
    view.rows
        .into_iter()
        .map(|row| {
            let mut safe = row.value;
            safe.mark_deleted();
            safe
        })
        .collect()
}

/// Select the GPII Keys whose `prefsSafeId` names one of `marked` and
/// tombstone them.
///
/// Identifiers are compared as JSON values, so `7` links to `7` but not to
/// `"7"`; a key or safe without the field never links. Key-row order is
/// preserved and each key row yields at most one document, however many
/// snapshots share its identifier.
pub fn mark_keys_for_deletion(view: ViewResponse, marked: &[Document]) -> Vec<Document> {
    let safe_ids: HashSet<String> = marked
        .iter()
        .filter_map(Document::id_value)
        .map(Value::to_string)
        .collect();

    view.rows
        .into_iter()
        .filter_map(|row| {
            let mut key = row.value;
            let linked = key
                .prefs_safe_id_value()
                .is_some_and(|id| safe_ids.contains(&id.to_string()));
            if !linked {
                return None;
            }
            key.mark_deleted();
            Some(key)
        })
        .collect()
}
