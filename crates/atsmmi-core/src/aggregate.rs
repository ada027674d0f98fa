//! Merging candidates of many documents into the final MMI set.

use crate::corrections::Corrections;
use crate::entries::Candidate;

/// One MMI of one profile document.
///
/// Ordering is `(document_key, id, name)`, the order of the emitted table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// Profile key of the source document, e.g. `"GAP"`.
    #[cfg_attr(feature = "serde", serde(rename = "profile"))]
    pub document_key: String,
    pub id: u32,
    pub name: String,
}

impl Entry {
    pub fn new(document_key: impl Into<String>, id: u32, name: impl Into<String>) -> Self {
        Self {
            document_key: document_key.into(),
            id,
            name: name.into(),
        }
    }

    /// Tag the candidates of one document with its key.
    pub fn from_candidates(
        document_key: &str,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> Vec<Entry> {
        candidates
            .into_iter()
            .map(|c| Entry::new(document_key, c.id, c.name))
            .collect()
    }
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Corrected entries, sorted, one per `(document_key, id)`.
    pub entries: Vec<Entry>,
    /// Entries dropped because an earlier entry in sort order already
    /// claimed their `(document_key, id)` with another name.
    pub conflicts: Vec<Entry>,
}

/// Apply `corrections` to the extracted entries and produce the final set.
///
/// Filtered triples are dropped and patched triples get their corrected id.
/// The result is sorted with exact duplicates removed. Running it again on
/// its own output yields the same entries.
pub fn aggregate(
    entries: impl IntoIterator<Item = Entry>,
    corrections: &Corrections,
) -> Aggregation {
    let mut corrected: Vec<Entry> = entries
        .into_iter()
        .filter(|e| !corrections.is_filtered(e))
        .map(|mut e| {
            if let Some(id) = corrections.patched_id(&e) {
                e.id = id;
            }
            e
        })
        .collect();
    corrected.sort();
    corrected.dedup();

    let mut out = Aggregation::default();
    for entry in corrected {
        match out.entries.last() {
            Some(prev) if prev.document_key == entry.document_key && prev.id == entry.id => {
                out.conflicts.push(entry);
            }
            _ => out.entries.push(entry),
        }
    }
    out
}
