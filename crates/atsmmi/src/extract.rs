//! Per-document extraction and batch processing.

use std::path::{Path, PathBuf};

use atsmmi_core::{Aggregation, Corrections, Entry, MmiError, PageOptions, aggregate};
use tracing::{info, warn};

use crate::document::AtsDocument;

/// File extension of ATS documents.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Profile key of a document file: the file name up to the first `_`, or
/// the file stem when the name has no `_`.
///
/// `GAP_ATS_v1.pdf` has key `GAP`.
pub fn document_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    match name.split_once('_') {
        Some((key, _)) => Some(key.to_string()),
        None => Some(path.file_stem()?.to_str()?.to_string()),
    }
}

/// All `*.pdf` files directly inside `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`MmiError::Io`] if the directory cannot be read.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, MmiError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Pages of a document to process.
///
/// An explicit selection is used as is. Otherwise every page is processed
/// except the trailing pages `corrections` lists for the document key.
pub fn selected_pages(
    page_count: usize,
    document_key: &str,
    pages: Option<&[usize]>,
    corrections: &Corrections,
) -> Vec<usize> {
    if let Some(pages) = pages {
        return pages.to_vec();
    }
    let skipped = corrections.trailing_pages_skipped(document_key);
    if skipped > 0 {
        info!(key = %document_key, skipped, "skipping trailing pages");
    }
    (0..page_count.saturating_sub(skipped)).collect()
}

/// Extract the MMI entries of one document.
///
/// `pages` are 0-based page indices; `None` processes the whole document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a selected page
/// does not exist, or a page's tables are structurally inconsistent.
pub fn extract_document(
    path: &Path,
    pages: Option<&[usize]>,
    corrections: &Corrections,
    options: &PageOptions,
) -> Result<Vec<Entry>, MmiError> {
    let key = document_key(path)
        .ok_or_else(|| MmiError::Io(format!("{}: not a document file name", path.display())))?;
    info!(document = %path.display(), key = %key, "extracting");

    let doc = AtsDocument::open_file(path, Some(*options))?;
    let pages = selected_pages(doc.page_count(), &key, pages, corrections);
    let document = doc.document(&pages)?;
    let entries = Entry::from_candidates(&key, document.candidates());

    info!(key = %key, entries = entries.len(), "extracted");
    Ok(entries)
}

/// A document that failed in batch mode.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: MmiError,
}

/// Result of [`extract_batch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Entries of all successful documents, in document order.
    pub entries: Vec<Entry>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract every document in `paths`. A failing document is recorded and
/// the batch continues with the rest.
///
/// With the `parallel` feature documents are extracted concurrently; the
/// outcome is identical to sequential processing.
pub fn extract_batch(
    paths: &[PathBuf],
    corrections: &Corrections,
    options: &PageOptions,
) -> BatchOutcome {
    let results = extract_all(paths, corrections, options);

    let mut outcome = BatchOutcome::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(entries) => outcome.entries.extend(entries),
            Err(error) => {
                warn!(document = %path.display(), %error, "extraction failed");
                outcome.failures.push(BatchFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }
    outcome
}

#[cfg(not(feature = "parallel"))]
fn extract_all(
    paths: &[PathBuf],
    corrections: &Corrections,
    options: &PageOptions,
) -> Vec<Result<Vec<Entry>, MmiError>> {
    paths
        .iter()
        .map(|path| extract_document(path, None, corrections, options))
        .collect()
}

#[cfg(feature = "parallel")]
fn extract_all(
    paths: &[PathBuf],
    corrections: &Corrections,
    options: &PageOptions,
) -> Vec<Result<Vec<Entry>, MmiError>> {
    use rayon::prelude::*;

    paths
        .par_iter()
        .map(|path| extract_document(path, None, corrections, options))
        .collect()
}

/// [`aggregate`], logging every `(profile, id)` conflict that was resolved
/// in favour of the first name.
pub fn aggregate_entries(
    entries: impl IntoIterator<Item = Entry>,
    corrections: &Corrections,
) -> Aggregation {
    let aggregation = aggregate(entries, corrections);
    for dropped in &aggregation.conflicts {
        warn!(
            profile = %dropped.document_key,
            id = dropped.id,
            name = %dropped.name,
            "conflicting name for MMI id dropped"
        );
    }
    aggregation
}
