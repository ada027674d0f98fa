//! atsmmi: extract MMI identifier tables from ATS profile documents.
//!
//! This is the public API facade. It reads documents with `atsmmi-parse`,
//! reconstructs their tables and mines MMI entries with `atsmmi-core`, and
//! adds document discovery and batch extraction on top.
//!
//! # Architecture
//!
//! - **atsmmi-core**: table reconstruction, MMI recognition, corrections
//!   and emission, free of I/O
//! - **atsmmi-parse**: PDF reading and content stream interpretation
//! - **atsmmi** (this crate): documents, batches and logging

mod document;
mod extract;

pub use atsmmi_core;
pub use atsmmi_parse;

pub use atsmmi_core::{
    Aggregation, Candidate, Corrections, DEFAULT_MARGIN, Document, Entry, ExtractWarning,
    GENERATED_HEADER, MmiError, MmiTable, Page, PageOptions, Row, StructuralMismatch,
    render_lookup_fragment,
};
pub use document::AtsDocument;
pub use extract::{
    BatchFailure, BatchOutcome, DOCUMENT_EXTENSION, aggregate_entries, discover_documents,
    document_key, extract_batch, extract_document, selected_pages,
};
