//! Error and warning types for atsmmi.
//!
//! Provides [`MmiError`] for fatal errors that abort the processing of a
//! document, [`StructuralMismatch`] describing a table whose boundary
//! segments do not form a consistent row, and [`ExtractWarning`] for
//! non-fatal issues met while reading page content.

use std::fmt;

use crate::geometry::Segment;

/// Fatal error types for document processing.
#[derive(Debug, Clone, PartialEq)]
pub enum MmiError {
    /// Boundary segments on a page violate the row invariants.
    StructuralMismatch(StructuralMismatch),
    /// The extraction facility failed to produce page primitives.
    Extraction(String),
    /// A requested page does not exist in the document.
    PageOutOfRange {
        /// Requested 0-based page index.
        page: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// I/O error reading a document.
    Io(String),
}

impl fmt::Display for MmiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MmiError::StructuralMismatch(m) => write!(f, "{m}"),
            MmiError::Extraction(msg) => write!(f, "extraction error: {msg}"),
            MmiError::PageOutOfRange { page, page_count } => write!(
                f,
                "page index {page} out of range (document has {page_count} pages)"
            ),
            MmiError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for MmiError {}

impl From<std::io::Error> for MmiError {
    fn from(err: std::io::Error) -> Self {
        MmiError::Io(err.to_string())
    }
}

impl From<StructuralMismatch> for MmiError {
    fn from(m: StructuralMismatch) -> Self {
        MmiError::StructuralMismatch(m)
    }
}

/// The row invariant that a scanline violated.
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// Horizontal segments at one height do not tile a contiguous extent.
    ScanlineGap {
        /// Where the next segment was expected to start.
        expected_x: f64,
        /// Where it actually starts.
        found_x: f64,
    },
    /// N cells need N + 1 vertical boundaries.
    BoundaryCount {
        /// `horizontal segments + 1`.
        expected: usize,
        /// Vertical segments anchored at the scanline.
        found: usize,
    },
    /// Vertical boundaries of one row have different lengths.
    UnequalHeights,
}

/// A scanline whose boundary segments cannot form a row.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMismatch {
    /// 0-based page index.
    pub page: usize,
    /// Height of the offending scanline.
    pub y: f64,
    /// Which invariant failed.
    pub kind: MismatchKind,
    /// The horizontal run and the matched vertical segments.
    pub segments: Vec<Segment>,
}

impl fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "structural mismatch on page {} at y={}: ", self.page, self.y)?;
        match &self.kind {
            MismatchKind::ScanlineGap {
                expected_x,
                found_x,
            } => write!(
                f,
                "horizontal segment starts at x={found_x}, expected x={expected_x}"
            )?,
            MismatchKind::BoundaryCount { expected, found } => write!(
                f,
                "expected {expected} vertical boundaries, found {found}"
            )?,
            MismatchKind::UnequalHeights => write!(f, "vertical boundaries differ in length")?,
        }
        write!(f, " ({} segments)", self.segments.len())
    }
}

impl std::error::Error for StructuralMismatch {}

/// A non-fatal issue encountered while reading page content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (0-indexed), if known.
    pub page: Option<usize>,
    /// Index of the operator in the content stream, if applicable.
    pub operator_index: Option<usize>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            page: None,
            operator_index: None,
        }
    }

    /// Create a warning pointing at a content stream operator.
    pub fn at_operator(description: impl Into<String>, operator_index: usize) -> Self {
        Self {
            description: description.into(),
            page: None,
            operator_index: Some(operator_index),
        }
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(op) = self.operator_index {
            write!(f, " (operator #{op})")?;
        }
        Ok(())
    }
}
