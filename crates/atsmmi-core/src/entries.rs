//! Recognition of MMI identifier/name pairs in reconstructed rows.

use std::sync::LazyLock;

use regex::Regex;

use crate::page::Page;
use crate::rows::Row;

/// `{<id>,%s` at the start of an identifier cell.
static MMI_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(\d+),%s").expect("MMI id pattern is valid"));

/// An `(id, name)` pair recognized in a document, before any correction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub id: u32,
    pub name: String,
}

impl Candidate {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// All rows of a document, in page order and reading order within a page.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rows: Vec<Row>,
}

impl Document {
    /// Concatenate the rows of `pages`, consuming them.
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            rows: pages.into_iter().flat_map(Page::into_rows).collect(),
        }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Recognized candidates, in document order.
    pub fn candidates(&self) -> Vec<Candidate> {
        assemble_candidates(&self.rows)
    }
}

/// Scan rows for identifier/name pairs.
///
/// Only two-cell rows are considered. See [`assemble_from_cells`].
pub fn assemble_candidates(rows: &[Row]) -> Vec<Candidate> {
    assemble_from_cells(rows.iter().map(Row::contents))
}

/// Scan rendered rows (one `Vec` of cell contents per row) for
/// identifier/name pairs.
///
/// A two-cell row whose right cell starts with `{<id>,%s` yields a
/// candidate named after the left cell. A two-cell row right after a
/// matching one continues that candidate's name with its left cell, unless
/// it is a table header (`Message` on the right, a `{%d,%s,` template on the
/// right, or a left cell ending in `MMIID`). Rows of any other width are
/// skipped and do not interrupt a continuation.
pub fn assemble_from_cells<I>(rows: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut previous_matched = false;

    for cells in rows {
        let [left, right] = cells.as_slice() else {
            continue;
        };
        let left = strip_spaces(left);
        let right = strip_spaces(right);

        let id = parse_id(&right);
        match id {
            Some(id) => candidates.push(Candidate::new(id, left)),
            None if previous_matched && !is_header(&left, &right) => {
                if let Some(last) = candidates.last_mut() {
                    last.name.push_str(&left);
                }
            }
            None => {}
        }
        previous_matched = id.is_some();
    }

    candidates
}

/// The identifier of an identifier cell, if it is one.
///
/// Identifiers too large for a `u32` are treated as non-matching.
pub fn parse_id(cell: &str) -> Option<u32> {
    MMI_ID
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn is_header(left: &str, right: &str) -> bool {
    right == "Message" || right.starts_with("{%d,%s,") || left.ends_with("MMIID")
}

fn strip_spaces(s: &str) -> String {
    s.replace(' ', "")
}
