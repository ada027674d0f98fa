//! atsmmi-core: Backend-independent table reconstruction and MMI mining.
//!
//! This crate turns the rectangles and positioned text runs of ATS document
//! pages into table rows, recognizes the `{<id>,%s` MMI identifier cells in
//! them, corrects known errors of the published documents and renders the
//! resulting `(profile, id) -> name` lookup. It performs no I/O.

pub mod aggregate;
pub mod coord;
pub mod corrections;
pub mod emit;
pub mod entries;
pub mod error;
pub mod geometry;
pub mod lookup;
pub mod page;
pub mod rows;
pub mod text;

pub use aggregate::{Aggregation, Entry, aggregate};
pub use coord::{Approx, DEFAULT_MARGIN, cluster_ranks};
pub use corrections::Corrections;
pub use emit::{GENERATED_HEADER, render_lookup_fragment};
pub use entries::{Candidate, Document, assemble_candidates, assemble_from_cells, parse_id};
pub use error::{ExtractWarning, MismatchKind, MmiError, StructuralMismatch};
pub use geometry::{GeometryIndex, Orientation, Rect, Segment, TextRun};
pub use lookup::{MmiPrompt, MmiTable, parse_description};
pub use page::{Page, PageOptions};
pub use rows::{Row, reconstruct_rows};
pub use text::{bind_text, reading_order};
