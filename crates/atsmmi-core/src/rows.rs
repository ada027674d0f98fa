//! Scanline reconstruction of table rows from boundary segments.

use crate::coord::Approx;
use crate::error::{MismatchKind, StructuralMismatch};
use crate::geometry::{GeometryIndex, Rect, Segment};

/// A reconstructed table row; cells are ordered left to right.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    pub cells: Vec<Rect>,
}

impl Row {
    pub fn new(cells: Vec<Rect>) -> Self {
        Self { cells }
    }

    /// Rendered content of every cell, left to right.
    pub fn contents(&self) -> Vec<String> {
        self.cells.iter().map(Rect::contents).collect()
    }
}

/// Reconstruct the rows of one page, bottom to top.
///
/// Each scanline (a run of horizontal segments at one height) must tile a
/// contiguous extent. When vertical segments originate on the scanline they
/// delimit one row: N horizontal segments need N + 1 vertical boundaries of
/// equal length, and every horizontal segment becomes a cell whose height is
/// that length. Scanlines with no vertical segment anchored on them (the top
/// border of a table, for instance) produce no row.
///
/// # Errors
///
/// Returns a [`StructuralMismatch`] naming `page` when a scanline has a gap,
/// the wrong number of vertical boundaries, or boundaries of unequal length.
pub fn reconstruct_rows(
    index: &GeometryIndex,
    page: usize,
) -> Result<Vec<Row>, StructuralMismatch> {
    let mut rows = Vec::new();
    let mut clustered = index.horizontal().iter().zip(index.scanlines()).peekable();

    while let Some((first, &scanline)) = clustered.next() {
        let mut run = vec![*first];
        while let Some((segment, _)) = clustered.next_if(|&(_, &s)| s == scanline) {
            run.push(*segment);
        }
        let run = run.as_slice();

        let y = run[0].y;
        check_contiguous(run, page)?;

        let verticals = index.verticals_at(y);
        if verticals.is_empty() {
            continue;
        }

        let height = verticals[0].length;
        if verticals.len() != run.len() + 1 {
            return Err(mismatch(
                page,
                y,
                MismatchKind::BoundaryCount {
                    expected: run.len() + 1,
                    found: verticals.len(),
                },
                run,
                &verticals,
            ));
        }
        if !verticals.iter().all(|v| v.length.approx_eq(height)) {
            return Err(mismatch(page, y, MismatchKind::UnequalHeights, run, &verticals));
        }

        let cells = run
            .iter()
            .map(|s| Rect::from_coords(s.x, s.y, s.length, height))
            .collect();
        rows.push(Row::new(cells));
    }

    Ok(rows)
}

/// Every segment of a scanline must start where the previous one ends.
fn check_contiguous(run: &[Segment], page: usize) -> Result<(), StructuralMismatch> {
    let mut expected: Approx = run[0].x;
    for segment in run {
        if !segment.x.approx_eq(expected) {
            return Err(mismatch(
                page,
                run[0].y,
                MismatchKind::ScanlineGap {
                    expected_x: expected.value,
                    found_x: segment.x.value,
                },
                run,
                &[],
            ));
        }
        expected = segment.end_x();
    }
    Ok(())
}

fn mismatch(
    page: usize,
    y: Approx,
    kind: MismatchKind,
    run: &[Segment],
    verticals: &[Segment],
) -> StructuralMismatch {
    StructuralMismatch {
        page,
        y: y.value,
        kind,
        segments: run.iter().chain(verticals).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(rects: &[Rect]) -> GeometryIndex {
        GeometryIndex::from_rects(rects)
    }

    #[test]
    fn single_row_of_three_cells() {
        let index = index_of(&[
            Rect::new(0.0, 100.0, 50.0, 20.0),
            Rect::new(50.0, 100.0, 80.0, 20.0),
            Rect::new(130.0, 100.0, 40.0, 20.0),
        ]);
        let rows = reconstruct_rows(&index, 0).unwrap();
        assert_eq!(rows.len(), 1);
        let cells = &rows[0].cells;
        assert_eq!(cells.len(), 3);
        let xs: Vec<f64> = cells.iter().map(|c| c.x.value).collect();
        assert_eq!(xs, vec![0.0, 50.0, 130.0]);
        assert!(cells.iter().all(|c| c.h.value == 20.0));
        assert!(cells.iter().all(|c| c.y.value == 100.0));
        assert_eq!(cells[1].w.value, 80.0);
    }

    #[test]
    fn rows_are_discovered_bottom_to_top() {
        let index = index_of(&[
            Rect::new(0.0, 200.0, 100.0, 20.0),
            Rect::new(0.0, 180.0, 100.0, 20.0),
            Rect::new(0.0, 160.0, 100.0, 20.0),
        ]);
        let rows = reconstruct_rows(&index, 0).unwrap();
        let ys: Vec<f64> = rows.iter().map(|r| r.cells[0].y.value).collect();
        assert_eq!(ys, vec![160.0, 180.0, 200.0]);
    }

    #[test]
    fn cells_drawn_as_flat_border_rects() {
        // One 2-cell row drawn only with thin border rectangles.
        let t = 0.5;
        let index = index_of(&[
            // bottom and top borders
            Rect::new(0.0, 100.0, 60.0, t),
            Rect::new(60.0, 100.0, 40.0, t),
            Rect::new(0.0, 130.0, 60.0, t),
            Rect::new(60.0, 130.0, 40.0, t),
            // left, middle, right borders
            Rect::new(0.0, 100.0, t, 30.0),
            Rect::new(60.0, 100.0, t, 30.0),
            Rect::new(100.0, 100.0, t, 30.0),
        ]);
        let rows = reconstruct_rows(&index, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells.len(), 2);
        assert_eq!(rows[0].cells[0].w.value, 60.0);
        assert_eq!(rows[0].cells[1].x.value, 60.0);
        assert_eq!(rows[0].cells[1].h.value, 30.0);
    }

    #[test]
    fn scanline_without_verticals_is_skipped() {
        let index = index_of(&[Rect::new(0.0, 300.0, 500.0, 0.0)]);
        assert!(reconstruct_rows(&index, 0).unwrap().is_empty());
    }

    #[test]
    fn gap_in_scanline_is_a_mismatch() {
        let index = index_of(&[
            Rect::new(0.0, 100.0, 50.0, 20.0),
            Rect::new(80.0, 100.0, 50.0, 20.0),
        ]);
        let err = reconstruct_rows(&index, 4).unwrap_err();
        assert_eq!(err.page, 4);
        assert_eq!(
            err.kind,
            MismatchKind::ScanlineGap {
                expected_x: 50.0,
                found_x: 80.0
            }
        );
        assert_eq!(err.segments.len(), 2);
    }

    #[test]
    fn missing_vertical_boundary_is_a_mismatch() {
        let mut index = index_of(&[
            Rect::new(0.0, 100.0, 50.0, 20.0),
            Rect::new(50.0, 100.0, 50.0, 20.0),
        ]);
        index.vertical.retain(|v| v.x.value != 50.0);
        let err = reconstruct_rows(&index, 1).unwrap_err();
        assert_eq!(
            err.kind,
            MismatchKind::BoundaryCount {
                expected: 3,
                found: 2
            }
        );
        // Two horizontal segments plus the two verticals that were found.
        assert_eq!(err.segments.len(), 4);
    }

    #[test]
    fn unequal_vertical_lengths_is_a_mismatch() {
        use crate::geometry::Orientation::{Horizontal, Vertical};
        let index = GeometryIndex {
            horizontal: vec![
                Segment::new(Horizontal, 0.0, 100.0, 50.0),
                Segment::new(Horizontal, 50.0, 100.0, 50.0),
            ],
            scanlines: vec![0, 0],
            vertical: vec![
                Segment::new(Vertical, 0.0, 100.0, 20.0),
                Segment::new(Vertical, 50.0, 100.0, 20.0),
                Segment::new(Vertical, 100.0, 100.0, 40.0),
            ],
        };
        let err = reconstruct_rows(&index, 0).unwrap_err();
        assert_eq!(err.kind, MismatchKind::UnequalHeights);
        assert!(err.to_string().contains("page 0"));
    }

    #[test]
    fn horizontal_without_scanline_is_ignored() {
        use crate::geometry::Orientation::{Horizontal, Vertical};
        let index = GeometryIndex {
            horizontal: vec![
                Segment::new(Horizontal, 0.0, 100.0, 50.0),
                Segment::new(Horizontal, 0.0, 300.0, 50.0),
            ],
            scanlines: vec![0],
            vertical: vec![
                Segment::new(Vertical, 0.0, 100.0, 20.0),
                Segment::new(Vertical, 50.0, 100.0, 20.0),
            ],
        };
        let rows = reconstruct_rows(&index, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells.len(), 1);

        let truncated = GeometryIndex {
            scanlines: Vec::new(),
            ..index
        };
        assert!(reconstruct_rows(&truncated, 0).unwrap().is_empty());
    }

    #[test]
    fn empty_index_has_no_rows() {
        let rows = reconstruct_rows(&GeometryIndex::default(), 0).unwrap();
        assert!(rows.is_empty());
    }
}
