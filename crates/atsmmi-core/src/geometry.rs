//! Page primitives and boundary segment derivation.
//!
//! Coordinates use the PDF convention: origin at the bottom-left corner of the
//! page, y growing upwards.

use crate::coord::{Approx, DEFAULT_MARGIN, cluster_ranks, raw_cmp};

/// A text run anchored at a point of the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    /// Anchor x coordinate.
    pub x: Approx,
    /// Anchor y coordinate (baseline).
    pub y: Approx,
    /// Decoded text.
    pub text: String,
}

impl TextRun {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self::with_margin(x, y, text, DEFAULT_MARGIN)
    }

    pub fn with_margin(x: f64, y: f64, text: impl Into<String>, margin: f64) -> Self {
        Self {
            x: Approx::with_margin(x, margin),
            y: Approx::with_margin(y, margin),
            text: text.into(),
        }
    }
}

/// A drawn rectangle, or a reconstructed table cell.
///
/// Cells accumulate the text runs they contain in `bound_text`; drawn
/// rectangles leave it empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: Approx,
    /// Bottom edge.
    pub y: Approx,
    /// Width.
    pub w: Approx,
    /// Height.
    pub h: Approx,
    /// Text runs bound to this cell, in binding order.
    pub bound_text: Vec<TextRun>,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::with_margin(x, y, w, h, DEFAULT_MARGIN)
    }

    pub fn with_margin(x: f64, y: f64, w: f64, h: f64, margin: f64) -> Self {
        Self::from_coords(
            Approx::with_margin(x, margin),
            Approx::with_margin(y, margin),
            Approx::with_margin(w, margin),
            Approx::with_margin(h, margin),
        )
    }

    pub fn from_coords(x: Approx, y: Approx, w: Approx, h: Approx) -> Self {
        Self {
            x,
            y,
            w,
            h,
            bound_text: Vec::new(),
        }
    }

    /// The four boundary segments of this rectangle: left, right, bottom, top.
    pub fn boundary_segments(&self) -> [Segment; 4] {
        [
            Segment::vertical(self.x, self.y, self.h),
            Segment::vertical(self.x + self.w, self.y, self.h),
            Segment::horizontal(self.x, self.y, self.w),
            Segment::horizontal(self.x, self.y + self.h, self.w),
        ]
    }
}

/// Segment orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along x from `(x, y)`.
    Horizontal,
    /// Extends along y from `(x, y)`.
    Vertical,
}

/// One edge of a rectangle, starting at its origin `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub orientation: Orientation,
    pub x: Approx,
    pub y: Approx,
    pub length: Approx,
}

impl Segment {
    /// Create a segment with the default margin.
    pub fn new(orientation: Orientation, x: f64, y: f64, length: f64) -> Self {
        Self {
            orientation,
            x: Approx::new(x),
            y: Approx::new(y),
            length: Approx::new(length),
        }
    }

    pub fn horizontal(x: Approx, y: Approx, length: Approx) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            x,
            y,
            length,
        }
    }

    pub fn vertical(x: Approx, y: Approx, length: Approx) -> Self {
        Self {
            orientation: Orientation::Vertical,
            x,
            y,
            length,
        }
    }

    /// Where a horizontal segment ends, i.e. where the next one of its
    /// scanline must start.
    pub fn end_x(&self) -> Approx {
        self.x + self.length
    }

    /// Tolerant equality on origin and length.
    pub fn approx_eq(&self, other: &Segment) -> bool {
        self.orientation == other.orientation
            && self.x.approx_eq(other.x)
            && self.y.approx_eq(other.y)
            && self.length.approx_eq(other.length)
    }
}

/// Deduplicated boundary segments of one page.
///
/// Horizontal segments are ordered by `(y, x, length)` where `y` is compared
/// through its scanline cluster (see [`cluster_ranks`]); `scanlines[i]` is
/// the cluster of `horizontal[i]`, non-decreasing along the vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryIndex {
    pub(crate) horizontal: Vec<Segment>,
    pub(crate) scanlines: Vec<usize>,
    pub(crate) vertical: Vec<Segment>,
}

impl GeometryIndex {
    /// Derive boundary segments from the rectangles of a page.
    ///
    /// Some tables are not drawn with one rectangle per cell but with four
    /// flat rectangles per cell border, so edges are always derived. Exact
    /// duplicates and negligible-length segments (the flat borders' own short
    /// sides) are discarded.
    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut horizontal: Vec<Segment> = Vec::new();
        let mut vertical: Vec<Segment> = Vec::new();

        for rect in rects {
            for segment in rect.boundary_segments() {
                let bucket = match segment.orientation {
                    Orientation::Horizontal => &mut horizontal,
                    Orientation::Vertical => &mut vertical,
                };
                if segment.length.is_negligible() {
                    continue;
                }
                if bucket.iter().any(|s| s.approx_eq(&segment)) {
                    continue;
                }
                bucket.push(segment);
            }
        }

        let margin = horizontal.first().map_or(DEFAULT_MARGIN, |s| s.y.margin);
        let ys: Vec<f64> = horizontal.iter().map(|s| s.y.value).collect();
        let ranks = cluster_ranks(&ys, margin);

        let mut keyed: Vec<(usize, Segment)> = ranks.into_iter().zip(horizontal).collect();
        keyed.sort_by(|(ra, a), (rb, b)| {
            ra.cmp(rb)
                .then_with(|| raw_cmp(a.x, b.x))
                .then_with(|| raw_cmp(a.length, b.length))
        });

        let (scanlines, horizontal) = keyed.into_iter().unzip();
        Self {
            horizontal,
            scanlines,
            vertical,
        }
    }

    /// Horizontal segments in scanline order.
    pub fn horizontal(&self) -> &[Segment] {
        &self.horizontal
    }

    /// Scanline cluster of each horizontal segment.
    pub fn scanlines(&self) -> &[usize] {
        &self.scanlines
    }

    /// Vertical segments, in derivation order.
    pub fn vertical(&self) -> &[Segment] {
        &self.vertical
    }

    /// Vertical segments whose origin lies on the given height.
    pub fn verticals_at(&self, y: Approx) -> Vec<Segment> {
        self.vertical
            .iter()
            .filter(|s| s.y.approx_eq(y))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_yields_four_segments() {
        let segments = Rect::new(10.0, 20.0, 100.0, 30.0).boundary_segments();
        let verticals: Vec<_> = segments
            .iter()
            .filter(|s| s.orientation == Orientation::Vertical)
            .collect();
        assert_eq!(verticals.len(), 2);
        assert_eq!(verticals[1].x.value, 110.0);
        assert_eq!(verticals[1].length.value, 30.0);
        let top = segments[3];
        assert_eq!(top.orientation, Orientation::Horizontal);
        assert_eq!(top.y.value, 50.0);
        assert_eq!(top.length.value, 100.0);
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        // Two stacked cells share the edge at y=50.
        let index = GeometryIndex::from_rects(&[
            Rect::new(0.0, 20.0, 100.0, 30.0),
            Rect::new(0.0, 50.0, 100.0, 30.0),
        ]);
        assert_eq!(index.horizontal.len(), 3);
        assert_eq!(index.vertical.len(), 4);
    }

    #[test]
    fn near_duplicates_within_margin_are_merged() {
        let index = GeometryIndex::from_rects(&[
            Rect::new(0.0, 20.0, 100.0, 30.0),
            Rect::new(0.5, 20.4, 99.8, 30.1),
        ]);
        assert_eq!(index.horizontal.len(), 2);
        assert_eq!(index.vertical.len(), 2);
    }

    #[test]
    fn zero_length_segments_are_discarded() {
        // A flat rectangle drawing a horizontal border: its short sides vanish.
        let index = GeometryIndex::from_rects(&[Rect::new(0.0, 50.0, 200.0, 0.5)]);
        assert!(index.vertical.is_empty());
        assert!(index.horizontal.iter().all(|s| !s.length.is_negligible()));
        // Bottom and top of the flat rectangle collapse into one segment.
        assert_eq!(index.horizontal.len(), 1);
    }

    #[test]
    fn horizontal_segments_sorted_by_scanline_then_x() {
        let index = GeometryIndex::from_rects(&[
            Rect::new(100.0, 50.0, 80.0, 20.0),
            Rect::new(0.0, 50.0, 100.0, 20.0),
            Rect::new(0.0, 10.0, 180.0, 20.0),
        ]);
        let order: Vec<(f64, f64)> = index
            .horizontal
            .iter()
            .map(|s| (s.y.value, s.x.value))
            .collect();
        assert_eq!(
            order,
            vec![
                (10.0, 0.0),
                (30.0, 0.0),
                (50.0, 0.0),
                (50.0, 100.0),
                (70.0, 0.0),
                (70.0, 100.0)
            ]
        );
        assert_eq!(index.scanlines, vec![0, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn scanline_clusters_tolerate_jitter() {
        let index = GeometryIndex::from_rects(&[
            Rect::new(100.0, 50.8, 80.0, 20.0),
            Rect::new(0.0, 50.0, 100.0, 20.0),
        ]);
        let xs: Vec<f64> = index.horizontal.iter().map(|s| s.x.value).collect();
        assert_eq!(xs, vec![0.0, 100.0, 0.0, 100.0]);
        assert_eq!(index.scanlines, vec![0, 0, 1, 1]);
    }

    #[test]
    fn verticals_at_matches_origin() {
        let index = GeometryIndex::from_rects(&[
            Rect::new(0.0, 20.0, 100.0, 30.0),
            Rect::new(0.0, 50.0, 100.0, 30.0),
        ]);
        assert_eq!(index.verticals_at(Approx::new(20.0)).len(), 2);
        assert_eq!(index.verticals_at(Approx::new(51.0)).len(), 2);
        assert!(index.verticals_at(Approx::new(80.0)).is_empty());
    }

    #[test]
    fn empty_page() {
        let index = GeometryIndex::from_rects(&[]);
        assert!(index.horizontal.is_empty());
        assert!(index.vertical.is_empty());
    }
}
