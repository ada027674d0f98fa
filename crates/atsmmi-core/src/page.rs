//! One page of a document: primitives in, reading-order rows out.

use crate::coord::DEFAULT_MARGIN;
use crate::error::StructuralMismatch;
use crate::geometry::{GeometryIndex, Rect, TextRun};
use crate::rows::{Row, reconstruct_rows};
use crate::text::bind_text;

/// Options controlling how a page's primitives are compared.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageOptions {
    /// Tolerance margin for every geometric comparison, in points.
    pub margin: f64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
        }
    }
}

/// A processed page.
///
/// Owns the primitives it was built from, the boundary segments derived from
/// them and the reconstructed rows in top-to-bottom reading order.
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    rects: Vec<Rect>,
    texts: Vec<TextRun>,
    geometry: GeometryIndex,
    rows: Vec<Row>,
}

impl Page {
    /// Reconstruct the table rows of a page from raw primitives.
    ///
    /// `rects` are `(x, y, w, h)` and `texts` are `(x, y, text)` in page
    /// space, origin at the bottom-left corner.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralMismatch`] when the page's boundary segments do
    /// not form consistent rows.
    pub fn build(
        index: usize,
        rects: &[(f64, f64, f64, f64)],
        texts: &[(f64, f64, String)],
        options: &PageOptions,
    ) -> Result<Self, StructuralMismatch> {
        let margin = options.margin;
        let rects: Vec<Rect> = rects
            .iter()
            .map(|&(x, y, w, h)| Rect::with_margin(x, y, w, h, margin))
            .collect();
        let texts: Vec<TextRun> = texts
            .iter()
            .map(|(x, y, text)| TextRun::with_margin(*x, *y, text.clone(), margin))
            .collect();
        Self::from_primitives(index, rects, texts)
    }

    /// Like [`Page::build`], from already-typed primitives.
    pub fn from_primitives(
        index: usize,
        rects: Vec<Rect>,
        texts: Vec<TextRun>,
    ) -> Result<Self, StructuralMismatch> {
        let geometry = GeometryIndex::from_rects(&rects);
        let mut rows = reconstruct_rows(&geometry, index)?;
        bind_text(&mut rows, &texts);
        rows.reverse();

        Ok(Self {
            index,
            rects,
            texts,
            geometry,
            rows,
        })
    }

    /// 0-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    pub fn geometry(&self) -> &GeometryIndex {
        &self.geometry
    }

    /// Rows in top-to-bottom reading order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Give up the page, keeping only its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_row_table() -> Vec<(f64, f64, f64, f64)> {
        vec![
            (50.0, 700.0, 200.0, 20.0),
            (250.0, 700.0, 150.0, 20.0),
            (50.0, 680.0, 200.0, 20.0),
            (250.0, 680.0, 150.0, 20.0),
        ]
    }

    #[test]
    fn rows_come_out_top_to_bottom() {
        let texts = vec![
            (55.0, 705.0, "MMI_TOP".to_string()),
            (255.0, 705.0, "{1,%s}".to_string()),
            (55.0, 685.0, "MMI_BOTTOM".to_string()),
            (255.0, 685.0, "{2,%s}".to_string()),
        ];
        let page = Page::build(0, &two_row_table(), &texts, &PageOptions::default()).unwrap();
        let contents: Vec<Vec<String>> = page.rows().iter().map(Row::contents).collect();
        assert_eq!(
            contents,
            vec![
                vec!["MMI_TOP".to_string(), "{1,%s}".to_string()],
                vec!["MMI_BOTTOM".to_string(), "{2,%s}".to_string()],
            ]
        );
    }

    #[test]
    fn page_keeps_its_primitives() {
        let page = Page::build(
            3,
            &two_row_table(),
            &[(0.0, 0.0, "footer".to_string())],
            &PageOptions::default(),
        )
        .unwrap();
        assert_eq!(page.index(), 3);
        assert_eq!(page.rects().len(), 4);
        assert_eq!(page.texts().len(), 1);
        assert!(!page.geometry().horizontal().is_empty());
        assert_eq!(page.into_rows().len(), 2);
    }

    #[test]
    fn page_without_rectangles_has_no_rows() {
        let page = Page::build(
            0,
            &[],
            &[(10.0, 10.0, "text".to_string())],
            &PageOptions::default(),
        )
        .unwrap();
        assert!(page.rows().is_empty());
    }

    #[test]
    fn broken_table_reports_page_index() {
        let rects = vec![(0.0, 100.0, 50.0, 20.0), (80.0, 100.0, 50.0, 20.0)];
        let err = Page::build(7, &rects, &[], &PageOptions::default()).unwrap_err();
        assert_eq!(err.page, 7);
    }

    #[test]
    fn custom_margin_is_applied() {
        // A 1.5pt gap is tolerated with the default margin but not with 0.5.
        let rects = vec![(0.0, 100.0, 50.0, 20.0), (51.5, 100.0, 50.0, 20.0)];
        assert!(Page::build(0, &rects, &[], &PageOptions::default()).is_ok());
        assert!(Page::build(0, &rects, &[], &PageOptions { margin: 0.5 }).is_err());
    }
}
