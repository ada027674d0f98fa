//! Binding positioned text runs into table cells.

use std::cmp::Reverse;

use crate::coord::{Approx, cluster_ranks, raw_cmp};
use crate::geometry::{Rect, TextRun};
use crate::rows::Row;

impl Rect {
    /// Half-open containment: the left and bottom edges belong to the cell,
    /// the right and top edges do not.
    pub fn contains(&self, x: Approx, y: Approx) -> bool {
        self.x.approx_le(x)
            && x.approx_lt(self.x + self.w)
            && self.y.approx_le(y)
            && y.approx_lt(self.y + self.h)
    }

    /// Bind `run` to this cell if the cell contains its anchor.
    pub fn insert(&mut self, run: &TextRun) -> bool {
        if self.contains(run.x, run.y) {
            self.bound_text.push(run.clone());
            true
        } else {
            false
        }
    }

    /// The cell's text in reading order, without line breaks and trimmed.
    pub fn contents(&self) -> String {
        let text: String = reading_order(&self.bound_text)
            .into_iter()
            .map(|run| run.text.as_str())
            .collect();
        text.replace(['\n', '\r'], "").trim().to_string()
    }
}

/// Order text runs top line first, left to right within a line.
///
/// Lines are formed by clustering the runs' baselines, so runs whose y
/// coordinates are within the margin of each other share a line.
pub fn reading_order(runs: &[TextRun]) -> Vec<&TextRun> {
    let margin = runs.first().map_or(0.0, |r| r.y.margin);
    let ys: Vec<f64> = runs.iter().map(|r| r.y.value).collect();
    let lines = cluster_ranks(&ys, margin);

    let mut ordered: Vec<(Reverse<usize>, &TextRun)> =
        lines.into_iter().map(Reverse).zip(runs).collect();
    ordered.sort_by(|(la, a), (lb, b)| la.cmp(lb).then_with(|| raw_cmp(a.x, b.x)));
    ordered.into_iter().map(|(_, run)| run).collect()
}

/// Bind every text run to the cells containing it.
///
/// A run that falls outside every cell stays unbound.
pub fn bind_text(rows: &mut [Row], runs: &[TextRun]) {
    for run in runs {
        for row in rows.iter_mut() {
            for cell in &mut row.cells {
                cell.insert(run);
            }
        }
    }
}
