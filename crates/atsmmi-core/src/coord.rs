//! Coordinates compared with a tolerance margin.
//!
//! Tables in ATS documents are drawn with slightly inexact coordinates for
//! the cell edges, so every geometric comparison in the pipeline goes through
//! [`Approx`] instead of raw `f64` comparison.

use std::cmp::Ordering;
use std::ops::{Add, Sub};

/// Default comparison margin, in PDF points.
pub const DEFAULT_MARGIN: f64 = 2.0;

/// A scalar carrying the margin it is compared with.
///
/// - `a.approx_lt(b)` iff `a.value + margin < b.value`
/// - `a.approx_le(b)` iff `a.value - margin < b.value`
/// - `a.approx_eq(b)` iff `|a.value - b.value| < margin`
///
/// The equality is reflexive and symmetric but **not transitive**: chains of
/// near-equal values can drift beyond the margin. Sorting therefore never
/// uses these comparisons directly; see [`cluster_ranks`]. The derived
/// `PartialEq` is exact structural equality.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Approx {
    /// The raw coordinate value.
    pub value: f64,
    /// Comparison margin.
    pub margin: f64,
}

impl Approx {
    /// Create a coordinate with the [`DEFAULT_MARGIN`].
    pub fn new(value: f64) -> Self {
        Self::with_margin(value, DEFAULT_MARGIN)
    }

    /// Create a coordinate with an explicit margin.
    pub fn with_margin(value: f64, margin: f64) -> Self {
        Self { value, margin }
    }

    /// Tolerant equality.
    pub fn approx_eq(self, other: Approx) -> bool {
        (self.value - other.value).abs() < self.margin
    }

    /// Tolerant strict less-than.
    pub fn approx_lt(self, other: Approx) -> bool {
        self.value + self.margin < other.value
    }

    /// Tolerant less-or-equal.
    pub fn approx_le(self, other: Approx) -> bool {
        self.value - self.margin < other.value
    }

    /// Whether this value is indistinguishable from zero.
    pub fn is_negligible(self) -> bool {
        self.value.abs() < self.margin
    }
}

impl Add for Approx {
    type Output = Approx;

    fn add(self, rhs: Approx) -> Approx {
        Approx::with_margin(self.value + rhs.value, self.margin)
    }
}

impl Sub for Approx {
    type Output = Approx;

    fn sub(self, rhs: Approx) -> Approx {
        Approx::with_margin(self.value - rhs.value, self.margin)
    }
}

impl std::fmt::Display for Approx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Assign each value a cluster rank usable as a total sort key.
///
/// Values are sorted, then grouped into clusters anchored at their smallest
/// member: a value joins the current cluster while it lies within `margin`
/// of the anchor. The returned vector holds, for each input position, the
/// ascending rank of its cluster. Two values with the same rank are
/// pairwise equal under [`Approx::approx_eq`].
pub fn cluster_ranks(values: &[f64], margin: f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0; values.len()];
    let mut rank = 0;
    let mut anchor: Option<f64> = None;
    for idx in order {
        let value = values[idx];
        match anchor {
            Some(a) if value - a < margin => {}
            Some(_) => {
                rank += 1;
                anchor = Some(value);
            }
            None => anchor = Some(value),
        }
        ranks[idx] = rank;
    }
    ranks
}

/// Total ordering on raw values, for tie-breaking inside a cluster.
pub fn raw_cmp(a: Approx, b: Approx) -> Ordering {
    a.value.total_cmp(&b.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_within_margin() {
        assert!(Approx::new(10.0).approx_eq(Approx::new(11.9)));
        assert!(!Approx::new(10.0).approx_eq(Approx::new(12.0)));
        assert!(Approx::new(10.0).approx_eq(Approx::new(10.0)));
    }

    #[test]
    fn less_than_requires_clear_gap() {
        assert!(Approx::new(10.0).approx_lt(Approx::new(12.5)));
        assert!(!Approx::new(10.0).approx_lt(Approx::new(12.0)));
        assert!(!Approx::new(10.0).approx_lt(Approx::new(10.0)));
    }

    #[test]
    fn less_or_equal_accepts_slack() {
        assert!(Approx::new(10.0).approx_le(Approx::new(10.0)));
        assert!(Approx::new(10.0).approx_le(Approx::new(8.5)));
        assert!(!Approx::new(10.0).approx_le(Approx::new(8.0)));
    }

    #[test]
    fn equality_is_not_transitive() {
        let a = Approx::new(0.0);
        let b = Approx::new(1.5);
        let c = Approx::new(3.0);
        assert!(a.approx_eq(b));
        assert!(b.approx_eq(c));
        assert!(!a.approx_eq(c));
    }

    #[test]
    fn negligible_lengths() {
        assert!(Approx::new(0.0).is_negligible());
        assert!(Approx::new(-1.0).is_negligible());
        assert!(!Approx::new(2.0).is_negligible());
    }

    #[test]
    fn arithmetic_keeps_margin() {
        let sum = Approx::with_margin(1.0, 0.5) + Approx::new(2.0);
        assert_eq!(sum.value, 3.0);
        assert_eq!(sum.margin, 0.5);
        let diff = Approx::with_margin(5.0, 0.5) - Approx::new(2.0);
        assert_eq!(diff.value, 3.0);
    }

    #[test]
    fn cluster_ranks_groups_nearby_values() {
        let ranks = cluster_ranks(&[100.0, 10.0, 10.5, 101.9, 50.0], 2.0);
        assert_eq!(ranks, vec![2, 0, 0, 2, 1]);
    }

    #[test]
    fn cluster_ranks_breaks_drifting_chains() {
        // 0.0 ~ 1.5 ~ 3.0 pairwise, but 3.0 is beyond the anchor's margin.
        let ranks = cluster_ranks(&[3.0, 1.5, 0.0], 2.0);
        assert_eq!(ranks, vec![1, 0, 0]);
    }

    #[test]
    fn cluster_ranks_empty() {
        assert!(cluster_ranks(&[], 2.0).is_empty());
    }
}
