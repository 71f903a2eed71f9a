//! Bounded tour cost with unbounded sentinels.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Total tour length as a bounded signed integer.
///
/// The two extreme values act as sentinels: [`Cost::PLUS_INFINITY`] means
/// "no tour yet" and [`Cost::MINUS_INFINITY`] means "no optimum known".
/// Addition saturates, so sums never wrap past a sentinel and every
/// comparison stays well-defined.
///
/// # Examples
///
/// ```
/// use u_tsp::models::Cost;
///
/// let c = Cost::new(110);
/// assert!(c < Cost::PLUS_INFINITY);
/// assert_eq!(c.gap_percent(Cost::new(100)), Some(10.0));
/// assert_eq!(c.gap_percent(Cost::ZERO), None);
/// assert_eq!(Cost::PLUS_INFINITY + Cost::new(1), Cost::PLUS_INFINITY);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cost(i64);

impl Cost {
    /// Unbounded above: no tour has been found.
    pub const PLUS_INFINITY: Cost = Cost(i64::MAX);
    /// Unbounded below: no optimum reference is known.
    pub const MINUS_INFINITY: Cost = Cost(i64::MIN);
    pub const ZERO: Cost = Cost(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns `true` unless this is one of the two sentinels.
    pub fn is_finite(self) -> bool {
        self != Self::PLUS_INFINITY && self != Self::MINUS_INFINITY
    }

    pub fn saturating_sub(self, rhs: Cost) -> Cost {
        Cost(self.0.saturating_sub(rhs.0))
    }

    /// Percentage deviation `100 * (self - optimum) / optimum`.
    ///
    /// `None` when the optimum is unbounded below or exactly zero, or when
    /// this cost is itself a sentinel.
    pub fn gap_percent(self, optimum: Cost) -> Option<f64> {
        if optimum == Self::MINUS_INFINITY || optimum == Self::ZERO || !self.is_finite() {
            return None;
        }
        let diff = self.0 as f64 - optimum.0 as f64;
        Some(100.0 * diff / optimum.0 as f64)
    }
}

impl From<i64> for Cost {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PLUS_INFINITY => write!(f, "+inf"),
            Self::MINUS_INFINITY => write!(f, "-inf"),
            Cost(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_ordering() {
        assert!(Cost::MINUS_INFINITY < Cost::new(i64::MIN + 1));
        assert!(Cost::new(i64::MAX - 1) < Cost::PLUS_INFINITY);
        assert!(Cost::MINUS_INFINITY < Cost::PLUS_INFINITY);
    }

    #[test]
    fn test_saturating_add() {
        assert_eq!(Cost::PLUS_INFINITY + Cost::new(5), Cost::PLUS_INFINITY);
        assert_eq!(Cost::MINUS_INFINITY + Cost::new(-5), Cost::MINUS_INFINITY);
        assert_eq!(Cost::new(2) + Cost::new(3), Cost::new(5));
    }

    #[test]
    fn test_sum() {
        let total: Cost = [1, 2, 3].into_iter().map(Cost::new).sum();
        assert_eq!(total, Cost::new(6));
    }

    #[test]
    fn test_gap_guards() {
        assert_eq!(Cost::new(50).gap_percent(Cost::MINUS_INFINITY), None);
        assert_eq!(Cost::new(50).gap_percent(Cost::ZERO), None);
        assert_eq!(Cost::PLUS_INFINITY.gap_percent(Cost::new(10)), None);
    }

    #[test]
    fn test_gap_value() {
        let gap = Cost::new(105).gap_percent(Cost::new(100)).expect("finite");
        assert!((gap - 5.0).abs() < 1e-12);
        let below = Cost::new(95).gap_percent(Cost::new(100)).expect("finite");
        assert!((below + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::PLUS_INFINITY.to_string(), "+inf");
        assert_eq!(Cost::MINUS_INFINITY.to_string(), "-inf");
        assert_eq!(Cost::new(42).to_string(), "42");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Cost::new(7)).expect("serialize");
        assert_eq!(json, "7");
        let back: Cost = serde_json::from_str("7").expect("deserialize");
        assert_eq!(back, Cost::new(7));
    }
}
