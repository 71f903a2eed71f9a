//! Rank-biased parent selection.
//!
//! # Algorithm
//!
//! Linear ranking: with bias `b` in `(1, 2]`, rank `i` of a population of
//! size `n` is drawn with a probability decreasing linearly from rank 0 to
//! rank `n - 1`. A uniform draw `u ∈ [0, 1)` is mapped to
//!
//! ```text
//! i = floor(n * (b - sqrt(b² - 4(b - 1)u)) / (2(b - 1)))
//! ```
//!
//! The larger the bias, the stronger the preference for the best members.
//!
//! # Reference
//!
//! Whitley, D. (1989). "The GENITOR algorithm and selection pressure",
//! *Proc. 3rd Int. Conf. on Genetic Algorithms*, 116-121.

use rand::Rng;

use super::manager::Population;

/// Draws one rank in `0..size`, favoring low ranks.
///
/// Returns 0 when `size` is 0 or 1.
pub fn linear_select<R: Rng>(size: usize, bias: f64, rng: &mut R) -> usize {
    if size <= 1 {
        return 0;
    }
    let u: f64 = rng.random();
    let idx = if bias <= 1.0 {
        size as f64 * u
    } else {
        let root = (bias * bias - 4.0 * (bias - 1.0) * u).max(0.0).sqrt();
        size as f64 * (bias - root) / (2.0 * (bias - 1.0))
    };
    (idx as usize).min(size - 1)
}

impl Population {
    /// Samples one member index with linear-ranking pressure `bias`.
    pub fn linear_select<R: Rng>(&self, bias: f64, rng: &mut R) -> usize {
        linear_select(self.len(), bias, rng)
    }

    /// Draws two distinct member indices, resampling the second on collision.
    ///
    /// Returns `None` when fewer than two members exist.
    pub fn select_parents<R: Rng>(&self, bias: f64, rng: &mut R) -> Option<(usize, usize)> {
        if self.len() < 2 {
            return None;
        }
        let first = self.linear_select(bias, rng);
        let mut second = self.linear_select(bias, rng);
        while second == first {
            second = self.linear_select(bias, rng);
        }
        Some((first, second))
    }
}
