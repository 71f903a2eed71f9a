//! Segment transcription merge.
//!
//! # Algorithm
//!
//! A subpath `s … e` of the live tour can be replaced by any other
//! Hamiltonian path over the same nodes with the same endpoints without
//! touching the rest of the tour. The reference tour offers such a path
//! whenever the subpath's node set occupies a contiguous arc of the
//! reference, starting at `s` and ending at `e` in either direction.
//!
//! For each start position the subpath is grown one node at a time while
//! tracking the farthest reference offset of its nodes from `s`, forward and
//! backward. The node set is a contiguous arc exactly when that offset equals
//! the subpath length minus one. If the reference arc is cheaper, it is
//! copied in and the scan restarts.

use tracing::trace;

use super::TourMerger;
use crate::error::Result;
use crate::models::{Cost, Instance};
use crate::tour::{validate_successors, TourStore, Walk, FIRST_NODE};

/// Merges by copying cheaper subpaths of the reference tour.
#[derive(Debug, Clone)]
pub struct SegmentTranscription {
    max_segment: usize,
}

/// A subpath of the live order that the reference covers more cheaply.
struct Transcription {
    start: usize,
    len: usize,
    backward: bool,
    gain: i64,
}

impl SegmentTranscription {
    /// Longest subpath examined by default.
    pub const DEFAULT_MAX_SEGMENT: usize = 50;

    pub fn new() -> Self {
        Self {
            max_segment: Self::DEFAULT_MAX_SEGMENT,
        }
    }

    pub fn with_max_segment(mut self, max_segment: usize) -> Self {
        self.max_segment = max_segment.max(3);
        self
    }

    fn find_improving(
        &self,
        instance: &Instance,
        order: &[usize],
        reference: &[usize],
        ref_pos: &[usize],
    ) -> Option<Transcription> {
        let n = order.len();
        let max_len = self.max_segment.min(n - 1);

        for start in 0..n {
            let s = order[start];
            let base = ref_pos[s];
            let mut reach_fwd = 0;
            let mut reach_bwd = 0;
            let mut live_cost = 0i64;

            for len in 2..=max_len {
                let prev = order[(start + len - 2) % n];
                let e = order[(start + len - 1) % n];
                live_cost += instance.cost(prev, e);

                let fwd = (ref_pos[e] + n - base) % n;
                let bwd = (base + n - ref_pos[e]) % n;
                reach_fwd = reach_fwd.max(fwd);
                reach_bwd = reach_bwd.max(bwd);

                if len < 3 {
                    continue;
                }
                for (backward, reach, offset) in [(false, reach_fwd, fwd), (true, reach_bwd, bwd)] {
                    if reach != len - 1 || offset != len - 1 {
                        continue;
                    }
                    let ref_cost = arc_cost(instance, reference, base, len, backward);
                    if ref_cost < live_cost {
                        return Some(Transcription {
                            start,
                            len,
                            backward,
                            gain: ref_cost - live_cost,
                        });
                    }
                }
            }
        }
        None
    }
}

impl Default for SegmentTranscription {
    fn default() -> Self {
        Self::new()
    }
}

impl TourMerger for SegmentTranscription {
    fn merge(
        &mut self,
        instance: &Instance,
        tour: &mut TourStore,
        cost: Cost,
        other: &[usize],
    ) -> Result<Cost> {
        let n = tour.len();
        validate_successors(other, n)?;

        let reference: Vec<usize> = Walk::new(other, FIRST_NODE).collect();
        let mut ref_pos = vec![0; n];
        for (i, &v) in reference.iter().enumerate() {
            ref_pos[v] = i;
        }

        let mut order = tour.order();
        let mut total_gain = 0i64;
        let mut applied = 0usize;
        while let Some(t) = self.find_improving(instance, &order, &reference, &ref_pos) {
            let base = ref_pos[order[t.start]];
            for k in 0..t.len {
                let at = if t.backward {
                    (base + n - k) % n
                } else {
                    (base + k) % n
                };
                order[(t.start + k) % n] = reference[at];
            }
            total_gain += t.gain;
            applied += 1;
        }

        trace!(applied, gain = total_gain, "segment transcription");

        if total_gain < 0 {
            tour.set_order(&order)?;
            Ok(cost + Cost::new(total_gain))
        } else {
            Ok(cost)
        }
    }
}

/// Cost of the `len`-node reference arc starting at position `base`.
fn arc_cost(instance: &Instance, reference: &[usize], base: usize, len: usize, backward: bool) -> i64 {
    let n = reference.len();
    let at = |k: usize| {
        if backward {
            reference[(base + n - k) % n]
        } else {
            reference[(base + k) % n]
        }
    };
    (0..len - 1).map(|k| instance.cost(at(k), at(k + 1))).sum()
}
