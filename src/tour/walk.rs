//! Finite traversal over a successor chain.

/// Lazy walk over a circular successor chain, starting at an anchor node and
/// stopping just before the anchor is revisited.
///
/// The walk yields at most `successors.len()` nodes, so it terminates even on
/// a chain that is not a single cycle.
///
/// # Examples
///
/// ```
/// use u_tsp::tour::Walk;
///
/// // 0 → 2 → 1 → 3 → 0
/// let suc = [2, 3, 1, 0];
/// let nodes: Vec<usize> = Walk::new(&suc, 0).collect();
/// assert_eq!(nodes, vec![0, 2, 1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    successors: &'a [usize],
    anchor: usize,
    next: Option<usize>,
    remaining: usize,
}

impl<'a> Walk<'a> {
    pub fn new(successors: &'a [usize], anchor: usize) -> Self {
        let next = (anchor < successors.len()).then_some(anchor);
        Self {
            successors,
            anchor,
            next,
            remaining: successors.len(),
        }
    }

    /// Returns the node this walk started from.
    pub fn anchor(&self) -> usize {
        self.anchor
    }
}

impl Iterator for Walk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        if self.remaining == 0 {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        let succ = self.successors[current];
        self.next = (succ != self.anchor).then_some(succ);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (1.min(self.remaining), Some(self.remaining)),
            None => (0, Some(0)),
        }
    }
}

/// Walks a chain of directed edges `(node, successor)` from the anchor.
pub fn edges(successors: &[usize], anchor: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    Walk::new(successors, anchor).map(move |v| (v, successors[v]))
}
