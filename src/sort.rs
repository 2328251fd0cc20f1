//! Depth sorting: a topological sort over the pairwise "behind" relation.
//!
//! Every pair of blocks is compared with [`front_block`]; the block in front
//! must be drawn after the one behind it. The resulting order is produced with
//! Kahn's algorithm over an explicit frontier of blocks whose behind-set has
//! been fully drawn.
//!
//! All scratch state lives in a [`SortScratch`] owned by one call and indexed
//! by position in the input slice.

use crate::log::{debug, trace, warn};
use crate::occlusion::front_block;
use crate::types::{Block, Front};

/// Result of one sort pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawOrder {
    /// Indices into the sorted slice, back to front.
    pub order: Vec<usize>,
    /// Blocks released early to break an occlusion cycle, in release order.
    /// Empty whenever the behind relation is acyclic.
    pub forced: Vec<usize>,
    /// Number of front/behind pairs found.
    pub edges: usize,
}

impl DrawOrder {
    /// True if every pairwise constraint was honored.
    pub fn is_exact(&self) -> bool {
        self.forced.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Waiting,
    Queued,
    Drawn,
}

/// Per-pass bookkeeping, discarded when the pass ends.
#[derive(Debug)]
struct SortScratch {
    /// Number of not-yet-drawn blocks behind each block.
    behind: Vec<usize>,
    /// Blocks in front of each block.
    in_front: Vec<Vec<usize>>,
    /// Blocks behind each block.
    behind_of: Vec<Vec<usize>>,
    marks: Vec<Mark>,
    edges: usize,
}

impl SortScratch {
    fn new(len: usize) -> Self {
        Self {
            behind: vec![0; len],
            in_front: vec![Vec::new(); len],
            behind_of: vec![Vec::new(); len],
            marks: vec![Mark::Waiting; len],
            edges: 0,
        }
    }

    fn record(&mut self, front: usize, behind: usize) {
        self.behind[front] += 1;
        self.in_front[behind].push(front);
        self.behind_of[front].push(behind);
        self.edges += 1;
    }

    /// Put `index` on the frontier.
    fn queue(&mut self, index: usize, frontier: &mut Vec<usize>) {
        self.marks[index] = Mark::Queued;
        frontier.push(index);
    }

    /// The lowest-index block on an occlusion cycle among waiting blocks.
    ///
    /// Only meaningful once the frontier is empty: every waiting block then
    /// waits on another waiting block, so walking the lowest-index waiting
    /// block behind each one must revisit a block.
    fn cycle_member(&self) -> Option<usize> {
        let start = self.marks.iter().position(|m| *m == Mark::Waiting)?;
        let mut path = vec![start];
        let mut current = start;
        loop {
            let Some(next) = self.behind_of[current]
                .iter()
                .copied()
                .filter(|&b| self.marks[b] == Mark::Waiting)
                .min()
            else {
                return Some(current);
            };
            if let Some(pos) = path.iter().position(|&p| p == next) {
                return path[pos..].iter().copied().min();
            }
            path.push(next);
            current = next;
        }
    }
}

/// Sort blocks into a valid back-to-front draw order.
///
/// The pairwise relation is built exhaustively, O(n^2) in the block count.
/// Among blocks that are eligible at the same time the order is unspecified.
/// If the relation has a cycle, the lowest-index block on that cycle is
/// released and listed in [`DrawOrder::forced`]; blocks merely waiting on a
/// cycle keep their constraints. The output is always a permutation of the
/// input.
pub fn sort_blocks(blocks: &[Block]) -> DrawOrder {
    let len = blocks.len();
    let mut scratch = SortScratch::new(len);

    for (i, a) in blocks.iter().enumerate() {
        for (j, b) in blocks.iter().enumerate().skip(i + 1) {
            match front_block(a, b) {
                Some(Front::First) => scratch.record(i, j),
                Some(Front::Second) => scratch.record(j, i),
                None => {
                    trace!(i, j, "blocks intersect, no front");
                }
            }
        }
    }

    // Blocks with nothing behind them can be drawn right away.
    let mut frontier = Vec::with_capacity(len);
    for index in 0..len {
        if scratch.behind[index] == 0 {
            scratch.queue(index, &mut frontier);
        }
    }

    let mut out = DrawOrder {
        order: Vec::with_capacity(len),
        forced: Vec::new(),
        edges: scratch.edges,
    };

    loop {
        while let Some(index) = frontier.pop() {
            scratch.marks[index] = Mark::Drawn;
            out.order.push(index);

            // Blocks in front of the one just drawn stop waiting on it.
            for k in 0..scratch.in_front[index].len() {
                let front = scratch.in_front[index][k];
                if scratch.marks[front] != Mark::Waiting {
                    continue;
                }
                scratch.behind[front] -= 1;
                if scratch.behind[front] == 0 {
                    scratch.queue(front, &mut frontier);
                }
            }
        }

        if out.order.len() == len {
            break;
        }

        // Frontier exhausted with blocks left: the relation has a cycle.
        let Some(stuck) = scratch.cycle_member() else {
            break;
        };
        warn!(
            block = stuck,
            waiting_on = scratch.behind[stuck],
            "occlusion cycle, releasing block early"
        );
        out.forced.push(stuck);
        scratch.queue(stuck, &mut frontier);
    }

    debug!(
        blocks = len,
        edges = out.edges,
        forced = out.forced.len(),
        "depth sort finished"
    );
    out
}
