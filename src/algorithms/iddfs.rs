use crate::algorithms::common::{PathfindingAlgorithm, SearchStep};
use crate::algorithms::dls::{Advance, DepthLimited};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use tracing::trace;

/// Default deepest limit tried by iterative deepening.
pub const DEFAULT_MAX_DEPTH: usize = 30;

/// Depth-limited search repeated with limits `0..=max_depth`.
///
/// Every round starts over with an empty visited map, so shallow cells are
/// re-expanded on each round. The first round that reaches the target wins.
pub struct IterativeDeepening {
    start: Position,
    target: Position,
    depth: usize,
    max_depth: usize,
    round: DepthLimited,
    done: bool,
}

impl IterativeDeepening {
    pub fn new(start: Position, target: Position, max_depth: usize) -> Self {
        IterativeDeepening {
            start,
            target,
            depth: 0,
            max_depth,
            round: DepthLimited::new(start, target, 0),
            done: false,
        }
    }

    /// Limit used by the round in progress.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl PathfindingAlgorithm for IterativeDeepening {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_> {
        if self.done {
            return SearchStep::Exhausted;
        }
        loop {
            match self.round.advance(grid) {
                Advance::Discovered(node) => return SearchStep::Expanded(self.round.expansion(node)),
                Advance::Found(path) => {
                    self.done = true;
                    return SearchStep::Found(path);
                }
                Advance::Exhausted if self.depth < self.max_depth => {
                    self.depth += 1;
                    trace!(depth = self.depth, "deepening");
                    self.round = DepthLimited::new(self.start, self.target, self.depth);
                }
                Advance::Exhausted => {
                    self.done = true;
                    return SearchStep::Exhausted;
                }
            }
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::IterativeDeepening
    }
}
