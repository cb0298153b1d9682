use crate::algorithms::common::{Cursor, Expansion, Parents, PathfindingAlgorithm, SearchStep};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};

/// Default depth bound for depth-limited search.
pub const DEFAULT_DEPTH_LIMIT: usize = 20;

struct Frame {
    cursor: Cursor,
    /// Moves still allowed below this frame's node.
    remaining: usize,
}

/// Outcome of one internal advance, free of borrows so that callers wrapping
/// a [`DepthLimited`] can react before building the event.
pub(crate) enum Advance {
    Discovered(Position),
    Found(Vec<Position>),
    Exhausted,
}

/// Depth-first search bounded by a move limit.
///
/// Runs on an explicit frame stack instead of recursion. The visited map is
/// shared by the whole call: a cell first reached along a deep branch is not
/// reconsidered from a shallower one, so a path within the limit can be
/// missed.
pub struct DepthLimited {
    target: Position,
    frames: Vec<Frame>,
    /// Cell discovered by the previous step, opened on the next one.
    entering: Option<(Position, usize)>,
    visited: Parents,
    done: bool,
}

impl DepthLimited {
    pub fn new(start: Position, target: Position, limit: usize) -> Self {
        let mut visited = Parents::default();
        visited.insert(start, None);
        DepthLimited {
            target,
            frames: Vec::new(),
            entering: Some((start, limit)),
            visited,
            done: false,
        }
    }

    pub(crate) fn advance(&mut self, grid: &Grid) -> Advance {
        if self.done {
            return Advance::Exhausted;
        }
        loop {
            if let Some((node, remaining)) = self.entering.take() {
                if node == self.target {
                    self.done = true;
                    let mut path: Vec<Position> = self.frames.iter().map(|f| f.cursor.node()).collect();
                    path.push(node);
                    return Advance::Found(path);
                }
                if remaining > 0 {
                    self.frames.push(Frame {
                        cursor: Cursor::open(node, grid),
                        remaining,
                    });
                }
                continue;
            }

            let Some(frame) = self.frames.last_mut() else {
                self.done = true;
                return Advance::Exhausted;
            };
            let visited = &self.visited;
            match frame.cursor.next_where(|n| !visited.contains_key(n)) {
                Some(next) => {
                    self.visited.insert(next, Some(frame.cursor.node()));
                    self.entering = Some((next, frame.remaining - 1));
                    return Advance::Discovered(next);
                }
                None => {
                    self.frames.pop();
                }
            }
        }
    }

    /// Event for `node`. The frontier is the chain of open nodes from the
    /// start down to the deepest frame.
    pub(crate) fn expansion(&self, node: Position) -> Expansion<'_> {
        let open = self.frames.iter().map(|f| f.cursor.node()).collect();
        Expansion::new(node, open, &self.visited)
    }
}

impl PathfindingAlgorithm for DepthLimited {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_> {
        match self.advance(grid) {
            Advance::Discovered(node) => SearchStep::Expanded(self.expansion(node)),
            Advance::Found(path) => SearchStep::Found(path),
            Advance::Exhausted => SearchStep::Exhausted,
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::DepthLimited
    }
}
