use crate::algorithms::common::{reconstruct_path, Cursor, Expansion, Parents, PathfindingAlgorithm, SearchStep};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

struct Frontier {
    queue: VecDeque<Position>,
    visited: Parents,
}

impl Frontier {
    fn rooted_at(root: Position) -> Self {
        let mut visited = Parents::default();
        visited.insert(root, None);
        Frontier {
            queue: VecDeque::from([root]),
            visited,
        }
    }
}

/// Two breadth-first searches, one from each end.
///
/// Every round opens one forward node and then one backward node, whatever
/// the frontier sizes. Each enumerated neighbor is tested against the
/// opposite visited map as soon as it is seen; the first hit is the meeting
/// node.
pub struct Bidirectional {
    forward: Frontier,
    backward: Frontier,
    side: Side,
    cursor: Option<Cursor>,
    meeting: Option<Position>,
    done: bool,
}

impl Bidirectional {
    pub fn new(start: Position, target: Position) -> Self {
        Bidirectional {
            forward: Frontier::rooted_at(start),
            backward: Frontier::rooted_at(target),
            side: Side::Forward,
            cursor: None,
            meeting: (start == target).then_some(start),
            done: false,
        }
    }

    fn frontier(&self, side: Side) -> &Frontier {
        match side {
            Side::Forward => &self.forward,
            Side::Backward => &self.backward,
        }
    }

    /// Forward path to `meeting` followed by the reversed backward path,
    /// with `meeting` appearing once.
    fn join(&self, meeting: Position) -> Vec<Position> {
        let mut path = reconstruct_path(&self.forward.visited, meeting, |p| *p);
        path.pop();
        let mut back = reconstruct_path(&self.backward.visited, meeting, |p| *p);
        back.reverse();
        path.extend(back);
        path
    }
}

impl PathfindingAlgorithm for Bidirectional {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_> {
        if self.done {
            return SearchStep::Exhausted;
        }
        loop {
            if let Some(meeting) = self.meeting.take() {
                self.done = true;
                return SearchStep::Found(self.join(meeting));
            }

            if let Some(cursor) = self.cursor.as_mut() {
                let Some(next) = cursor.next_where(|_| true) else {
                    self.cursor = None;
                    self.side = match self.side {
                        Side::Forward => Side::Backward,
                        Side::Backward => Side::Forward,
                    };
                    continue;
                };
                let from = cursor.node();

                let (own, other) = match self.side {
                    Side::Forward => (&mut self.forward, &self.backward),
                    Side::Backward => (&mut self.backward, &self.forward),
                };
                let discovered = !own.visited.contains_key(&next);
                if discovered {
                    own.visited.insert(next, Some(from));
                    own.queue.push_back(next);
                }
                let meets = other.visited.contains_key(&next);

                if discovered {
                    if meets {
                        self.meeting = Some(next);
                    }
                    let own = self.frontier(self.side);
                    let frontier = own.queue.iter().copied().collect();
                    return SearchStep::Expanded(Expansion::new(next, frontier, &own.visited));
                }
                if meets {
                    self.done = true;
                    return SearchStep::Found(self.join(next));
                }
                continue;
            }

            if self.side == Side::Forward
                && (self.forward.queue.is_empty() || self.backward.queue.is_empty())
            {
                self.done = true;
                return SearchStep::Exhausted;
            }
            let own = match self.side {
                Side::Forward => &mut self.forward,
                Side::Backward => &mut self.backward,
            };
            let Some(node) = own.queue.pop_front() else {
                self.done = true;
                return SearchStep::Exhausted;
            };
            self.cursor = Some(Cursor::open(node, grid));
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Bidirectional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::find_path;

    #[test]
    fn same_cell_is_a_single_step_path() {
        let grid = Grid::new(3);
        let cell = Position::new(1, 1);
        let mut search = Bidirectional::new(cell, cell);
        assert_eq!(find_path(&mut search, &grid, |_| {}), Some(vec![cell]));
    }

    #[test]
    fn adjacent_cells_meet_on_the_target() {
        let grid = Grid::new(3);
        let (start, target) = (Position::new(0, 0), Position::new(0, 1));
        let mut search = Bidirectional::new(start, target);
        let mut events = 0;
        let path = find_path(&mut search, &grid, |_| events += 1);
        assert_eq!(path, Some(vec![start, target]));
        assert_eq!(events, 1);
    }

    #[test]
    fn sides_alternate_per_round() {
        let grid = Grid::new(5);
        let (start, target) = (Position::new(0, 0), Position::new(4, 4));
        let mut search = Bidirectional::new(start, target);
        let mut first_nodes = Vec::new();
        find_path(&mut search, &grid, |e| first_nodes.push(e.node));
        // Forward root discovers its three neighbors before the backward root
        // gets its turn.
        assert_eq!(&first_nodes[..3], &[Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)]);
        assert_eq!(first_nodes[3], Position::new(3, 4));
    }
}
