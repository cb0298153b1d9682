use crate::algorithms::common::{reconstruct_path, Cursor, Expansion, Parents, PathfindingAlgorithm, SearchStep};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use std::collections::VecDeque;

/// Breadth-first search with a FIFO frontier.
///
/// Cells are marked visited when they are enqueued, so each cell enters the
/// queue at most once and the first path to reach the target is shortest in
/// move count.
pub struct BreadthFirst {
    target: Position,
    queue: VecDeque<Position>,
    visited: Parents,
    cursor: Option<Cursor>,
    done: bool,
}

impl BreadthFirst {
    pub fn new(start: Position, target: Position) -> Self {
        let mut visited = Parents::default();
        visited.insert(start, None);
        BreadthFirst {
            target,
            queue: VecDeque::from([start]),
            visited,
            cursor: None,
            done: false,
        }
    }
}

impl PathfindingAlgorithm for BreadthFirst {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_> {
        if self.done {
            return SearchStep::Exhausted;
        }
        loop {
            if let Some(cursor) = self.cursor.as_mut() {
                let visited = &self.visited;
                if let Some(next) = cursor.next_where(|n| !visited.contains_key(n)) {
                    self.visited.insert(next, Some(cursor.node()));
                    self.queue.push_back(next);
                    let frontier = self.queue.iter().copied().collect();
                    return SearchStep::Expanded(Expansion::new(next, frontier, &self.visited));
                }
                self.cursor = None;
            }

            let Some(current) = self.queue.pop_front() else {
                self.done = true;
                return SearchStep::Exhausted;
            };
            if current == self.target {
                self.done = true;
                return SearchStep::Found(reconstruct_path(&self.visited, current, |p| *p));
            }
            self.cursor = Some(Cursor::open(current, grid));
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Bfs
    }
}
