use crate::algorithms::common::{reconstruct_path, Cursor, Expansion, Parents, PathfindingAlgorithm, SearchStep};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};

/// Depth-first search with a LIFO frontier.
///
/// Neighbors are pushed in rule order, so the last one enumerated is the
/// first one popped. Visited-on-discovery, no shortest-path guarantee.
pub struct DepthFirst {
    target: Position,
    stack: Vec<Position>,
    visited: Parents,
    cursor: Option<Cursor>,
    done: bool,
}

impl DepthFirst {
    pub fn new(start: Position, target: Position) -> Self {
        let mut visited = Parents::default();
        visited.insert(start, None);
        DepthFirst {
            target,
            stack: vec![start],
            visited,
            cursor: None,
            done: false,
        }
    }
}

impl PathfindingAlgorithm for DepthFirst {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_> {
        if self.done {
            return SearchStep::Exhausted;
        }
        loop {
            if let Some(cursor) = self.cursor.as_mut() {
                let visited = &self.visited;
                if let Some(next) = cursor.next_where(|n| !visited.contains_key(n)) {
                    self.visited.insert(next, Some(cursor.node()));
                    self.stack.push(next);
                    return SearchStep::Expanded(Expansion::new(next, self.stack.clone(), &self.visited));
                }
                self.cursor = None;
            }

            let Some(current) = self.stack.pop() else {
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
        Algorithm::Dfs
    }
}
