use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use rustc_hash::FxHashMap;

/// Visited map for searches that only need a predecessor link.
pub(crate) type Parents = FxHashMap<Position, Option<Position>>;

/// A resumable graph search over a [`Grid`].
///
/// Each call to [`step`](PathfindingAlgorithm::step) runs until one cell is
/// admitted to the visited set or the search terminates. The grid is passed
/// per step and read whenever a node's neighbors are computed, so the caller
/// may mutate it between steps. Once `Found` or `Exhausted` has been returned
/// the search is spent and keeps returning `Exhausted`.
pub trait PathfindingAlgorithm {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_>;

    fn algorithm(&self) -> Algorithm;
}

pub enum SearchStep<'s> {
    /// A cell was admitted to the visited set.
    Expanded(Expansion<'s>),
    /// Path from start to target, both inclusive.
    Found(Vec<Position>),
    /// Frontier or depth budget ran out without reaching the target.
    Exhausted,
}

/// Read-only view over a search's visited cells.
pub trait VisitedCells {
    fn contains_cell(&self, pos: &Position) -> bool;

    fn cell_count(&self) -> usize;

    fn cells(&self) -> Box<dyn Iterator<Item = Position> + '_>;
}

impl<T> VisitedCells for FxHashMap<Position, T> {
    fn contains_cell(&self, pos: &Position) -> bool {
        self.contains_key(pos)
    }

    fn cell_count(&self) -> usize {
        self.len()
    }

    fn cells(&self) -> Box<dyn Iterator<Item = Position> + '_> {
        Box::new(self.keys().copied())
    }
}

/// Progress event for one admitted cell.
pub struct Expansion<'s> {
    /// The cell just admitted.
    pub node: Position,
    /// Snapshot of the frontier right after admission, in the order the
    /// algorithm holds it.
    pub frontier: Vec<Position>,
    visited: &'s dyn VisitedCells,
}

impl<'s> Expansion<'s> {
    pub(crate) fn new(node: Position, frontier: Vec<Position>, visited: &'s dyn VisitedCells) -> Self {
        Expansion {
            node,
            frontier,
            visited,
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.cell_count()
    }

    pub fn is_visited(&self, pos: &Position) -> bool {
        self.visited.contains_cell(pos)
    }

    pub fn visited(&self) -> impl Iterator<Item = Position> + '_ {
        self.visited.cells()
    }
}

/// Drive `search` to completion on a fixed grid, reporting every expansion.
///
/// `on_expand` only observes; passing `|_| {}` yields the same path.
pub fn find_path<F>(
    search: &mut dyn PathfindingAlgorithm,
    grid: &Grid,
    mut on_expand: F,
) -> Option<Vec<Position>>
where
    F: FnMut(&Expansion<'_>),
{
    loop {
        match search.step(grid) {
            SearchStep::Expanded(expansion) => on_expand(&expansion),
            SearchStep::Found(path) => return Some(path),
            SearchStep::Exhausted => return None,
        }
    }
}

/// A node being expanded together with its neighbor list, which is computed
/// once when the node is opened.
pub(crate) struct Cursor {
    node: Position,
    neighbors: std::vec::IntoIter<Position>,
}

impl Cursor {
    pub(crate) fn open(node: Position, grid: &Grid) -> Self {
        Cursor {
            node,
            neighbors: grid.get_neighbors(&node).into_iter(),
        }
    }

    pub(crate) fn node(&self) -> Position {
        self.node
    }

    /// Next remaining neighbor accepted by `admit`, in neighbor-rule order.
    pub(crate) fn next_where(&mut self, admit: impl FnMut(&Position) -> bool) -> Option<Position> {
        self.neighbors.find(admit)
    }
}

/// Follow parent links back from `end` and return the path root..=end.
pub(crate) fn reconstruct_path<T>(
    visited: &FxHashMap<Position, T>,
    end: Position,
    parent: impl Fn(&T) -> Option<Position>,
) -> Vec<Position> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = visited.get(&current).and_then(&parent) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
