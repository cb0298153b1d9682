use crate::algorithms::common::{reconstruct_path, Cursor, Expansion, PathfindingAlgorithm, SearchStep};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Cost of moving between two adjacent cells. Orthogonal and diagonal moves
/// cost the same.
fn step_cost(_from: Position, _to: Position) -> u32 {
    1
}

/// Best known cost to a cell and the cell it was reached from.
#[derive(Clone, Copy, Debug)]
struct Reached {
    cost: u32,
    parent: Option<Position>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct QueueEntry {
    cost: u32,
    seq: u64,
    pos: Position,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior; equal costs pop in insertion order.
        other.cost.cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Uniform-cost search over a min-priority frontier.
///
/// A cheaper route to a known cell overwrites its entry and pushes a second
/// queue entry instead of decreasing the old key; the stale entry stays in
/// the heap.
pub struct UniformCost {
    target: Position,
    queue: BinaryHeap<QueueEntry>,
    visited: FxHashMap<Position, Reached>,
    cursor: Option<(Cursor, u32)>,
    next_seq: u64,
    done: bool,
}

impl UniformCost {
    pub fn new(start: Position, target: Position) -> Self {
        let mut visited = FxHashMap::default();
        visited.insert(start, Reached { cost: 0, parent: None });
        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry {
            cost: 0,
            seq: 0,
            pos: start,
        });
        UniformCost {
            target,
            queue,
            visited,
            cursor: None,
            next_seq: 1,
            done: false,
        }
    }

    fn frontier(&self) -> Vec<Position> {
        let mut entries: Vec<&QueueEntry> = self.queue.iter().collect();
        entries.sort_by_key(|entry| (entry.cost, entry.seq));
        entries.into_iter().map(|entry| entry.pos).collect()
    }
}

impl PathfindingAlgorithm for UniformCost {
    fn step(&mut self, grid: &Grid) -> SearchStep<'_> {
        if self.done {
            return SearchStep::Exhausted;
        }
        loop {
            if let Some((cursor, cost)) = self.cursor.as_mut() {
                let (from, cost) = (cursor.node(), *cost);
                let visited = &self.visited;
                let admitted = cursor.next_where(|n| match visited.get(n) {
                    None => true,
                    Some(known) => cost + step_cost(from, *n) < known.cost,
                });
                if let Some(next) = admitted {
                    let new_cost = cost + step_cost(from, next);
                    self.visited.insert(
                        next,
                        Reached {
                            cost: new_cost,
                            parent: Some(from),
                        },
                    );
                    self.queue.push(QueueEntry {
                        cost: new_cost,
                        seq: self.next_seq,
                        pos: next,
                    });
                    self.next_seq += 1;
                    let frontier = self.frontier();
                    return SearchStep::Expanded(Expansion::new(next, frontier, &self.visited));
                }
                self.cursor = None;
            }

            let Some(QueueEntry { cost, pos, .. }) = self.queue.pop() else {
                self.done = true;
                return SearchStep::Exhausted;
            };
            if pos == self.target {
                self.done = true;
                return SearchStep::Found(reconstruct_path(&self.visited, pos, |r| r.parent));
            }
            self.cursor = Some((Cursor::open(pos, grid), cost));
        }
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Ucs
    }
}
