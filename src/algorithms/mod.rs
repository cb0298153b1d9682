pub mod bfs;
pub mod bidirectional;
pub mod common;
pub mod dfs;
pub mod dls;
pub mod iddfs;
pub mod ucs;

use crate::error::{Result, SearchError};
use crate::grid::Position;
use bfs::BreadthFirst;
use bidirectional::Bidirectional;
use common::PathfindingAlgorithm;
use dfs::DepthFirst;
use dls::DepthLimited;
use iddfs::IterativeDeepening;
use std::fmt;
use ucs::UniformCost;

/// The six search strategies, numbered as the shell's run commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    Bfs = 1,
    Dfs = 2,
    Ucs = 3,
    #[value(name = "dls")]
    DepthLimited = 4,
    #[value(name = "iddfs")]
    IterativeDeepening = 5,
    Bidirectional = 6,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::DepthLimited,
        Algorithm::IterativeDeepening,
        Algorithm::Bidirectional,
    ];

    pub fn from_id(id: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == id)
            .ok_or(SearchError::UnknownAlgorithm(id))
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "Breadth-First (BFS)",
            Algorithm::Dfs => "Depth-First (DFS)",
            Algorithm::Ucs => "Uniform-Cost (UCS)",
            Algorithm::DepthLimited => "Depth-Limited (DLS)",
            Algorithm::IterativeDeepening => "Iterative Deep (IDDFS)",
            Algorithm::Bidirectional => "Bidirectional",
        }
    }

    /// Fresh search of this kind from `start` to `target`.
    pub fn create(
        self,
        start: Position,
        target: Position,
        limits: &SearchLimits,
    ) -> Box<dyn PathfindingAlgorithm> {
        match self {
            Algorithm::Bfs => Box::new(BreadthFirst::new(start, target)),
            Algorithm::Dfs => Box::new(DepthFirst::new(start, target)),
            Algorithm::Ucs => Box::new(UniformCost::new(start, target)),
            Algorithm::DepthLimited => Box::new(DepthLimited::new(start, target, limits.dls_limit)),
            Algorithm::IterativeDeepening => {
                Box::new(IterativeDeepening::new(start, target, limits.iddfs_max_depth))
            }
            Algorithm::Bidirectional => Box::new(Bidirectional::new(start, target)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.id(), self.name())
    }
}

/// Depth bounds for the depth-limited strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub dls_limit: usize,
    pub iddfs_max_depth: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            dls_limit: dls::DEFAULT_DEPTH_LIMIT,
            iddfs_max_depth: iddfs::DEFAULT_MAX_DEPTH,
        }
    }
}
