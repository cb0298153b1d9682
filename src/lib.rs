//! Grid pathfinding with live obstacle changes.
//!
//! Six uninformed searches (BFS, DFS, uniform-cost, depth-limited, iterative
//! deepening, bidirectional) share one 8-way neighbor rule and emit one
//! progress event per admitted cell. A [`simulation::Simulation`] walks the
//! resulting path and re-plans from the agent's cell whenever a dynamic
//! obstacle blocks the way.

pub mod agent;
pub mod algorithms;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod statistics;
pub mod view;

pub use algorithms::common::{find_path, Expansion, PathfindingAlgorithm, SearchStep};
pub use algorithms::{Algorithm, SearchLimits};
pub use error::{Result, SearchError};
pub use grid::{Cell, Grid, Position};
pub use simulation::{MoveStep, Observer, Phase, Silent, Simulation, Status};
pub use statistics::RunReport;
