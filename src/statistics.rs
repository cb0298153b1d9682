use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};
use crate::simulation::Status;
use pathfinding::prelude::bfs;
use std::fmt;

/// Fewest moves from `start` to `target` on the current grid, ignoring
/// future obstacle spawns.
pub fn optimal_path_length(grid: &Grid, start: Position, target: Position) -> Option<usize> {
    bfs(&start, |pos| grid.get_neighbors(pos), |pos| *pos == target).map(|path| path.len() - 1)
}

/// Counters collected over one run, including every re-plan.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub status: Status,
    /// Most recently computed path.
    pub path: Option<Vec<Position>>,
    /// Visited-set size at the last expansion of the last search.
    pub nodes_visited: usize,
    /// Cells in `path`, both ends included.
    pub path_length: usize,
    /// Expansion events over all searches of the run.
    pub expansions: usize,
    pub searches: usize,
    pub replans: usize,
    pub moves: usize,
    pub trail: Vec<Position>,
    /// Shortest move count when the run started.
    pub optimal_path_length: Option<usize>,
}

impl RunReport {
    pub fn new(algorithm: Algorithm, optimal_path_length: Option<usize>) -> Self {
        RunReport {
            algorithm,
            status: Status::Searching,
            path: None,
            nodes_visited: 0,
            path_length: 0,
            expansions: 0,
            searches: 0,
            replans: 0,
            moves: 0,
            trail: Vec::new(),
            optimal_path_length,
        }
    }

    pub fn reached(&self) -> bool {
        self.status == Status::TargetReached
    }

    /// Moves taken per optimal move; 0.0 when either is unknown.
    pub fn route_efficiency(&self) -> f64 {
        match self.optimal_path_length {
            Some(optimal) if optimal > 0 && self.moves > 0 => self.moves as f64 / optimal as f64,
            _ => 0.0,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Nodes Visited: {}", self.nodes_visited)?;
        writeln!(f, "Path Length: {}", self.path_length)?;
        writeln!(f, "Total Expansions: {}", self.expansions)?;
        writeln!(f, "Searches: {} (re-plans: {})", self.searches, self.replans)?;
        writeln!(f, "Total Moves: {}", self.moves)?;
        match self.optimal_path_length {
            Some(optimal) => writeln!(f, "Optimal Path Length: {}", optimal)?,
            None => writeln!(f, "Optimal Path Length: unreachable")?,
        }
        if self.reached() {
            writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency())?;
        }
        Ok(())
    }
}

/// Print one table row per run, then the best performers.
pub fn print_comparison(results: &[RunReport]) {
    println!("\n=== ALGORITHM COMPARISON RESULTS ===");
    println!();
    println!(
        "{:<24} {:<8} {:<8} {:<8} {:<12} {:<12} {:<8}",
        "Algorithm", "Success", "Moves", "Optimal", "Efficiency", "Expansions", "Replans"
    );
    println!("{}", "-".repeat(86));

    for result in results {
        let success_str = if result.reached() { "✓" } else { "✗" };
        let optimal_str = result
            .optimal_path_length
            .map_or_else(|| "-".to_string(), |optimal| optimal.to_string());
        println!(
            "{:<24} {:<8} {:<8} {:<8} {:<12.3} {:<12} {:<8}",
            result.algorithm.name(),
            success_str,
            result.moves,
            optimal_str,
            result.route_efficiency(),
            result.expansions,
            result.replans
        );
    }
    println!();

    let successful: Vec<&RunReport> = results.iter().filter(|r| r.reached()).collect();
    let Some(best_moves) = successful.iter().min_by_key(|r| r.moves) else {
        println!("No algorithms successfully reached the target.");
        return;
    };
    let Some(fewest_expansions) = successful.iter().min_by_key(|r| r.expansions) else {
        return;
    };

    println!("=== PERFORMANCE ANALYSIS ===");
    println!("Best by moves: {} ({} moves)", best_moves.algorithm.name(), best_moves.moves);
    println!(
        "Fewest expansions: {} ({} expansions)",
        fewest_expansions.algorithm.name(),
        fewest_expansions.expansions
    );
}
