use crate::algorithms::{Algorithm, SearchLimits};
use crate::error::{Result, SearchError};
use crate::grid::{Position, DEFAULT_OBSTACLE_CHANCE};
use crate::simulation::DEFAULT_MAX_REPLANS;
use crate::view::Speed;
use clap::{Parser, ValueEnum};

/// Initial map contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MapLayout {
    Empty,
    /// A single vertical demo wall.
    Wall,
    Maze,
    Scatter,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub grid_size: usize,

    #[arg(long, value_enum, default_value_t = Algorithm::Bfs)]
    pub algorithm: Algorithm,

    /// Run every algorithm on the same map and print a comparison.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    #[arg(long, default_value_t = 2)]
    pub start_row: usize,

    #[arg(long, default_value_t = 2)]
    pub start_col: usize,

    #[arg(long, default_value_t = 17)]
    pub target_row: usize,

    #[arg(long, default_value_t = 17)]
    pub target_col: usize,

    #[arg(long, value_enum, default_value_t = MapLayout::Wall)]
    pub layout: MapLayout,

    /// Share of cells sampled for walls by the scatter layout.
    #[arg(long, default_value_t = 0.25)]
    pub scatter_coverage: f64,

    /// Chance that a dynamic obstacle appears on each expansion or move.
    #[arg(long, default_value_t = DEFAULT_OBSTACLE_CHANCE)]
    pub obstacle_chance: f64,

    #[arg(long, default_value_t = crate::algorithms::dls::DEFAULT_DEPTH_LIMIT)]
    pub dls_limit: usize,

    #[arg(long, default_value_t = crate::algorithms::iddfs::DEFAULT_MAX_DEPTH)]
    pub iddfs_max_depth: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_REPLANS)]
    pub max_replans: usize,

    /// Seed for map generation and obstacle spawns.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Speed::Fast)]
    pub speed: Speed,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,
}

impl Config {
    pub fn start(&self) -> Position {
        Position::new(self.start_row, self.start_col)
    }

    pub fn target(&self) -> Position {
        Position::new(self.target_row, self.target_col)
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            dls_limit: self.dls_limit,
            iddfs_max_depth: self.iddfs_max_depth,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(SearchError::Config(format!(
                "grid size must be at least 2, got {}",
                self.grid_size
            )));
        }
        for (name, pos) in [("start", self.start()), ("target", self.target())] {
            if pos.row >= self.grid_size || pos.col >= self.grid_size {
                return Err(SearchError::Config(format!(
                    "{} {} is outside the {}x{} grid",
                    name, pos, self.grid_size, self.grid_size
                )));
            }
        }
        if self.start() == self.target() {
            return Err(SearchError::Config("start and target must differ".to_string()));
        }
        for (name, value) in [
            ("obstacle chance", self.obstacle_chance),
            ("scatter coverage", self.scatter_coverage),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SearchError::Config(format!(
                    "{} must be within 0..=1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_board() {
        let config = Config::parse_from(["dynamic_search"]);
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.algorithm, Algorithm::Bfs);
        assert_eq!(config.start(), Position::new(2, 2));
        assert_eq!(config.target(), Position::new(17, 17));
        assert_eq!(config.search_limits(), SearchLimits::default());
        assert_eq!(config.layout, MapLayout::Wall);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn algorithm_names_parse() {
        let config = Config::parse_from(["dynamic_search", "--algorithm", "iddfs", "--dls-limit", "5"]);
        assert_eq!(config.algorithm, Algorithm::IterativeDeepening);
        assert_eq!(config.search_limits().dls_limit, 5);
    }

    #[test]
    fn invalid_values_are_reported() {
        let small = Config::parse_from(["dynamic_search", "--grid-size", "1"]);
        assert!(matches!(small.validate(), Err(SearchError::Config(_))));

        let outside = Config::parse_from(["dynamic_search", "--grid-size", "10"]);
        assert!(matches!(outside.validate(), Err(SearchError::Config(_))));

        let chance = Config::parse_from(["dynamic_search", "--obstacle-chance", "1.5"]);
        assert!(matches!(chance.validate(), Err(SearchError::Config(_))));

        let same = Config::parse_from([
            "dynamic_search",
            "--target-row",
            "2",
            "--target-col",
            "2",
        ]);
        assert!(matches!(same.validate(), Err(SearchError::Config(_))));
    }
}
