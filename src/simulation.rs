use crate::agent::Agent;
use crate::algorithms::common::{Expansion, SearchStep};
use crate::algorithms::{Algorithm, SearchLimits};
use crate::config::{Config, MapLayout};
use crate::error::{Result, SearchError};
use crate::grid::{Grid, Position};
use crate::statistics::{optimal_path_length, RunReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Replans allowed in one run before it is abandoned.
pub const DEFAULT_MAX_REPLANS: usize = 100;

/// Demo wall placed by [`MapLayout::Wall`]: `(row, col, length)`.
const DEMO_WALL: (usize, usize, usize) = (5, 5, 10);

/// Where the replanning loop is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    /// Walking `path`; the agent stands on `path[index]`.
    Moving { path: Vec<Position>, index: usize },
}

/// Status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Searching,
    PathFound,
    Moving,
    Blocked(Position),
    TargetReached,
    NoPath,
    GaveUp,
    StartSet,
    TargetSet,
    InvalidPlacement,
    MapReset,
    DynamicCleared,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Ready"),
            Status::Searching => write!(f, "Searching..."),
            Status::PathFound => write!(f, "Path Found! Tracing..."),
            Status::Moving => write!(f, "Moving Agent..."),
            Status::Blocked(pos) => write!(f, "BLOCKED at {}! Re-planning...", pos),
            Status::TargetReached => write!(f, "Target Reached!"),
            Status::NoPath => write!(f, "No Path Found!"),
            Status::GaveUp => write!(f, "Gave up after too many re-plans"),
            Status::StartSet => write!(f, "Start Position Set"),
            Status::TargetSet => write!(f, "Target Position Set"),
            Status::InvalidPlacement => write!(f, "Invalid placement ignored"),
            Status::MapReset => write!(f, "Map Reset"),
            Status::DynamicCleared => write!(f, "Dynamic obstacles cleared"),
        }
    }
}

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStep {
    Moved(Position),
    /// Moved onto the last path cell.
    Arrived(Position),
    /// Next path cell is no longer traversable; the agent did not move.
    Blocked(Position),
    /// No path is being walked.
    Idle,
}

/// Presentation hooks. Every method defaults to doing nothing.
pub trait Observer {
    fn on_expand(&mut self, _grid: &Grid, _expansion: &Expansion<'_>) {}

    fn on_path(&mut self, _grid: &Grid, _path: &[Position]) {}

    fn on_move(&mut self, _grid: &Grid, _agent: &Agent) {}

    fn on_status(&mut self, _status: &Status) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl Observer for Silent {}

/// Grid, anchors and agent, driven through search and movement phases.
///
/// A blocked move sends the loop back to [`Phase::Searching`] with the same
/// algorithm, starting from wherever the agent stands.
#[derive(Clone)]
pub struct Simulation {
    grid: Grid,
    agent: Agent,
    start: Position,
    target: Position,
    limits: SearchLimits,
    max_replans: usize,
    rng: StdRng,
    phase: Phase,
    status: Status,
    last_algorithm: Option<Algorithm>,
    report: Option<RunReport>,
}

impl Simulation {
    pub fn new(grid: Grid, start: Position, target: Position) -> Result<Self> {
        check_anchor(&grid, "start", start, target)?;
        check_anchor(&grid, "target", target, start)?;
        Ok(Simulation {
            grid,
            agent: Agent::new(start),
            start,
            target,
            limits: SearchLimits::default(),
            max_replans: DEFAULT_MAX_REPLANS,
            rng: StdRng::from_entropy(),
            phase: Phase::Idle,
            status: Status::Ready,
            last_algorithm: None,
            report: None,
        })
    }

    /// Build the map described by `config` and a simulation on it.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (start, target) = (config.start(), config.target());

        let mut grid = Grid::new(config.grid_size).with_obstacle_chance(config.obstacle_chance);
        match config.layout {
            MapLayout::Empty => {}
            MapLayout::Wall => {
                let (row, col, length) = DEMO_WALL;
                grid.add_wall_segment(row, col, length);
            }
            MapLayout::Maze => grid.generate_maze(&mut rng, &[start, target]),
            MapLayout::Scatter => grid.random_scatter(&mut rng, config.scatter_coverage),
        }
        for anchor in [start, target] {
            if !grid.is_traversable(anchor) {
                grid.toggle_wall(anchor);
            }
        }

        Ok(Simulation::new(grid, start, target)?
            .with_rng(rng)
            .with_limits(config.search_limits())
            .with_max_replans(config.max_replans))
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_replans(mut self, max_replans: usize) -> Self {
        self.max_replans = max_replans;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for the shell. Edits made while a path is being
    /// walked are picked up by the next movement check.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn last_algorithm(&self) -> Option<Algorithm> {
        self.last_algorithm
    }

    /// Report of the current or most recent run.
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    /// Path cell the agent will try to enter next, if walking.
    pub fn next_cell(&self) -> Option<Position> {
        match &self.phase {
            Phase::Moving { path, index } => path.get(index + 1).copied(),
            _ => None,
        }
    }

    pub fn set_start(&mut self, pos: Position) -> Result<()> {
        if let Err(e) = check_anchor(&self.grid, "start", pos, self.target) {
            debug!(%pos, error = %e, "start placement rejected");
            self.status = Status::InvalidPlacement;
            return Err(e);
        }
        self.start = pos;
        self.agent.place(pos);
        self.phase = Phase::Idle;
        self.status = Status::StartSet;
        Ok(())
    }

    pub fn set_target(&mut self, pos: Position) -> Result<()> {
        if let Err(e) = check_anchor(&self.grid, "target", pos, self.start) {
            debug!(%pos, error = %e, "target placement rejected");
            self.status = Status::InvalidPlacement;
            return Err(e);
        }
        self.target = pos;
        self.phase = Phase::Idle;
        self.status = Status::TargetSet;
        Ok(())
    }

    /// Toggle a static wall, refusing the start and target cells.
    pub fn toggle_wall(&mut self, pos: Position) -> bool {
        if pos == self.start || pos == self.target {
            return false;
        }
        self.grid.toggle_wall(pos)
    }

    pub fn reset_map(&mut self) {
        self.grid.reset();
        self.agent.place(self.start);
        self.phase = Phase::Idle;
        self.status = Status::MapReset;
    }

    pub fn clear_dynamic_obstacles(&mut self) {
        self.grid.clear_dynamic();
        self.status = Status::DynamicCleared;
    }

    pub fn generate_maze(&mut self) {
        let anchors = [self.start, self.target];
        self.grid.generate_maze(&mut self.rng, &anchors);
        self.agent.place(self.start);
        self.phase = Phase::Idle;
    }

    /// Enter [`Phase::Searching`] with `algorithm`. An agent already on the
    /// target is sent back to the start first.
    pub fn command_run(&mut self, algorithm: Algorithm) {
        let from = if self.agent.position == self.target {
            self.start
        } else {
            self.agent.position
        };
        self.agent.place(from);
        self.last_algorithm = Some(algorithm);
        self.report = Some(RunReport::new(
            algorithm,
            optimal_path_length(&self.grid, from, self.target),
        ));
        self.phase = Phase::Searching;
        self.status = Status::Searching;
        info!(%algorithm, %from, target = %self.target, "run started");
    }

    /// Run the remembered algorithm from the agent's cell to completion.
    ///
    /// One dynamic obstacle spawn is attempted after every expansion event.
    /// Returns whether a path was found.
    pub fn search_phase<O: Observer + ?Sized>(&mut self, observer: &mut O) -> bool {
        let (Phase::Searching, Some(algorithm)) = (&self.phase, self.last_algorithm) else {
            return false;
        };
        observer.on_status(&self.status);

        let mut search = algorithm.create(self.agent.position, self.target, &self.limits);
        debug!(%algorithm, from = %self.agent.position, "search started");
        let mut expansions = 0;
        let mut nodes_visited = 0;
        let path = loop {
            match search.step(&self.grid) {
                SearchStep::Expanded(expansion) => {
                    expansions += 1;
                    nodes_visited = expansion.visited_count();
                    observer.on_expand(&self.grid, &expansion);
                    if let Some(pos) = self.grid.spawn_dynamic_obstacle(
                        &mut self.rng,
                        self.start,
                        self.target,
                        self.agent.position,
                    ) {
                        trace!(%pos, "obstacle appeared during search");
                    }
                }
                SearchStep::Found(path) => break Some(path),
                SearchStep::Exhausted => break None,
            }
        };
        debug!(
            %algorithm,
            expansions,
            nodes_visited,
            found = path.is_some(),
            "search finished"
        );

        if let Some(report) = self.report.as_mut() {
            report.searches += 1;
            report.expansions += expansions;
            report.nodes_visited = nodes_visited;
            report.path_length = path.as_ref().map_or(0, Vec::len);
            report.path = path.clone();
        }

        match path {
            Some(path) => {
                observer.on_path(&self.grid, &path);
                self.phase = Phase::Moving { path, index: 0 };
                self.set_status(Status::PathFound, observer);
                true
            }
            None => {
                self.finish(Status::NoPath, observer);
                false
            }
        }
    }

    /// Advance the agent one cell along the current path.
    ///
    /// The next cell is checked against the live grid first. If it has
    /// become blocked the agent stays put and the loop returns to
    /// [`Phase::Searching`] with the same algorithm.
    pub fn move_step<O: Observer + ?Sized>(&mut self, observer: &mut O) -> MoveStep {
        let Phase::Moving { path, index } = &self.phase else {
            return MoveStep::Idle;
        };
        let Some(next) = path.get(index + 1).copied() else {
            self.finish(Status::TargetReached, observer);
            return MoveStep::Arrived(self.agent.position);
        };

        if !self.grid.is_traversable(next) {
            let replans = self.report.as_mut().map_or(0, |report| {
                report.replans += 1;
                report.replans
            });
            if replans > self.max_replans {
                warn!(replans, "giving up after repeated blocking");
                self.finish(Status::GaveUp, observer);
            } else {
                info!(blocked = %next, at = %self.agent.position, "path blocked, re-planning");
                self.phase = Phase::Searching;
                self.set_status(Status::Blocked(next), observer);
            }
            return MoveStep::Blocked(next);
        }

        let arrived = match &mut self.phase {
            Phase::Moving { path, index } => {
                *index += 1;
                *index + 1 >= path.len()
            }
            _ => false,
        };
        self.agent.move_to(next);
        observer.on_move(&self.grid, &self.agent);
        if let Some(pos) =
            self.grid
                .spawn_dynamic_obstacle(&mut self.rng, self.start, self.target, self.agent.position)
        {
            trace!(%pos, "obstacle appeared during movement");
        }

        if arrived {
            self.finish(Status::TargetReached, observer);
            MoveStep::Arrived(next)
        } else {
            if self.status != Status::Moving {
                self.set_status(Status::Moving, observer);
            }
            MoveStep::Moved(next)
        }
    }

    /// Perform one phase step. Returns `false` once the loop is idle.
    pub fn tick<O: Observer + ?Sized>(&mut self, observer: &mut O) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Searching => {
                self.search_phase(observer);
                true
            }
            Phase::Moving { .. } => {
                self.move_step(observer);
                true
            }
        }
    }

    /// Full run of `algorithm`: search, walk, re-plan as needed.
    pub fn run<O: Observer + ?Sized>(&mut self, algorithm: Algorithm, observer: &mut O) -> RunReport {
        self.command_run(algorithm);
        while self.tick(observer) {}
        self.report
            .clone()
            .unwrap_or_else(|| RunReport::new(algorithm, None))
    }

    /// Run every algorithm on copies of the same map and random stream.
    pub fn run_all_algorithms(config: &Config) -> Result<Vec<RunReport>> {
        let base = Simulation::from_config(config)?;
        let mut results = Vec::with_capacity(Algorithm::ALL.len());
        for algorithm in Algorithm::ALL {
            let mut simulation = base.clone();
            results.push(simulation.run(algorithm, &mut Silent));
        }
        Ok(results)
    }

    fn set_status<O: Observer + ?Sized>(&mut self, status: Status, observer: &mut O) {
        self.status = status;
        observer.on_status(&self.status);
    }

    fn finish<O: Observer + ?Sized>(&mut self, status: Status, observer: &mut O) {
        self.phase = Phase::Idle;
        if let Some(report) = self.report.as_mut() {
            report.status = status.clone();
            report.moves = self.agent.moves();
            report.trail = self.agent.trail.clone();
            info!(
                algorithm = %report.algorithm,
                status = %status,
                moves = report.moves,
                replans = report.replans,
                "run finished"
            );
        }
        self.set_status(status, observer);
    }
}

fn check_anchor(grid: &Grid, anchor: &'static str, pos: Position, other: Position) -> Result<()> {
    if !grid.in_bounds(pos) {
        return Err(SearchError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            size: grid.size(),
        });
    }
    let reason = if pos == other {
        "cell holds the other anchor"
    } else if !grid.is_traversable(pos) {
        "cell is blocked"
    } else {
        return Ok(());
    };
    Err(SearchError::InvalidPlacement {
        anchor,
        row: pos.row,
        col: pos.col,
        reason,
    })
}
