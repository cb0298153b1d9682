//! Terminal rendering of search progress and agent movement.

use crate::agent::Agent;
use crate::algorithms::common::Expansion;
use crate::grid::{Cell, Grid, Position};
use crate::simulation::{Observer, Status};
use clap::ValueEnum;
use rustc_hash::FxHashSet;
use std::fmt::Write;
use std::thread;
use std::time::Duration;

/// Pause after each movement frame.
const MOVE_DELAY: Duration = Duration::from_millis(150);
/// Pause on a freshly found path before walking it.
const PATH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Speed {
    Fast,
    Slow,
}

impl Speed {
    /// Pause after each expansion frame.
    pub fn frame_delay(self) -> Duration {
        match self {
            Speed::Fast => Duration::from_millis(20),
            Speed::Slow => Duration::from_millis(100),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Speed::Fast => Speed::Slow,
            Speed::Slow => Speed::Fast,
        }
    }
}

/// Everything drawn on top of the bare grid.
#[derive(Default)]
pub struct Overlay<'a> {
    pub start: Option<Position>,
    pub target: Option<Position>,
    pub agent: Option<Position>,
    pub frontier: &'a [Position],
    pub visited: Option<&'a Expansion<'a>>,
    pub path: &'a [Position],
    pub trail: &'a [Position],
}

/// Render `grid` as text, one character per cell.
///
/// Precedence, highest first: agent, target, start, wall, obstacle, trail,
/// path, frontier, visited.
pub fn render(grid: &Grid, overlay: &Overlay<'_>) -> String {
    let frontier: FxHashSet<Position> = overlay.frontier.iter().copied().collect();
    let path: FxHashSet<Position> = overlay.path.iter().copied().collect();
    let trail: FxHashSet<Position> = overlay.trail.iter().copied().collect();

    let mut out = String::new();
    out.push_str("Legend: S=Start T=Target A=Agent #=Wall O=Obstacle ~=Trail *=Path +=Frontier :=Visited\n");
    out.push_str("   ");
    for col in 0..grid.size() {
        let _ = write!(out, "{:2}", col % 10);
    }
    out.push('\n');

    for row in 0..grid.size() {
        let _ = write!(out, "{:2} ", row);
        for col in 0..grid.size() {
            let pos = Position::new(row, col);
            let glyph = if Some(pos) == overlay.agent {
                'A'
            } else if Some(pos) == overlay.target {
                'T'
            } else if Some(pos) == overlay.start {
                'S'
            } else {
                match grid.cell(pos) {
                    Some(Cell::Wall) => '#',
                    Some(Cell::Obstacle) => 'O',
                    _ if trail.contains(&pos) => '~',
                    _ if path.contains(&pos) => '*',
                    _ if frontier.contains(&pos) => '+',
                    _ if overlay.visited.is_some_and(|e| e.is_visited(&pos)) => ':',
                    _ => '.',
                }
            };
            let _ = write!(out, "{} ", glyph);
        }
        out.push('\n');
    }
    out
}

/// Observer that redraws the board on stdout and paces the run.
pub struct TerminalView {
    start: Position,
    target: Position,
    speed: Speed,
    path: Vec<Position>,
    status: String,
}

impl TerminalView {
    pub fn new(start: Position, target: Position, speed: Speed) -> Self {
        TerminalView {
            start,
            target,
            speed,
            path: Vec::new(),
            status: Status::Ready.to_string(),
        }
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    fn draw(&self, grid: &Grid, overlay: &Overlay<'_>, counters: &str) {
        print!("\x1B[2J\x1B[1;1H");
        println!("=== SEARCHING VISUALIZER ===");
        println!("Status: {} | Speed: {:?}", self.status, self.speed);
        println!("{}", counters);
        print!("{}", render(grid, overlay));
    }
}

impl Observer for TerminalView {
    fn on_expand(&mut self, grid: &Grid, expansion: &Expansion<'_>) {
        let overlay = Overlay {
            start: Some(self.start),
            target: Some(self.target),
            frontier: &expansion.frontier,
            visited: Some(expansion),
            ..Overlay::default()
        };
        let counters = format!("Nodes Visited: {}", expansion.visited_count());
        self.draw(grid, &overlay, &counters);
        thread::sleep(self.speed.frame_delay());
    }

    fn on_path(&mut self, grid: &Grid, path: &[Position]) {
        self.path = path.to_vec();
        let overlay = Overlay {
            start: Some(self.start),
            target: Some(self.target),
            path,
            ..Overlay::default()
        };
        self.draw(grid, &overlay, &format!("Path Length: {}", path.len()));
        thread::sleep(PATH_DELAY);
    }

    fn on_move(&mut self, grid: &Grid, agent: &Agent) {
        let overlay = Overlay {
            start: Some(self.start),
            target: Some(self.target),
            agent: Some(agent.position),
            path: &self.path,
            trail: &agent.trail,
            ..Overlay::default()
        };
        self.draw(grid, &overlay, &format!("Moves: {}", agent.moves()));
        thread::sleep(MOVE_DELAY);
    }

    fn on_status(&mut self, status: &Status) {
        self.status = status.to_string();
        if matches!(status, Status::Blocked(_)) {
            println!("{}", self.status);
            thread::sleep(PATH_DELAY);
        }
    }
}
