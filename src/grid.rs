use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::trace;

/// Neighbor offsets as `(d_row, d_col)`, clockwise from "up".
///
/// Order is load-bearing: it fixes the traversal order of every search and
/// therefore which of several equal paths is returned.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (1, 1),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, -1),
];

/// Probability that a single spawn attempt places a dynamic obstacle.
pub const DEFAULT_OBSTACLE_CHANCE: f64 = 0.03;

/// Maze carving jumps two cells so a wall stays between corridors.
const MAZE_STEPS: [(isize, isize); 4] = [(0, 2), (0, -2), (2, 0), (-2, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Static wall placed by map design.
    Wall,
    /// Dynamic obstacle spawned at runtime.
    Obstacle,
}

/// Square occupancy grid.
///
/// `static_walls` and `dynamic_obstacles` always mirror the `Wall` and
/// `Obstacle` cells of `cells`; every mutation goes through methods that keep
/// the three in step.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
    static_walls: FxHashSet<Position>,
    dynamic_obstacles: FxHashSet<Position>,
    obstacle_chance: f64,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![vec![Cell::Empty; size]; size],
            static_walls: FxHashSet::default(),
            dynamic_obstacles: FxHashSet::default(),
            obstacle_chance: DEFAULT_OBSTACLE_CHANCE,
        }
    }

    pub fn with_obstacle_chance(mut self, chance: f64) -> Self {
        self.obstacle_chance = chance;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn obstacle_chance(&self) -> f64 {
        self.obstacle_chance
    }

    pub fn static_walls(&self) -> &FxHashSet<Position> {
        &self.static_walls
    }

    pub fn dynamic_obstacles(&self) -> &FxHashSet<Position> {
        &self.dynamic_obstacles
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// State of `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    pub fn is_traversable(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Empty)
    }

    /// All traversable cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
            .filter(move |pos| self.is_traversable(*pos))
    }

    fn offset(&self, pos: Position, d_row: isize, d_col: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(d_row)?;
        let col = pos.col.checked_add_signed(d_col)?;
        let next = Position::new(row, col);
        self.in_bounds(next).then_some(next)
    }

    /// Traversable cells adjacent to `pos`, in [`DIRECTIONS`] order.
    ///
    /// Diagonal moves are allowed even when both orthogonal corner cells are
    /// blocked.
    pub fn get_neighbors(&self, pos: &Position) -> Vec<Position> {
        DIRECTIONS
            .iter()
            .filter_map(|&(d_row, d_col)| self.offset(*pos, d_row, d_col))
            .filter(|next| self.is_traversable(*next))
            .collect()
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        match self.cells[pos.row][pos.col] {
            Cell::Wall => {
                self.static_walls.remove(&pos);
            }
            Cell::Obstacle => {
                self.dynamic_obstacles.remove(&pos);
            }
            Cell::Empty => {}
        }
        match cell {
            Cell::Wall => {
                self.static_walls.insert(pos);
            }
            Cell::Obstacle => {
                self.dynamic_obstacles.insert(pos);
            }
            Cell::Empty => {}
        }
        self.cells[pos.row][pos.col] = cell;
    }

    /// Flip `pos` between empty and static wall. A dynamic obstacle is
    /// cleared to empty. Returns `false` when `pos` is out of bounds.
    pub fn toggle_wall(&mut self, pos: Position) -> bool {
        let next = match self.cell(pos) {
            None => return false,
            Some(Cell::Empty) => Cell::Wall,
            Some(Cell::Wall) | Some(Cell::Obstacle) => Cell::Empty,
        };
        self.set(pos, next);
        true
    }

    /// Vertical wall of `length` cells starting at `(row, col)`, clipped at
    /// the grid edge.
    pub fn add_wall_segment(&mut self, row: usize, col: usize, length: usize) {
        if col >= self.size {
            return;
        }
        let end = row.saturating_add(length).min(self.size);
        for r in row..end {
            self.set(Position::new(r, col), Cell::Wall);
        }
    }

    /// Mark an empty cell as a dynamic obstacle.
    pub fn place_dynamic_obstacle(&mut self, pos: Position) -> bool {
        if !self.is_traversable(pos) {
            return false;
        }
        self.set(pos, Cell::Obstacle);
        true
    }

    /// One stochastic spawn attempt.
    ///
    /// With probability `obstacle_chance` a single cell is sampled uniformly;
    /// it becomes an obstacle only if it is empty and is none of `start`,
    /// `target` or `agent`.
    pub fn spawn_dynamic_obstacle<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        start: Position,
        target: Position,
        agent: Position,
    ) -> Option<Position> {
        if self.size == 0 || rng.gen::<f64>() >= self.obstacle_chance {
            return None;
        }
        let pos = Position::new(rng.gen_range(0..self.size), rng.gen_range(0..self.size));
        if pos == start || pos == target || pos == agent {
            return None;
        }
        if self.place_dynamic_obstacle(pos) {
            trace!(%pos, "dynamic obstacle spawned");
            Some(pos)
        } else {
            None
        }
    }

    /// Remove every dynamic obstacle, leaving static walls in place.
    pub fn clear_dynamic(&mut self) {
        for pos in std::mem::take(&mut self.dynamic_obstacles) {
            self.cells[pos.row][pos.col] = Cell::Empty;
        }
    }

    pub fn reset(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(Cell::Empty);
        }
        self.static_walls.clear();
        self.dynamic_obstacles.clear();
    }

    /// Random walls over roughly `coverage` of the board.
    pub fn random_scatter<R: Rng + ?Sized>(&mut self, rng: &mut R, coverage: f64) {
        self.reset();
        if self.size == 0 {
            return;
        }
        let samples = ((self.size * self.size) as f64 * coverage) as usize;
        for _ in 0..samples {
            let pos = Position::new(rng.gen_range(0..self.size), rng.gen_range(0..self.size));
            if self.is_traversable(pos) {
                self.set(pos, Cell::Wall);
            }
        }
    }

    /// Carve a perfect maze with a randomized depth-first backtracker rooted
    /// at (0, 0), then force open the two corners and every `safe_spots` cell.
    pub fn generate_maze<R: Rng + ?Sized>(&mut self, rng: &mut R, safe_spots: &[Position]) {
        self.reset();
        if self.size == 0 {
            return;
        }
        for row in 0..self.size {
            for col in 0..self.size {
                self.set(Position::new(row, col), Cell::Wall);
            }
        }

        let origin = Position::new(0, 0);
        self.set(origin, Cell::Empty);
        let mut stack = vec![(origin, shuffled_steps(rng), 0usize)];
        while let Some((cell, steps, next)) = stack.last_mut() {
            if *next == steps.len() {
                stack.pop();
                continue;
            }
            let (d_row, d_col) = steps[*next];
            *next += 1;
            let cell = *cell;

            let Some(dest) = self.offset(cell, d_row, d_col) else {
                continue;
            };
            if self.cells[dest.row][dest.col] != Cell::Wall {
                continue;
            }
            if let Some(between) = self.offset(cell, d_row / 2, d_col / 2) {
                self.set(between, Cell::Empty);
            }
            self.set(dest, Cell::Empty);
            stack.push((dest, shuffled_steps(rng), 0));
        }

        let far = Position::new(self.size - 1, self.size - 1);
        for &spot in [origin, far].iter().chain(safe_spots) {
            if self.in_bounds(spot) {
                self.set(spot, Cell::Empty);
            }
        }
    }

    /// Whether the companion sets agree with the cell matrix.
    pub fn is_consistent(&self) -> bool {
        let mut walls = 0;
        let mut obstacles = 0;
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let pos = Position::new(row, col);
                let ok = match cell {
                    Cell::Empty => {
                        !self.static_walls.contains(&pos) && !self.dynamic_obstacles.contains(&pos)
                    }
                    Cell::Wall => {
                        walls += 1;
                        self.static_walls.contains(&pos)
                    }
                    Cell::Obstacle => {
                        obstacles += 1;
                        self.dynamic_obstacles.contains(&pos)
                    }
                };
                if !ok {
                    return false;
                }
            }
        }
        walls == self.static_walls.len() && obstacles == self.dynamic_obstacles.len()
    }
}

fn shuffled_steps<R: Rng + ?Sized>(rng: &mut R) -> [(isize, isize); 4] {
    let mut steps = MAZE_STEPS;
    steps.shuffle(rng);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn neighbors_follow_clockwise_priority() {
        let grid = Grid::new(3);
        assert_eq!(
            grid.get_neighbors(&p(1, 1)),
            vec![p(0, 1), p(1, 2), p(2, 1), p(2, 2), p(1, 0), p(0, 0), p(0, 2), p(2, 0)]
        );
    }

    #[test]
    fn neighbors_skip_out_of_bounds_and_blocked_cells() {
        let mut grid = Grid::new(3);
        grid.toggle_wall(p(0, 1));
        grid.place_dynamic_obstacle(p(1, 1));
        assert_eq!(grid.get_neighbors(&p(0, 0)), vec![p(1, 0)]);
    }

    #[test]
    fn diagonal_moves_may_cut_corners() {
        let mut grid = Grid::new(2);
        grid.toggle_wall(p(0, 1));
        grid.toggle_wall(p(1, 0));
        assert_eq!(grid.get_neighbors(&p(0, 0)), vec![p(1, 1)]);
    }

    #[test]
    fn toggle_twice_restores_cell() {
        let mut grid = Grid::new(4);
        assert!(grid.toggle_wall(p(2, 3)));
        assert_eq!(grid.cell(p(2, 3)), Some(Cell::Wall));
        assert!(grid.static_walls().contains(&p(2, 3)));
        assert!(grid.toggle_wall(p(2, 3)));
        assert_eq!(grid.cell(p(2, 3)), Some(Cell::Empty));
        assert!(grid.static_walls().is_empty());
        assert!(grid.is_consistent());
    }

    #[test]
    fn toggle_clears_dynamic_obstacle() {
        let mut grid = Grid::new(4);
        grid.place_dynamic_obstacle(p(1, 1));
        assert!(grid.toggle_wall(p(1, 1)));
        assert_eq!(grid.cell(p(1, 1)), Some(Cell::Empty));
        assert!(grid.dynamic_obstacles().is_empty());
        assert!(grid.is_consistent());
    }

    #[test]
    fn out_of_bounds_mutations_are_ignored() {
        let mut grid = Grid::new(3);
        assert!(!grid.toggle_wall(p(3, 0)));
        assert!(!grid.place_dynamic_obstacle(p(0, 7)));
        grid.add_wall_segment(0, 9, 3);
        assert_eq!(grid.open_cells().count(), 9);
    }

    #[test]
    fn wall_segment_is_clamped() {
        let mut grid = Grid::new(5);
        grid.add_wall_segment(3, 2, 10);
        assert_eq!(grid.static_walls().len(), 2);
        assert_eq!(grid.cell(p(3, 2)), Some(Cell::Wall));
        assert_eq!(grid.cell(p(4, 2)), Some(Cell::Wall));
        assert!(grid.is_consistent());
    }

    #[test]
    fn clear_dynamic_is_idempotent_and_keeps_walls() {
        let mut grid = Grid::new(5);
        grid.toggle_wall(p(0, 0));
        grid.place_dynamic_obstacle(p(2, 2));
        grid.place_dynamic_obstacle(p(3, 1));

        grid.clear_dynamic();
        let once = grid.clone();
        grid.clear_dynamic();

        assert_eq!(grid.cells, once.cells);
        assert_eq!(grid.cell(p(0, 0)), Some(Cell::Wall));
        assert!(grid.dynamic_obstacles().is_empty());
        assert!(grid.is_consistent());
    }

    #[test]
    fn spawn_never_lands_on_anchors() {
        let mut grid = Grid::new(3).with_obstacle_chance(1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let (start, target, agent) = (p(0, 0), p(2, 2), p(1, 1));
        for _ in 0..200 {
            if let Some(pos) = grid.spawn_dynamic_obstacle(&mut rng, start, target, agent) {
                assert!(pos != start && pos != target && pos != agent);
            }
        }
        assert_eq!(grid.dynamic_obstacles().len(), 6);
        assert!(grid.is_traversable(start));
        assert!(grid.is_consistent());
    }

    #[test]
    fn spawn_with_zero_chance_does_nothing() {
        let mut grid = Grid::new(4).with_obstacle_chance(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(grid.spawn_dynamic_obstacle(&mut rng, p(0, 0), p(3, 3), p(0, 0)), None);
        }
    }

    #[test]
    fn reset_clears_everything() {
        let mut grid = Grid::new(4);
        grid.add_wall_segment(0, 1, 4);
        grid.place_dynamic_obstacle(p(3, 3));
        grid.reset();
        assert_eq!(grid.open_cells().count(), 16);
        assert!(grid.static_walls().is_empty());
        assert!(grid.dynamic_obstacles().is_empty());
    }

    #[test]
    fn maze_keeps_corridor_walls_and_safe_spots() {
        let mut grid = Grid::new(9);
        let mut rng = StdRng::seed_from_u64(42);
        grid.generate_maze(&mut rng, &[p(3, 3)]);

        // Every even/even cell is carved and every odd/odd cell is still a
        // wall unless forced open.
        for row in (0..9).step_by(2) {
            for col in (0..9).step_by(2) {
                assert!(grid.is_traversable(p(row, col)));
            }
        }
        assert_eq!(grid.cell(p(1, 1)), Some(Cell::Wall));
        assert!(grid.is_traversable(p(3, 3)));
        assert!(grid.is_consistent());
    }

    #[test]
    fn scatter_only_places_static_walls() {
        let mut grid = Grid::new(10);
        let mut rng = StdRng::seed_from_u64(3);
        grid.random_scatter(&mut rng, 0.25);
        assert!(!grid.static_walls().is_empty());
        assert!(grid.static_walls().len() <= 25);
        assert!(grid.dynamic_obstacles().is_empty());
        assert!(grid.is_consistent());
    }
}
