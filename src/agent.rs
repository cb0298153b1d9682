use crate::grid::Position;

/// The mover walking computed paths.
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Position,
    /// Cells walked during the current run, starting with the cell the run
    /// began on.
    pub trail: Vec<Position>,
}

impl Agent {
    pub fn new(start_pos: Position) -> Self {
        Agent {
            position: start_pos,
            trail: vec![start_pos],
        }
    }

    pub fn move_to(&mut self, new_pos: Position) {
        self.position = new_pos;
        self.trail.push(new_pos);
    }

    /// Put the agent on `pos` and forget the previous trail.
    pub fn place(&mut self, pos: Position) {
        self.position = pos;
        self.trail.clear();
        self.trail.push(pos);
    }

    pub fn moves(&self) -> usize {
        self.trail.len().saturating_sub(1)
    }
}
