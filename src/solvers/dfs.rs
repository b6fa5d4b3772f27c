use std::collections::HashSet;

use crate::maze::{Direction, Position};

use super::{NextMove, move_toward, unvisited_moves};

/// Depth-first exploration: always extends into the first unvisited
/// affordance, remembering where it stood so dead ends unwind one cell at a
/// time along the exact path taken.
#[derive(Debug, Default)]
pub struct DepthFirst {
    backtrack: Vec<Position>,
}

impl DepthFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NextMove for DepthFirst {
    fn next_move(
        &mut self,
        current: Position,
        available: &[Direction],
        visited: &HashSet<Position>,
    ) -> Option<Direction> {
        let moves = unvisited_moves(current, available, visited);
        if let Some(&direction) = moves.first() {
            self.backtrack.push(current);
            return Some(direction);
        }

        // Dead end; unwind toward the cell we came from. Stack entries are
        // always adjacent to the cell they unwind from, so the heuristic
        // resolves them exactly.
        let target = self.backtrack.pop()?;
        move_toward(current, target, available)
    }
}
