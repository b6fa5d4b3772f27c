use std::collections::{HashSet, VecDeque};

use crate::maze::{Direction, Position};

use super::{NextMove, move_toward, unvisited_moves};

/// Breadth-first-flavored exploration: every newly discovered unvisited
/// neighbor joins a FIFO frontier, and the solver moves into the first one
/// immediately. At a dead end it aims for the oldest still-unvisited
/// frontier entry instead of unwinding its own path.
///
/// Aiming uses the same single-step heuristic as backtracking, so a
/// frontier entry that is not axis-reachable from the dead end stops the
/// solver cold. That limitation is part of the strategy's contract; the
/// driver reports it as an unsuccessful solve.
#[derive(Debug, Default)]
pub struct BreadthFirst {
    frontier: VecDeque<Position>,
}

impl BreadthFirst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards stale visited entries off the front of the frontier and
    /// returns the oldest unvisited one, keeping it queued until a later
    /// move actually lands on it.
    fn next_frontier_target(&mut self, visited: &HashSet<Position>) -> Option<Position> {
        while let Some(candidate) = self.frontier.pop_front() {
            if !visited.contains(&candidate) {
                self.frontier.push_back(candidate);
                return Some(candidate);
            }
        }
        None
    }
}

impl NextMove for BreadthFirst {
    fn next_move(
        &mut self,
        current: Position,
        available: &[Direction],
        visited: &HashSet<Position>,
    ) -> Option<Direction> {
        let moves = unvisited_moves(current, available, visited);
        for &direction in &moves {
            self.frontier.push_back(current.step(direction));
        }
        if let Some(&direction) = moves.first() {
            return Some(direction);
        }

        let target = self.next_frontier_target(visited)?;
        move_toward(current, target, available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_to_first_unvisited_and_queues_the_rest() {
        let mut solver = BreadthFirst::new();
        let visited = HashSet::from([Position::new(1, 1)]);
        let available = [Direction::North, Direction::South, Direction::West];
        assert_eq!(
            solver.next_move(Position::new(1, 1), &available, &visited),
            Some(Direction::North)
        );
        assert_eq!(
            solver.frontier,
            VecDeque::from([
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(0, 1)
            ])
        );
    }

    #[test]
    fn test_falls_back_to_oldest_frontier_entry() {
        let mut solver = BreadthFirst::new();
        let mut visited = HashSet::from([Position::new(1, 1)]);
        let available = [Direction::North, Direction::South, Direction::West];
        solver.next_move(Position::new(1, 1), &available, &visited);
        visited.insert(Position::new(1, 0));

        // (1, 0) turned out to be a pocket; the oldest unvisited frontier
        // entry is (1, 2), straight south, so south it is.
        assert_eq!(
            solver.next_move(Position::new(1, 0), &[Direction::South], &visited),
            Some(Direction::South)
        );
    }

    #[test]
    fn test_stops_when_target_is_walled_off() {
        let mut solver = BreadthFirst::new();
        let mut visited = HashSet::from([Position::new(0, 0)]);
        solver.next_move(
            Position::new(0, 0),
            &[Direction::South, Direction::East],
            &visited,
        );
        visited.insert(Position::new(0, 1));

        // The remaining frontier entry (1, 0) lies east of the dead end,
        // but only north is open. The strategy has no answer.
        assert_eq!(
            solver.next_move(Position::new(0, 1), &[Direction::North], &visited),
            None
        );
    }

    #[test]
    fn test_gives_up_when_frontier_is_exhausted() {
        let mut solver = BreadthFirst::new();
        let visited = HashSet::from([Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(
            solver.next_move(Position::new(0, 0), &[Direction::East], &visited),
            None
        );
    }
}
