use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;

use crate::maze::{Direction, Position};

use super::{NextMove, move_toward, unvisited_moves};

/// Uniform random pick among unvisited affordances, with the same
/// path-unwinding fallback as depth-first search so an exhausted pocket
/// never strands it. Fully deterministic under a seeded rng.
#[derive(Debug)]
pub struct RandomWalk {
    rng: StdRng,
    backtrack: Vec<Position>,
}

impl RandomWalk {
    pub fn new(rng: StdRng) -> Self {
        RandomWalk {
            rng,
            backtrack: Vec::new(),
        }
    }
}

impl NextMove for RandomWalk {
    fn next_move(
        &mut self,
        current: Position,
        available: &[Direction],
        visited: &HashSet<Position>,
    ) -> Option<Direction> {
        let moves = unvisited_moves(current, available, visited);
        if !moves.is_empty() {
            self.backtrack.push(current);
            return Some(moves[self.rng.random_range(0..moves.len())]);
        }

        let target = self.backtrack.pop()?;
        move_toward(current, target, available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;

    #[test]
    fn test_only_picks_unvisited_targets() {
        let mut solver = RandomWalk::new(get_rng(Some(9)));
        let visited = HashSet::from([Position::new(1, 1), Position::new(1, 0)]);
        let available = [Direction::North, Direction::South, Direction::East];
        for _ in 0..20 {
            let choice = solver
                .next_move(Position::new(1, 1), &available, &visited)
                .expect("two unvisited targets remain");
            assert_ne!(choice, Direction::North, "north target is visited");
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let visited = HashSet::from([Position::new(1, 1)]);
        let available = [Direction::North, Direction::South, Direction::East];
        let mut first = RandomWalk::new(get_rng(Some(42)));
        let mut second = RandomWalk::new(get_rng(Some(42)));
        for _ in 0..10 {
            assert_eq!(
                first.next_move(Position::new(1, 1), &available, &visited),
                second.next_move(Position::new(1, 1), &available, &visited)
            );
        }
    }

    #[test]
    fn test_backtracks_like_depth_first() {
        let mut solver = RandomWalk::new(get_rng(Some(3)));
        let mut visited = HashSet::from([Position::new(0, 0)]);
        assert_eq!(
            solver.next_move(Position::new(0, 0), &[Direction::East], &visited),
            Some(Direction::East)
        );
        visited.insert(Position::new(1, 0));
        assert_eq!(
            solver.next_move(Position::new(1, 0), &[Direction::West], &visited),
            Some(Direction::West)
        );
        // Stack drained and nothing unvisited left anywhere nearby.
        assert_eq!(
            solver.next_move(Position::new(0, 0), &[Direction::East], &visited),
            None
        );
    }
}
