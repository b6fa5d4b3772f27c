use std::collections::HashSet;
use std::time::SystemTime;

use uuid::Uuid;

use crate::maze::{Direction, Maze, Position};

/// Lifecycle state of a navigation session. The transition to `Completed`
/// is one-way; nothing moves a finished session back into progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Completed,
}

/// Outcome of a single move attempt. Always a return value the caller
/// branches on; blocked and out-of-bounds moves are expected interactive
/// outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Success,
    Blocked,
    OutOfBounds,
    AlreadyCompleted,
}

/// One navigation attempt through a maze: the only mutable aggregate in the
/// engine. Position, move count and the visited set change exclusively
/// through [`MazeSession::apply_move`].
#[derive(Debug)]
pub struct MazeSession {
    id: Uuid,
    maze_id: Uuid,
    current_position: Position,
    state: SessionState,
    move_count: u64,
    visited: HashSet<Position>,
    started_at: SystemTime,
}

impl MazeSession {
    /// Creates a session at the given start position, in progress, with the
    /// start already counted as visited.
    pub fn new(id: Uuid, maze_id: Uuid, start: Position) -> Self {
        MazeSession {
            id,
            maze_id,
            current_position: start,
            state: SessionState::InProgress,
            move_count: 0,
            visited: HashSet::from([start]),
            started_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn maze_id(&self) -> Uuid {
        self.maze_id
    }

    pub fn current_position(&self) -> Position {
        self.current_position
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn visited_cells(&self) -> &HashSet<Position> {
        &self.visited
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Attempts one move. The checks run in a fixed order -- completed
    /// session, then wall, then bounds -- and the order is part of the
    /// contract: swapping the wall and bounds checks would change which
    /// outcome a caller sees at a corner. The session mutates on `Success`
    /// only.
    pub fn apply_move(&mut self, direction: Direction, maze: &Maze) -> MoveResult {
        if self.state == SessionState::Completed {
            return MoveResult::AlreadyCompleted;
        }

        let cell = &maze[self.current_position];
        if !cell.can_move(direction) {
            return MoveResult::Blocked;
        }

        let target = self.current_position.step(direction);
        // The generator never opens a boundary-facing wall, so a generated
        // maze cannot reach this branch. Synthetic mazes can, and the
        // session must not walk off the grid for them either.
        if !maze.is_in_bounds(target) {
            return MoveResult::OutOfBounds;
        }

        self.current_position = target;
        self.move_count += 1;
        self.visited.insert(target);

        if target == maze.end() {
            tracing::debug!(
                "[session] {} completed after {} moves",
                self.id,
                self.move_count
            );
            self.state = SessionState::Completed;
        }

        MoveResult::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::maze_with_open_walls;

    fn two_by_one() -> Maze {
        // (0,0) -- open east wall -- (1,0), which is the end.
        maze_with_open_walls(2, 1, &[(Position::new(0, 0), Direction::East)])
    }

    fn snapshot(session: &MazeSession) -> (Position, u64, usize) {
        (
            session.current_position(),
            session.move_count(),
            session.visited_cells().len(),
        )
    }

    #[test]
    fn test_new_session_starts_at_start() {
        let maze = two_by_one();
        let session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        assert_eq!(session.current_position(), Position::new(0, 0));
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.visited_cells().len(), 1);
        assert!(session.visited_cells().contains(&maze.start()));
        assert!(session.started_at() <= SystemTime::now());
    }

    #[test]
    fn test_successful_move_updates_everything() {
        let maze = two_by_one();
        let mut session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        assert_eq!(session.apply_move(Direction::East, &maze), MoveResult::Success);
        assert_eq!(session.current_position(), Position::new(1, 0));
        assert_eq!(session.move_count(), 1);
        assert!(session.visited_cells().contains(&Position::new(1, 0)));
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_blocked_move_mutates_nothing() {
        let maze = two_by_one();
        let mut session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        let before = snapshot(&session);
        assert_eq!(session.apply_move(Direction::South, &maze), MoveResult::Blocked);
        assert_eq!(snapshot(&session), before);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn test_out_of_bounds_move_mutates_nothing() {
        // North wall at (0,0) open straight through the boundary.
        let maze = maze_with_open_walls(
            2,
            1,
            &[
                (Position::new(0, 0), Direction::East),
                (Position::new(0, 0), Direction::North),
            ],
        );
        let mut session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        let before = snapshot(&session);
        assert_eq!(
            session.apply_move(Direction::North, &maze),
            MoveResult::OutOfBounds
        );
        assert_eq!(snapshot(&session), before);
    }

    #[test]
    fn test_wall_check_wins_over_bounds_check() {
        // Moving west from (0,0) is both blocked and out of bounds; the
        // wall check runs first, so Blocked is what the caller sees.
        let maze = two_by_one();
        let mut session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        assert_eq!(session.apply_move(Direction::West, &maze), MoveResult::Blocked);
    }

    #[test]
    fn test_completion_is_one_way() {
        let maze = two_by_one();
        let mut session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        assert_eq!(session.apply_move(Direction::East, &maze), MoveResult::Success);
        assert_eq!(session.state(), SessionState::Completed);

        let before = snapshot(&session);
        for direction in Direction::ALL {
            assert_eq!(
                session.apply_move(direction, &maze),
                MoveResult::AlreadyCompleted
            );
            assert_eq!(snapshot(&session), before);
            assert_eq!(session.state(), SessionState::Completed);
        }
    }

    #[test]
    fn test_revisits_do_not_grow_visited_set() {
        let maze = maze_with_open_walls(3, 1, &[(Position::new(0, 0), Direction::East)]);
        let mut session = MazeSession::new(Uuid::new_v4(), maze.id(), maze.start());
        session.apply_move(Direction::East, &maze);
        session.apply_move(Direction::West, &maze);
        session.apply_move(Direction::East, &maze);
        assert_eq!(session.move_count(), 3);
        assert_eq!(session.visited_cells().len(), 2);
    }
}
