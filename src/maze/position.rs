use std::fmt;

use super::Direction;

/// A cell coordinate. (0, 0) is the top-left corner; x grows east and y
/// grows south. Signed so that stepping off the grid produces a
/// representable position the bounds check can reject, rather than an
/// underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighboring position one cell toward `direction`. No clamping;
    /// the result may lie outside any particular maze.
    pub fn step(&self, direction: Direction) -> Position {
        match direction {
            Direction::North => Position::new(self.x, self.y - 1),
            Direction::South => Position::new(self.x, self.y + 1),
            Direction::East => Position::new(self.x + 1, self.y),
            Direction::West => Position::new(self.x - 1, self.y),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
