use super::{Direction, Position};

/// A single maze cell: its own position plus four independent wall flags.
///
/// Adjacent cells always agree about the wall they share; the generator
/// clears both sides of a removed wall in the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    has_north_wall: bool,
    has_south_wall: bool,
    has_east_wall: bool,
    has_west_wall: bool,
}

impl Cell {
    pub fn new(
        position: Position,
        has_north_wall: bool,
        has_south_wall: bool,
        has_east_wall: bool,
        has_west_wall: bool,
    ) -> Self {
        Cell {
            position,
            has_north_wall,
            has_south_wall,
            has_east_wall,
            has_west_wall,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// True iff the wall toward `direction` is open. Pure wall lookup; this
    /// says nothing about grid bounds.
    pub fn can_move(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => !self.has_north_wall,
            Direction::South => !self.has_south_wall,
            Direction::East => !self.has_east_wall,
            Direction::West => !self.has_west_wall,
        }
    }

    pub fn has_north_wall(&self) -> bool {
        self.has_north_wall
    }

    pub fn has_south_wall(&self) -> bool {
        self.has_south_wall
    }

    pub fn has_east_wall(&self) -> bool {
        self.has_east_wall
    }

    pub fn has_west_wall(&self) -> bool {
        self.has_west_wall
    }

    #[cfg(test)]
    /// A cell with all four walls present, for building synthetic mazes.
    pub(crate) fn closed(position: Position) -> Self {
        Cell::new(position, true, true, true, true)
    }

    #[cfg(test)]
    /// Clears the wall flag toward `direction` on this side only.
    pub(crate) fn open(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.has_north_wall = false,
            Direction::South => self.has_south_wall = false,
            Direction::East => self.has_east_wall = false,
            Direction::West => self.has_west_wall = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_move_is_wall_lookup() {
        let cell = Cell::new(Position::new(0, 0), true, false, true, false);
        assert!(!cell.can_move(Direction::North));
        assert!(cell.can_move(Direction::South));
        assert!(!cell.can_move(Direction::East));
        assert!(cell.can_move(Direction::West));
    }

    #[test]
    fn test_closed_cell_allows_no_moves() {
        let cell = Cell::closed(Position::new(2, 2));
        for direction in Direction::ALL {
            assert!(!cell.can_move(direction));
        }
    }

    #[test]
    fn test_open_clears_one_flag() {
        let mut cell = Cell::closed(Position::new(0, 0));
        cell.open(Direction::East);
        assert!(cell.can_move(Direction::East));
        assert!(!cell.can_move(Direction::North));
        assert!(!cell.can_move(Direction::South));
        assert!(!cell.can_move(Direction::West));
    }
}
