mod cell;
mod direction;
mod position;

use std::time::SystemTime;

use uuid::Uuid;

pub use cell::Cell;
pub use direction::Direction;
pub use position::Position;

/// An immutable maze: a width x height grid of cells with a start in the
/// top-left corner and an end in the bottom-right corner. Built once by the
/// generator and never modified afterwards.
#[derive(Debug)]
pub struct Maze {
    id: Uuid,
    width: u32,
    height: u32,
    /// Cells in row-major order, `y * width + x`.
    cells: Box<[Cell]>,
    start: Position,
    end: Position,
    created_at: SystemTime,
}

impl Maze {
    /// Assembles a maze from pre-built cells. Only the generator (and test
    /// builders) construct mazes; everything else receives them read-only.
    pub(crate) fn new(
        id: Uuid,
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        start: Position,
        end: Position,
    ) -> Self {
        assert!(
            cells.len() == width as usize * height as usize,
            "cell count does not match maze dimensions"
        );
        Maze {
            id,
            width,
            height,
            cells: cells.into_boxed_slice(),
            start,
            end,
            created_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Checks if the given position is within the bounds of the maze.
    pub fn is_in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < self.width as i32
            && position.y >= 0
            && position.y < self.height as i32
    }

    fn ravel_index(&self, position: Position) -> usize {
        assert!(
            self.is_in_bounds(position),
            "position {} is out of bounds for a {}x{} maze",
            position,
            self.width,
            self.height
        );
        position.y as usize * self.width as usize + position.x as usize
    }
}

impl std::ops::Index<Position> for Maze {
    type Output = Cell;

    fn index(&self, index: Position) -> &Self::Output {
        &self.cells[self.ravel_index(index)]
    }
}

/// Computes which directions are traversable from `position`: the wall must
/// be open and the target cell must be within the grid. Pure function over
/// (maze, position); session state is none of its business.
///
/// Directions come back in the fixed [`Direction::ALL`] order.
///
/// # Panics
/// If `position` is outside the maze. Whoever constructed that position has
/// a bug, and clamping here would only hide it.
pub fn available_directions(maze: &Maze, position: Position) -> Vec<Direction> {
    let cell = &maze[position];
    Direction::ALL
        .into_iter()
        .filter(|&direction| {
            cell.can_move(direction) && maze.is_in_bounds(position.step(direction))
        })
        .collect()
}

/// Builds a maze with every wall closed except the listed openings, for
/// exercising navigation and solvers against hand-shaped layouts. Openings
/// between two in-bounds cells are cleared on both sides; an opening toward
/// the outside clears only the near side (which the generator would never
/// produce, but the bounds check in the session must handle).
#[cfg(test)]
pub(crate) fn maze_with_open_walls(
    width: u32,
    height: u32,
    open: &[(Position, Direction)],
) -> Maze {
    let mut cells: Vec<Cell> = (0..height as i32)
        .flat_map(|y| (0..width as i32).map(move |x| Cell::closed(Position::new(x, y))))
        .collect();

    let index_of =
        |position: Position| position.y as usize * width as usize + position.x as usize;

    for &(position, direction) in open {
        cells[index_of(position)].open(direction);
        let neighbor = position.step(direction);
        let neighbor_in_bounds = neighbor.x >= 0
            && neighbor.x < width as i32
            && neighbor.y >= 0
            && neighbor.y < height as i32;
        if neighbor_in_bounds {
            cells[index_of(neighbor)].open(direction.opposite());
        }
    }

    Maze::new(
        Uuid::new_v4(),
        width,
        height,
        cells,
        Position::new(0, 0),
        Position::new(width as i32 - 1, height as i32 - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_indexing() {
        let maze = maze_with_open_walls(3, 3, &[(Position::new(1, 1), Direction::East)]);
        assert_eq!(maze[Position::new(2, 1)].position(), Position::new(2, 1));
        assert!(maze[Position::new(1, 1)].can_move(Direction::East));
        assert!(maze[Position::new(2, 1)].can_move(Direction::West));
        assert!(maze.created_at() <= std::time::SystemTime::now());
    }

    #[test]
    fn test_out_of_bounds() {
        let maze = maze_with_open_walls(5, 5, &[]);
        assert!(!maze.is_in_bounds(Position::new(5, 5)));
        assert!(!maze.is_in_bounds(Position::new(0, 5)));
        assert!(!maze.is_in_bounds(Position::new(5, 0)));
        assert!(!maze.is_in_bounds(Position::new(-1, 0)));
        assert!(maze.is_in_bounds(Position::new(4, 4)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_indexing_out_of_bounds_panics() {
        let maze = maze_with_open_walls(2, 2, &[]);
        let _ = &maze[Position::new(2, 0)];
    }

    #[test]
    fn test_available_directions_requires_open_wall_and_bounds() {
        // 2x2 with the top edge fully connected and a way down on the right.
        let maze = maze_with_open_walls(
            2,
            2,
            &[
                (Position::new(0, 0), Direction::East),
                (Position::new(1, 0), Direction::South),
            ],
        );
        assert_eq!(
            available_directions(&maze, Position::new(0, 0)),
            vec![Direction::East]
        );
        assert_eq!(
            available_directions(&maze, Position::new(1, 0)),
            vec![Direction::South, Direction::West]
        );
        assert_eq!(
            available_directions(&maze, Position::new(1, 1)),
            vec![Direction::North]
        );
        assert!(available_directions(&maze, Position::new(0, 1)).is_empty());
    }

    #[test]
    fn test_available_directions_excludes_open_boundary_walls() {
        // An opening straight through the northern boundary: the wall flag
        // is clear but the target is outside the grid.
        let maze = maze_with_open_walls(2, 1, &[(Position::new(0, 0), Direction::North)]);
        assert!(maze[Position::new(0, 0)].can_move(Direction::North));
        assert!(available_directions(&maze, Position::new(0, 0)).is_empty());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_available_directions_out_of_bounds_panics() {
        let maze = maze_with_open_walls(2, 2, &[]);
        available_directions(&maze, Position::new(0, 2));
    }

    #[test]
    fn test_fixed_direction_order() {
        // A fully open interior cell reports all four, north first.
        let center = Position::new(1, 1);
        let maze = maze_with_open_walls(
            3,
            3,
            &[
                (center, Direction::North),
                (center, Direction::South),
                (center, Direction::East),
                (center, Direction::West),
            ],
        );
        assert_eq!(available_directions(&maze, center), Direction::ALL.to_vec());
    }
}
