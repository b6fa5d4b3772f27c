use rand::Rng;
use uuid::Uuid;

use crate::maze::{Cell, Direction, Maze, Position};

/// Carves a perfect maze of the given dimensions using randomized
/// depth-first backtracking with an explicit stack.
///
/// Every wall starts present; carving begins at the origin and removes one
/// wall segment (both sides at once) per step, so the result is a spanning
/// tree over the grid: fully connected, acyclic, exactly one simple path
/// between any two cells. The same seeded rng yields a bit-identical maze.
///
/// Start is always (0, 0) and end always (width-1, height-1).
///
/// # Panics
/// If `width` or `height` is zero. Callers validate dimensions before
/// asking for a maze.
pub fn generate_maze(width: u32, height: u32, rng: &mut impl Rng) -> Maze {
    assert!(
        width > 0 && height > 0,
        "maze dimensions must be positive, got {width}x{height}"
    );

    let (w, h) = (width as usize, height as usize);

    // horizontal[x][y] is the wall on the north side of cell (x, y); the
    // extra row y == h is the southern boundary. vertical[x][y] is the wall
    // on the west side of cell (x, y); the extra column x == w is the
    // eastern boundary.
    let mut horizontal = vec![vec![true; h + 1]; w];
    let mut vertical = vec![vec![true; h]; w + 1];

    let mut visited = vec![vec![false; h]; w];
    visited[0][0] = true;

    let mut stack = vec![(0usize, 0usize)];

    while let Some((x, y)) = stack.pop() {
        let neighbors = unvisited_neighbors(x, y, w, h, &visited);
        if neighbors.is_empty() {
            // Dead end; the pop above is the backtrack.
            continue;
        }

        // Put the cell back first so we can look at another neighbor of
        // this cell later
        stack.push((x, y));

        let (nx, ny, direction) = neighbors[rng.random_range(0..neighbors.len())];
        remove_wall(x, y, direction, &mut horizontal, &mut vertical);
        visited[nx][ny] = true;
        // Push the neighbor to keep carving in that neighbor's direction
        stack.push((nx, ny));
    }

    let cells = build_cells(w, h, &horizontal, &vertical);

    Maze::new(
        Uuid::new_v4(),
        width,
        height,
        cells,
        Position::new(0, 0),
        Position::new(width as i32 - 1, height as i32 - 1),
    )
}

fn unvisited_neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    visited: &[Vec<bool>],
) -> Vec<(usize, usize, Direction)> {
    let mut neighbors = Vec::with_capacity(4);

    if y > 0 && !visited[x][y - 1] {
        neighbors.push((x, y - 1, Direction::North));
    }
    if y < height - 1 && !visited[x][y + 1] {
        neighbors.push((x, y + 1, Direction::South));
    }
    if x < width - 1 && !visited[x + 1][y] {
        neighbors.push((x + 1, y, Direction::East));
    }
    if x > 0 && !visited[x - 1][y] {
        neighbors.push((x - 1, y, Direction::West));
    }

    neighbors
}

/// Clears the wall segment between cell (x, y) and its neighbor toward
/// `direction`. One segment covers both cells' flags, which is what keeps
/// shared walls reciprocal.
fn remove_wall(
    x: usize,
    y: usize,
    direction: Direction,
    horizontal: &mut [Vec<bool>],
    vertical: &mut [Vec<bool>],
) {
    match direction {
        Direction::North => horizontal[x][y] = false,
        Direction::South => horizontal[x][y + 1] = false,
        Direction::East => vertical[x + 1][y] = false,
        Direction::West => vertical[x][y] = false,
    }
}

fn build_cells(
    width: usize,
    height: usize,
    horizontal: &[Vec<bool>],
    vertical: &[Vec<bool>],
) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            cells.push(Cell::new(
                Position::new(x as i32, y as i32),
                horizontal[x][y],
                horizontal[x][y + 1],
                vertical[x + 1][y],
                vertical[x][y],
            ));
        }
    }
    cells
}
