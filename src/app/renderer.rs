use std::fmt;
use std::io::{Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::maze::{Maze, Position};
use crate::solvers::SolveEvent;

/// One rendered tile of the expanded maze grid. A maze of w x h cells is
/// drawn as a (2w+1) x (2h+1) tile grid: cells at odd coordinates, wall
/// segments between them, wall posts at the even-even corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
    Start,
    End,
    Solver,
    Visited,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "⬜".with(Color::White),
            Tile::Open => "  ".with(Color::Reset),
            Tile::Start => "🟩".with(Color::Green),
            Tile::End => "🟥".with(Color::Red),
            Tile::Solver => "🟡".with(Color::Yellow),
            Tile::Visited => "* ".with(Color::Blue),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::CELL_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Tile grid dimensions (columns, rows) for a maze.
fn grid_dims(maze: &Maze) -> (u16, u16) {
    ((2 * maze.width() + 1) as u16, (2 * maze.height() + 1) as u16)
}

/// The tile at grid coordinate (gx, gy), derived from the wall layout.
fn tile_at(maze: &Maze, gx: u16, gy: u16) -> Tile {
    let x_odd = gx % 2 == 1;
    let y_odd = gy % 2 == 1;
    let position = Position::new((gx / 2) as i32, (gy / 2) as i32);

    match (x_odd, y_odd) {
        // Cell interior.
        (true, true) => {
            if position == maze.start() {
                Tile::Start
            } else if position == maze.end() {
                Tile::End
            } else {
                Tile::Open
            }
        }
        // Gap between horizontally adjacent cells; `position` is the
        // eastern one of the pair.
        (false, true) => {
            if gx == 0 || !maze.is_in_bounds(position) || maze[position].has_west_wall() {
                Tile::Wall
            } else {
                Tile::Open
            }
        }
        // Gap between vertically adjacent cells; `position` is the
        // southern one of the pair.
        (true, false) => {
            if gy == 0 || !maze.is_in_bounds(position) || maze[position].has_north_wall() {
                Tile::Wall
            } else {
                Tile::Open
            }
        }
        // Wall post.
        (false, false) => Tile::Wall,
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// The maze currently on screen, kept for coordinate mapping
    maze: Option<Arc<Maze>>,
    /// Time to wait after rendering each move to keep the animation visible
    refresh: Duration,
}

impl Renderer {
    pub fn new(refresh: Duration) -> Self {
        Self {
            stdout: std::io::stdout(),
            maze: None,
            refresh,
        }
    }

    /// Check if the terminal is large enough for the maze plus one status
    /// row. If not, displays a message and returns Ok(false).
    fn check_size(stdout: &mut Stdout, maze: &Maze) -> std::io::Result<bool> {
        let (cols, rows) = grid_dims(maze);
        let (term_width, term_height) = terminal::size()?;
        if term_width < cols * Tile::CELL_WIDTH || term_height < rows + 1 {
            let msg = format!(
                "Terminal size ({}x{}) is too small for a {}x{} maze ({}x{} needed). Please enlarge the terminal and restart.\r\n",
                term_width,
                term_height,
                maze.width(),
                maze.height(),
                cols * Tile::CELL_WIDTH,
                rows + 1
            );
            queue!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold))
            )?;
            stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    fn draw_maze(&mut self, maze: &Maze) -> std::io::Result<()> {
        let (cols, rows) = grid_dims(maze);
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for gy in 0..rows {
            for gx in 0..cols {
                self.stdout.queue(style::Print(tile_at(maze, gx, gy)))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        self.draw_cell(maze.start(), Tile::Solver)?;
        self.stdout.flush()
    }

    fn draw_cell(&mut self, position: Position, tile: Tile) -> std::io::Result<()> {
        let gx = (2 * position.x + 1) as u16;
        let gy = (2 * position.y + 1) as u16;
        queue!(
            self.stdout,
            cursor::MoveTo(gx * Tile::CELL_WIDTH, gy),
            style::Print(tile)
        )
    }

    /// Paints the wall-gap tile between two adjacent cells.
    fn draw_gap(&mut self, from: Position, to: Position, tile: Tile) -> std::io::Result<()> {
        let gx = (from.x + to.x + 1) as u16;
        let gy = (from.y + to.y + 1) as u16;
        queue!(
            self.stdout,
            cursor::MoveTo(gx * Tile::CELL_WIDTH, gy),
            style::Print(tile)
        )
    }

    fn draw_status(&mut self, maze: &Maze, success: bool, move_count: u64) -> std::io::Result<()> {
        let (_, rows) = grid_dims(maze);
        let msg = if success {
            format!("Solved in {} moves.", move_count).with(Color::Green)
        } else {
            format!("No path found after {} moves.", move_count).with(Color::Red)
        };
        queue!(
            self.stdout,
            cursor::MoveTo(0, rows),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(msg.attribute(Attribute::Bold))
        )?;
        self.stdout.flush()
    }

    /// Render loop over solve events.
    /// Returns Ok(true) if rendering completed (event channel closed)
    /// Returns Ok(false) if rendering was cancelled
    /// Returns Err if there was an I/O error
    pub fn render(
        &mut self,
        events: Receiver<SolveEvent>,
        cancel: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<bool> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.stdout.flush()?;

        loop {
            let event = match events.recv() {
                // Channel disconnected, the solve loop is finished
                Err(_e) => break,
                Ok(event) => event,
            };
            if cancel.load(Ordering::Relaxed) {
                return Ok(false);
            }

            match event {
                SolveEvent::Started { maze, session_id } => {
                    tracing::debug!("[render] maze {} session {}", maze.id(), session_id);
                    if !Renderer::check_size(&mut self.stdout, &maze)? {
                        cancel.store(true, Ordering::Relaxed);
                        return Ok(false);
                    }
                    self.draw_maze(&maze)?;
                    self.maze = Some(maze);
                }
                SolveEvent::Moved { from, to, .. } => {
                    let Some(maze) = self.maze.clone() else {
                        continue;
                    };
                    let from_tile = if from == maze.start() {
                        Tile::Start
                    } else {
                        Tile::Visited
                    };
                    self.draw_cell(from, from_tile)?;
                    self.draw_gap(from, to, Tile::Visited)?;
                    self.draw_cell(to, Tile::Solver)?;
                    self.stdout.flush()?;
                    std::thread::sleep(self.refresh);
                }
                SolveEvent::Finished {
                    success,
                    move_count,
                } => {
                    let Some(maze) = self.maze.clone() else {
                        continue;
                    };
                    self.draw_status(&maze, success, move_count)?;
                }
            }
        }

        // Move cursor below the maze after exiting
        if let Some(maze) = self.maze.take() {
            let (_, rows) = grid_dims(&maze);
            queue!(self.stdout, cursor::MoveTo(0, rows + 1), cursor::Show)?;
            self.stdout.flush()?;
        }
        done.store(true, Ordering::Relaxed);
        Ok(true)
    }
}
