use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use uuid::Uuid;

mod bfs;
mod dfs;
mod random_walk;

pub use bfs::BreadthFirst;
pub use dfs::DepthFirst;
pub use random_walk::RandomWalk;

use crate::config::Config;
use crate::generators::get_rng;
use crate::maze::{Direction, Maze, Position, available_directions};
use crate::session::{MazeSession, MoveResult, SessionState};
use crate::store::{MazeStore, SessionStore};

/// Solver strategy selector, typically parsed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Dfs,
    Bfs,
    Random,
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Random => write!(f, "Random Walk"),
        }
    }
}

impl FromStr for Solver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(Solver::Dfs),
            "bfs" => Ok(Solver::Bfs),
            "random" => Ok(Solver::Random),
            other => Err(format!(
                "Unknown solver algorithm '{other}'. Valid values are: dfs, bfs, random."
            )),
        }
    }
}

/// Outcome of one solve attempt. `success == false` means exploration was
/// exhausted without reaching the end; it is a reportable result, not an
/// error.
#[derive(Debug, Clone, Copy)]
pub struct SolveResult {
    pub maze_id: Uuid,
    pub session_id: Uuid,
    pub move_count: u64,
    pub elapsed: Duration,
    pub success: bool,
}

/// Aggregate statistics over many solve attempts. Only successful solves
/// contribute to the move and time totals.
#[derive(Debug, Default)]
pub struct SolverStats {
    mazes_solved: u64,
    mazes_failed: u64,
    total_moves: u64,
    total_elapsed: Duration,
}

impl SolverStats {
    pub fn record(&mut self, result: &SolveResult) {
        if result.success {
            self.mazes_solved += 1;
            self.total_moves += result.move_count;
            self.total_elapsed += result.elapsed;
        } else {
            self.mazes_failed += 1;
        }
    }

    pub fn mazes_solved(&self) -> u64 {
        self.mazes_solved
    }

    pub fn mazes_failed(&self) -> u64 {
        self.mazes_failed
    }

    pub fn attempts(&self) -> u64 {
        self.mazes_solved + self.mazes_failed
    }

    pub fn total_moves(&self) -> u64 {
        self.total_moves
    }

    pub fn average_moves(&self) -> f64 {
        if self.mazes_solved > 0 {
            self.total_moves as f64 / self.mazes_solved as f64
        } else {
            0.0
        }
    }

    pub fn average_elapsed(&self) -> Duration {
        if self.mazes_solved > 0 {
            self.total_elapsed / self.mazes_solved as u32
        } else {
            Duration::ZERO
        }
    }
}

/// Progress events emitted by the solve driver for observers such as the
/// terminal renderer. Sending is best-effort; a missing observer never
/// stalls a solve.
#[derive(Debug, Clone)]
pub enum SolveEvent {
    Started {
        maze: Arc<Maze>,
        session_id: Uuid,
    },
    Moved {
        direction: Direction,
        from: Position,
        to: Position,
        revisited: bool,
    },
    Finished {
        success: bool,
        move_count: u64,
    },
}

/// Failures before the exploration loop can even start. Exploration running
/// out of options is *not* one of these; that is a `SolveResult` with
/// `success == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    MazeNotFound(Uuid),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::MazeNotFound(id) => write!(f, "maze {id} was not found in the store"),
        }
    }
}

impl std::error::Error for SolveError {}

/// The per-strategy choice policy. Implementations see only the currently
/// available directions and the shared visited set, never the wall grid;
/// their knowledge of the maze grows one cell at a time.
pub trait NextMove {
    /// Chooses the direction of the next move, or `None` when no unvisited
    /// affordance exists and no backtrack/frontier option remains.
    fn next_move(
        &mut self,
        current: Position,
        available: &[Direction],
        visited: &HashSet<Position>,
    ) -> Option<Direction>;
}

fn strategy_for(solver: Solver, rng: StdRng) -> Box<dyn NextMove> {
    match solver {
        Solver::Dfs => Box::new(DepthFirst::new()),
        Solver::Bfs => Box::new(BreadthFirst::new()),
        Solver::Random => Box::new(RandomWalk::new(rng)),
    }
}

/// The available directions whose target has not been visited yet, in the
/// same fixed order they came in.
fn unvisited_moves(
    current: Position,
    available: &[Direction],
    visited: &HashSet<Position>,
) -> Vec<Direction> {
    available
        .iter()
        .copied()
        .filter(|&direction| !visited.contains(&current.step(direction)))
        .collect()
}

/// Picks the available direction that reduces the distance to `target`,
/// preferring the x-axis. Exact when `target` is an adjacent cell (the
/// backtrack-stack strategies only ever pass those); for farther targets
/// this is a greedy guess that can be walled off. `None` when the preferred
/// direction is not available.
fn move_toward(from: Position, target: Position, available: &[Direction]) -> Option<Direction> {
    let preferred = if target.x > from.x {
        Direction::East
    } else if target.x < from.x {
        Direction::West
    } else if target.y > from.y {
        Direction::South
    } else {
        Direction::North
    };
    available.contains(&preferred).then_some(preferred)
}

/// Drives one full solve attempt: starts a session through the stores, then
/// loops affordance query -> strategy choice -> move until the session
/// completes or the strategy gives up. The strategy never touches the maze;
/// it only ever sees what `available_directions` reports from the current
/// position.
///
/// The cancel flag is checked once per iteration, never mid-move.
pub fn solve_maze(
    maze_id: Uuid,
    mazes: &MazeStore,
    sessions: &SessionStore,
    solver: Solver,
    config: &Config,
    cancel: &AtomicBool,
    events: Option<&SyncSender<SolveEvent>>,
) -> Result<SolveResult, SolveError> {
    let started = Instant::now();

    let maze = mazes.get(maze_id).ok_or(SolveError::MazeNotFound(maze_id))?;
    let session_id = Uuid::new_v4();
    let session = sessions.save(MazeSession::new(session_id, maze_id, maze.start()));

    tracing::info!(
        "[solver] started maze {} session {} at {} with {}",
        maze_id,
        session_id,
        maze.start(),
        solver
    );

    let mut strategy = strategy_for(solver, get_rng(config.seed));
    let mut visited: HashSet<Position> = HashSet::from([maze.start()]);

    if let Some(tx) = events {
        tx.send(SolveEvent::Started {
            maze: maze.clone(),
            session_id,
        })
        .ok();
    }

    loop {
        let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.state() == SessionState::Completed {
            break;
        }
        if cancel.load(Ordering::Relaxed) {
            tracing::info!("[solver] cancelled at {}", guard.current_position());
            break;
        }

        let current = guard.current_position();
        let available = available_directions(&maze, current);

        let Some(direction) = strategy.next_move(current, &available, &visited) else {
            tracing::warn!(
                "[solver] no unvisited moves and nothing to backtrack to at {}",
                current
            );
            break;
        };

        let result = guard.apply_move(direction, &maze);
        if result != MoveResult::Success {
            // Strategies only pick affordance-backed directions, so any
            // other outcome is a bookkeeping bug worth surfacing.
            tracing::warn!(
                "[solver] move {} from {} rejected: {:?}",
                direction,
                current,
                result
            );
            break;
        }

        let to = guard.current_position();
        drop(guard);

        let revisited = !visited.insert(to);
        tracing::debug!(
            "[solver] moved {} from {} to {}, visited: {}",
            direction,
            current,
            to,
            visited.len()
        );

        if let Some(tx) = events {
            tx.send(SolveEvent::Moved {
                direction,
                from: current,
                to,
                revisited,
            })
            .ok();
        }

        if !config.delay_between_moves.is_zero() {
            std::thread::sleep(config.delay_between_moves);
        }
    }

    let guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    let success = guard.state() == SessionState::Completed;
    let move_count = guard.move_count();
    drop(guard);

    let elapsed = started.elapsed();

    if let Some(tx) = events {
        tx.send(SolveEvent::Finished {
            success,
            move_count,
        })
        .ok();
    }

    tracing::info!(
        "[solver] maze {} {} in {} moves ({:?})",
        maze_id,
        if success { "solved" } else { "failed" },
        move_count,
        elapsed
    );

    Ok(SolveResult {
        maze_id,
        session_id,
        move_count,
        elapsed,
        success,
    })
}
