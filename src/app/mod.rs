mod renderer;

use std::io::{Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    terminal::{self, ClearType},
};

use crate::app::renderer::Renderer;
use crate::config::Config;
use crate::generators::{generate_maze, get_rng};
use crate::solvers::{SolveEvent, SolverStats, solve_maze};
use crate::store::{MazeStore, SessionStore};

/// Generate-and-solve host: owns the stores and runs the endless loop of
/// carving a maze, letting the configured strategy explore it, and logging
/// aggregate statistics. Rendering and input each get their own thread; the
/// solve loop stays on the caller's.
pub struct App {
    config: Config,
    mazes: Arc<MazeStore>,
    sessions: Arc<SessionStore>,
}

impl App {
    /// Maximum number of solve events to buffer between the solve loop and
    /// the render thread
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;
    /// Pause after rendering each move so the animation stays watchable
    const RENDER_REFRESH_TIME: Duration = Duration::from_millis(25);
    /// How often the input thread re-checks the done/cancel flags
    const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
    /// Backoff before retrying after a store lookup failure
    const STORE_RETRY_BACKOFF: Duration = Duration::from_secs(5);

    pub fn new(config: Config) -> Self {
        Self {
            config,
            mazes: Arc::new(MazeStore::new()),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    pub fn maze_store(&self) -> &MazeStore {
        &self.mazes
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.sessions
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop: spawns the input and render threads, then
    /// drives the generate-and-solve loop until Esc is pressed.
    pub fn run(&self) -> std::io::Result<()> {
        let cancel = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));

        // Spawn a thread to listen for user input
        let cancel_for_input = cancel.clone();
        let done_for_input = done.clone();
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_for_escape(&cancel_for_input, &done_for_input)
        });

        let (event_tx, event_rx) =
            mpsc::sync_channel::<SolveEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);

        // Spawn a thread to listen for solve events and render the maze
        let cancel_for_render = cancel.clone();
        let done_for_render = done.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = Renderer::new(App::RENDER_REFRESH_TIME);
            renderer.render(event_rx, &cancel_for_render, &done_for_render)
        });

        self.solve_loop(event_tx, &cancel);

        // Wait for input thread to finish
        let _ = input_thread_handle.join();

        // Wait for render thread to finish
        let completed = render_thread_handle
            .join()
            .expect("Render thread panicked")?;
        if !completed {
            tracing::info!("[app] rendering was cancelled by user");
        }
        Ok(())
    }

    /// Generates and solves mazes until the cancel flag is raised. The
    /// event sender is dropped on exit, which is what tells the render
    /// thread to finish up.
    fn solve_loop(&self, events: SyncSender<SolveEvent>, cancel: &AtomicBool) {
        let mut rng = get_rng(self.config.seed);
        let mut stats = SolverStats::default();

        while !cancel.load(Ordering::Relaxed) {
            let maze = self.mazes.save(generate_maze(
                self.config.maze_width,
                self.config.maze_height,
                &mut rng,
            ));
            tracing::info!(
                "[app] generated maze {} ({}x{})",
                maze.id(),
                maze.width(),
                maze.height()
            );

            match solve_maze(
                maze.id(),
                &self.mazes,
                &self.sessions,
                self.config.algorithm,
                &self.config,
                cancel,
                Some(&events),
            ) {
                Ok(result) => {
                    stats.record(&result);
                    if stats.attempts() % self.config.stats_interval_mazes == 0 {
                        tracing::info!(
                            "[app] stats after {} attempts: {} solved, {} failed, {:.1} avg moves, {:?} avg time",
                            stats.attempts(),
                            stats.mazes_solved(),
                            stats.mazes_failed(),
                            stats.average_moves(),
                            stats.average_elapsed()
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "[app] solve failed: {e}; retrying in {:?}",
                        App::STORE_RETRY_BACKOFF
                    );
                    std::thread::sleep(App::STORE_RETRY_BACKOFF);
                    continue;
                }
            }

            if cancel.load(Ordering::Relaxed) {
                break;
            }
            if !self.config.delay_between_mazes.is_zero() {
                std::thread::sleep(self.config.delay_between_mazes);
            }
        }

        tracing::info!("[app] solve loop exited after {} attempts", stats.attempts());
    }

    /// Listen for the Esc key and raise the cancel flag when it arrives.
    /// This function runs in a separate thread, and is the only place where
    /// user input is read.
    fn listen_for_escape(cancel: &AtomicBool, done: &AtomicBool) -> std::io::Result<()> {
        loop {
            // Check if render is done or canceled
            if done.load(Ordering::Relaxed) || cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            // Poll for events with a timeout
            if !event::poll(App::INPUT_POLL_TIMEOUT)? {
                // No event available, continue loop to check flags again
                continue;
            }

            if let event::Event::Key(key_event) = event::read()? {
                if key_event.kind == event::KeyEventKind::Press && key_event.code == KeyCode::Esc {
                    tracing::debug!("[input loop] Esc key pressed, exiting");
                    cancel.store(true, Ordering::Relaxed);
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::Solver;

    fn quick_config() -> Config {
        Config {
            maze_width: 4,
            maze_height: 4,
            algorithm: Solver::Dfs,
            delay_between_mazes: Duration::ZERO,
            seed: Some(5),
            ..Config::default()
        }
    }

    #[test]
    fn test_solve_loop_stops_immediately_when_cancelled() {
        let app = App::new(quick_config());
        let cancel = AtomicBool::new(true);
        let (tx, rx) = mpsc::sync_channel(16);
        app.solve_loop(tx, &cancel);
        assert!(rx.iter().next().is_none(), "no events after cancel");
        assert!(app.maze_store().get_all().is_empty());
    }

    #[test]
    fn test_solve_loop_generates_and_solves_mazes() {
        let app = Arc::new(App::new(quick_config()));
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::sync_channel(10_000);

        let app_for_loop = app.clone();
        let cancel_for_loop = cancel.clone();
        let handle = std::thread::spawn(move || app_for_loop.solve_loop(tx, &cancel_for_loop));

        // Stop after the first completed solve. The loop may already be one
        // maze further along; the buffered channel absorbs that.
        for event in rx.iter() {
            if let SolveEvent::Finished { success, .. } = event {
                assert!(success, "a generated maze is always solvable");
                cancel.store(true, Ordering::Relaxed);
                break;
            }
        }
        for _ in rx.iter() {}
        handle.join().expect("solve loop thread panicked");

        assert!(!app.maze_store().get_all().is_empty());
        assert!(!app.session_store().get_all().is_empty());
    }
}
