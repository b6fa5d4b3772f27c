use std::time::Duration;

use crate::solvers::Solver;

/// Runtime configuration for the generate-and-solve loop. Plain fields
/// handed to constructors; callers that want different knobs build a
/// different value.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dimensions of every generated maze.
    pub maze_width: u32,
    pub maze_height: u32,
    /// Upper limits accepted by `validate`.
    pub max_width: u32,
    pub max_height: u32,
    /// Which solver strategy drives the sessions.
    pub algorithm: Solver,
    /// Pacing knob: slept between moves, purely for watchability. Does not
    /// affect move counts or correctness.
    pub delay_between_moves: Duration,
    /// Slept between one solved maze and the next generated one.
    pub delay_between_mazes: Duration,
    /// Aggregate stats are logged every this many solve attempts.
    pub stats_interval_mazes: u64,
    /// Seed for both generation and solving; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maze_width: 10,
            maze_height: 10,
            max_width: 50,
            max_height: 50,
            algorithm: Solver::Dfs,
            delay_between_moves: Duration::ZERO,
            delay_between_mazes: Duration::from_millis(2000),
            stats_interval_mazes: 10,
            seed: None,
        }
    }
}

impl Config {
    /// Rejects dimensions the generator must never see. The generator
    /// itself assumes positive dimensions, so this runs first.
    pub fn validate(&self) -> Result<(), String> {
        if self.maze_width == 0 || self.maze_height == 0 {
            return Err("Maze width and height must be at least 1.".to_string());
        }
        if self.maze_width > self.max_width || self.maze_height > self.max_height {
            return Err(format!(
                "Maze dimensions may not exceed {}x{}.",
                self.max_width, self.max_height
            ));
        }
        if self.stats_interval_mazes == 0 {
            return Err("Stats interval must be at least 1.".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = Config {
            maze_width: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let config = Config {
            maze_height: 51,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_limit_dimensions_accepted() {
        let config = Config {
            maze_width: 50,
            maze_height: 50,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
