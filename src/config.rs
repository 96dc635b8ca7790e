use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_CELLS: usize = 600;
pub const DEFAULT_TICK_MS: u64 = 40;
pub const DEFAULT_RENDER_FPS: u64 = 120;

/// Corridor-following maze for the terminal.
///
/// Arrows, WASD and IJKL each drive their own token; q or Esc quits.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Random seed for maze carving and token colours; drawn fresh when omitted.
    #[arg(long, env = "MAZE_SEED")]
    pub seed: Option<u64>,

    /// Target number of maze cells, shrunk to fit the terminal.
    #[arg(long, env = "MAZE_CELLS", default_value_t = DEFAULT_CELLS)]
    pub cells: usize,

    /// Milliseconds between movement ticks.
    #[arg(
        long = "tick-ms",
        env = "MAZE_TICK_MS",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    pub tick_ms: u64,

    /// Screen refreshes per second.
    #[arg(
        long,
        env = "MAZE_FPS",
        default_value_t = DEFAULT_RENDER_FPS,
        value_parser = clap::value_parser!(u64).range(1..=1_000)
    )]
    pub fps: u64,

    /// Mark fork cells with a dot.
    #[arg(long = "show-forks", env = "MAZE_SHOW_FORKS")]
    pub show_forks: bool,

    /// Write log output to this file; logging is off otherwise unless RUST_LOG is set.
    #[arg(long = "log-file", env = "MAZE_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }

    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let config = Config::try_parse_from(["maze"]).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(DEFAULT_TICK_MS));
        assert_eq!(config.cells, DEFAULT_CELLS);
        assert!(!config.show_forks);
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = Config::try_parse_from([
            "maze",
            "--seed",
            "99",
            "--cells",
            "120",
            "--tick-ms",
            "15",
            "--fps",
            "50",
            "--show-forks",
        ])
        .unwrap();
        assert_eq!(config.seed_or_random(), 99);
        assert_eq!(config.cells, 120);
        assert_eq!(config.tick_interval(), Duration::from_millis(15));
        assert_eq!(config.frame_time(), Duration::from_millis(20));
        assert!(config.show_forks);
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Config::try_parse_from(["maze", "--tick-ms", "0"]).is_err());
        assert!(Config::try_parse_from(["maze", "--fps", "0"]).is_err());
    }
}
