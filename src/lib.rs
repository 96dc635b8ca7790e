//! Perfect-maze generation and corridor-following movement.
//!
//! A maze is carved once per size, classified into corridors, forks and dead
//! ends, and given a goal at the cell farthest from the start. Tokens move by
//! whole corridors: one direction carries a token on until the next fork or
//! dead end, one cell per tick.

pub mod config;
pub mod direction;
pub mod error;
pub mod generator;
pub mod grid;
pub mod maze;
pub mod path;
pub mod player;
pub mod session;
pub mod topology;

pub use direction::Direction;
pub use error::{MazeError, Result};
pub use generator::Dimensions;
pub use grid::{Grid, Passages, Pos};
pub use maze::{generate, Maze};
pub use path::resolve_path;
pub use player::{Motion, Player, Rgb, Step};
pub use session::{ControlScheme, Session, TickReport};
pub use topology::{CellKind, Topology};
