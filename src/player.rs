use std::collections::VecDeque;

use rand::Rng;

use crate::direction::Direction;
use crate::grid::Pos;
use crate::maze::Maze;
use crate::path::resolve_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// A random colour bright enough to read against the wall colour.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            r: rng.gen_range(64..=255),
            g: rng.gen_range(64..=255),
            b: rng.gen_range(64..=255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Moving,
}

/// One cell of movement made during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub from: Pos,
    pub to: Pos,
    pub reached_goal: bool,
}

/// A token walking the maze. Accepts a direction only while idle and then
/// runs the resolved path one cell per tick.
#[derive(Clone, Debug)]
pub struct Player {
    pos: Pos,
    path: VecDeque<Direction>,
    motion: Motion,
    color: Rgb,
    won: bool,
}

impl Player {
    pub fn new(start: Pos, color: Rgb) -> Self {
        Self {
            pos: start,
            path: VecDeque::new(),
            motion: Motion::Idle,
            color,
            won: false,
        }
    }

    pub fn position(&self) -> Pos {
        self.pos
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_moving(&self) -> bool {
        self.motion == Motion::Moving
    }

    /// Steps still queued, in travel order.
    pub fn pending(&self) -> impl Iterator<Item = Direction> + '_ {
        self.path.iter().copied()
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn can_go(&self, maze: &Maze, dir: Direction) -> bool {
        maze.can_go(self.pos, dir)
    }

    /// Starts following the corridor in `dir`. Returns `false`, changing
    /// nothing, when already moving or when the passage is closed.
    pub fn move_toward(&mut self, maze: &Maze, dir: Direction) -> bool {
        if self.is_moving() || !self.can_go(maze, dir) {
            return false;
        }
        self.path = resolve_path(maze, self.pos, dir).into();
        self.motion = if self.path.is_empty() {
            Motion::Idle
        } else {
            Motion::Moving
        };
        self.is_moving()
    }

    /// Advances one cell along the queued path.
    pub fn step(&mut self, maze: &Maze) -> Option<Step> {
        if !self.is_moving() {
            return None;
        }
        let Some(next) = self
            .path
            .pop_front()
            .and_then(|dir| maze.grid().neighbor(self.pos, dir))
        else {
            self.halt();
            return None;
        };

        let from = self.pos;
        self.pos = next;
        let reached_goal = next == maze.goal();
        if reached_goal {
            self.won = true;
            self.halt();
        } else if self.path.is_empty() {
            self.motion = Motion::Idle;
        }
        Some(Step {
            from,
            to: next,
            reached_goal,
        })
    }

    /// Puts the token back on `start`, idle, as after a regeneration.
    pub fn reset(&mut self, start: Pos) {
        self.pos = start;
        self.won = false;
        self.halt();
    }

    fn halt(&mut self) {
        self.path.clear();
        self.motion = Motion::Idle;
    }
}
