use std::collections::BTreeMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::direction::Direction;
use crate::generator::Dimensions;
use crate::grid::Pos;
use crate::maze::Maze;
use crate::player::{Player, Rgb};

/// Key layouts that can each drive one token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlScheme {
    Arrows,
    Wasd,
    Ijkl,
}

impl ControlScheme {
    pub const ALL: [ControlScheme; 3] = [
        ControlScheme::Arrows,
        ControlScheme::Wasd,
        ControlScheme::Ijkl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ControlScheme::Arrows => "arrows",
            ControlScheme::Wasd => "wasd",
            ControlScheme::Ijkl => "ijkl",
        }
    }
}

/// What one tick changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Cells vacated or entered this tick, each listed once.
    pub dirty: Vec<Pos>,
    /// Schemes whose token arrived on the goal this tick.
    pub arrivals: Vec<ControlScheme>,
}

impl TickReport {
    fn mark(&mut self, pos: Pos) {
        if !self.dirty.contains(&pos) {
            self.dirty.push(pos);
        }
    }
}

/// Mixed into the seed for the colour stream.
const PALETTE_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The shared maze plus one token per control scheme that has been used.
///
/// Mazes and token colours draw from separate streams, so the mazes a seed
/// produces do not depend on how many tokens have joined.
pub struct Session {
    seed: u64,
    rng: StdRng,
    palette: StdRng,
    maze: Maze,
    players: BTreeMap<ControlScheme, Player>,
}

impl Session {
    pub fn new(seed: u64, dims: Dimensions) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let maze = Maze::carve(&mut rng, dims);
        Self {
            seed,
            rng,
            palette: StdRng::seed_from_u64(seed ^ PALETTE_SALT),
            maze,
            players: BTreeMap::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Tokens in draw order; later entries are drawn over earlier ones.
    pub fn players(&self) -> impl Iterator<Item = (ControlScheme, &Player)> {
        self.players.iter().map(|(scheme, player)| (*scheme, player))
    }

    pub fn player(&self, scheme: ControlScheme) -> Option<&Player> {
        self.players.get(&scheme)
    }

    pub fn winners(&self) -> Vec<ControlScheme> {
        self.players
            .iter()
            .filter(|(_, player)| player.has_won())
            .map(|(scheme, _)| *scheme)
            .collect()
    }

    /// Routes a directional key press to its scheme's token, creating the
    /// token on first use. Returns whether a movement started.
    pub fn press(&mut self, scheme: ControlScheme, dir: Direction) -> bool {
        let start = self.maze.start();
        let palette = &mut self.palette;
        let player = self.players.entry(scheme).or_insert_with(|| {
            let color = Rgb::random(palette);
            info!("{} joined at ({}, {})", scheme.name(), start.x, start.y);
            Player::new(start, color)
        });
        let started = player.move_toward(&self.maze, dir);
        if started {
            debug!(
                "{} moving {:?}, {} steps",
                scheme.name(),
                dir,
                player.pending().count()
            );
        }
        started
    }

    /// Advances every moving token by one cell.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        for (scheme, player) in self.players.iter_mut() {
            let Some(step) = player.step(&self.maze) else {
                continue;
            };
            report.mark(step.from);
            report.mark(step.to);
            if step.reached_goal {
                info!(
                    "{} reached the goal at ({}, {})",
                    scheme.name(),
                    step.to.x,
                    step.to.y
                );
                report.arrivals.push(*scheme);
            }
        }
        report
    }

    /// Replaces the maze and puts every token back on the start, idle.
    pub fn regenerate(&mut self, dims: Dimensions) {
        self.maze = Maze::carve(&mut self.rng, dims);
        let start = self.maze.start();
        for player in self.players.values_mut() {
            player.reset(start);
        }
        info!(
            "regenerated {}x{} maze, {} tokens reset",
            dims.width,
            dims.height,
            self.players.len()
        );
    }
}
