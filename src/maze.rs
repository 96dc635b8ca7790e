use log::info;
use rand::Rng;

use crate::direction::Direction;
use crate::error::Result;
use crate::generator::{self, Dimensions};
use crate::grid::{Grid, Pos};
use crate::topology::{CellKind, Topology};

/// Entry cell of every maze: the first interior block of the drawn lattice.
pub const START: Pos = Pos::new(0, 0);

/// A carved grid together with its cached topology. Read-only once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    topology: Topology,
}

impl Maze {
    pub fn from_grid(grid: Grid) -> Self {
        let topology = Topology::analyze(&grid, START);
        Self { grid, topology }
    }

    pub fn carve(rng: &mut impl Rng, dims: Dimensions) -> Self {
        let maze = Self::from_grid(generator::carve(rng, dims));
        info!(
            "generated {}x{} maze, goal at ({}, {})",
            dims.width,
            dims.height,
            maze.goal().x,
            maze.goal().y
        );
        maze
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn start(&self) -> Pos {
        START
    }

    pub fn goal(&self) -> Pos {
        self.topology.goal()
    }

    pub fn classify(&self, pos: Pos) -> CellKind {
        self.topology.classify(pos)
    }

    pub fn is_fork(&self, pos: Pos) -> bool {
        self.topology.is_fork(pos)
    }

    pub fn is_dead_end(&self, pos: Pos) -> bool {
        self.topology.is_dead_end(pos)
    }

    pub fn can_go(&self, pos: Pos, dir: Direction) -> bool {
        self.grid.is_open(pos, dir)
    }

    #[cfg(test)]
    pub(crate) fn with_goal(mut self, goal: Pos) -> Self {
        self.topology.set_goal(goal);
        self
    }
}

/// Sizes a maze from an aspect ratio and cell budget, then carves it.
pub fn generate(rng: &mut impl Rng, aspect_ratio: f64, target_cells: usize) -> Result<Maze> {
    let dims = Dimensions::fit(aspect_ratio, target_cells)?;
    Ok(Maze::carve(rng, dims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generate_fits_requested_shape() {
        let maze = generate(&mut StdRng::seed_from_u64(3), 1.5, 600).unwrap();
        assert_eq!((maze.width(), maze.height()), (30, 20));
        assert_eq!(maze.grid().passage_count(), 30 * 20 - 1);
        assert_ne!(maze.goal(), maze.start());
    }

    #[test]
    fn fixed_rng_two_by_two_goal() {
        let maze = generate(&mut StepRng::new(0, 0), 1.0, 4).unwrap();
        assert_eq!(maze.goal(), Pos::new(0, 1));
        assert!(maze.can_go(maze.start(), Direction::East));
        assert!(!maze.can_go(maze.start(), Direction::South));
        assert!(maze.is_dead_end(maze.start()));
        assert_eq!(maze.classify(Pos::new(1, 0)), CellKind::Corridor);
    }

    #[test]
    fn invalid_aspect_is_reported() {
        assert!(generate(&mut StdRng::seed_from_u64(0), 0.0, 100).is_err());
    }
}
