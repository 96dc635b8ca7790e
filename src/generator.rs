use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::direction::Direction;
use crate::error::{MazeError, Result};
use crate::grid::{Grid, Pos};

/// Smallest side a generated maze may have.
pub const MIN_SIDE: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(MIN_SIDE),
            height: height.max(MIN_SIDE),
        }
    }

    /// Picks a `width x height` close to `aspect_ratio` (width / height) and
    /// to `target_cells` in area. Budgets under four cells give a 2x2 grid.
    pub fn fit(aspect_ratio: f64, target_cells: usize) -> Result<Self> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(MazeError::InvalidAspectRatio(aspect_ratio));
        }
        let cells = target_cells.max(MIN_SIDE * MIN_SIDE);
        let longest = cells / MIN_SIDE;

        let height = (cells as f64 / aspect_ratio).sqrt().round() as usize;
        let height = height.clamp(MIN_SIDE, longest);
        let width = (height as f64 * aspect_ratio).round() as usize;
        let width = width.clamp(MIN_SIDE, longest);
        Ok(Self { width, height })
    }

    /// Shrinks to fit a viewport, never below the minimum side.
    pub fn clamp_to(self, max_width: usize, max_height: usize) -> Self {
        Self::new(self.width.min(max_width), self.height.min(max_height))
    }

    pub fn cell_count(self) -> usize {
        self.width * self.height
    }
}

/// Carves a perfect maze with the recursive backtracker.
///
/// The walk starts on a random cell and keeps an explicit stack: from the top
/// cell it opens the wall to a random unvisited neighbour and pushes it, or
/// pops when every neighbour is already visited. Each carve joins a visited
/// cell to an unvisited one, so the result is a spanning tree.
pub fn carve(rng: &mut impl Rng, dims: Dimensions) -> Grid {
    let mut grid = Grid::new(dims.width, dims.height);
    let mut visited = vec![false; grid.cell_count()];
    let index = |pos: Pos| pos.y * dims.width + pos.x;

    let seed = Pos::new(rng.gen_range(0..dims.width), rng.gen_range(0..dims.height));
    visited[index(seed)] = true;
    let mut stack = vec![seed];
    let mut options = Vec::with_capacity(Direction::ALL.len());

    while let Some(&current) = stack.last() {
        options.clear();
        for dir in Direction::ALL {
            if let Some(next) = grid.adjacent(current, dir) {
                if !visited[index(next)] {
                    options.push(dir);
                }
            }
        }

        match options.choose(rng) {
            Some(&dir) => {
                let next = grid.carve(current, dir);
                visited[index(next)] = true;
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    debug!(
        "carved {}x{} maze from seed cell ({}, {}), {} passages",
        dims.width,
        dims.height,
        seed.x,
        seed.y,
        grid.passage_count()
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn reachable_from(grid: &Grid, start: Pos) -> usize {
        let mut seen = vec![false; grid.cell_count()];
        let mut q = VecDeque::new();
        seen[start.y * grid.width() + start.x] = true;
        q.push_back(start);
        let mut count = 0;
        while let Some(pos) = q.pop_front() {
            count += 1;
            for dir in grid.passages(pos).iter() {
                if let Some(next) = grid.neighbor(pos, dir) {
                    let i = next.y * grid.width() + next.x;
                    if !seen[i] {
                        seen[i] = true;
                        q.push_back(next);
                    }
                }
            }
        }
        count
    }

    #[test]
    fn fit_matches_aspect_and_budget() {
        let dims = Dimensions::fit(1.0, 600).unwrap();
        assert_eq!(dims, Dimensions { width: 24, height: 24 });

        let wide = Dimensions::fit(2.0, 800).unwrap();
        assert_eq!(wide, Dimensions { width: 40, height: 20 });
    }

    #[test]
    fn fit_clamps_tiny_budgets() {
        assert_eq!(Dimensions::fit(1.0, 0).unwrap(), Dimensions::new(2, 2));
        assert_eq!(Dimensions::fit(1.0, 3).unwrap(), Dimensions::new(2, 2));
        let skewed = Dimensions::fit(1000.0, 10).unwrap();
        assert!(skewed.width >= MIN_SIDE && skewed.height >= MIN_SIDE);
        assert!(skewed.width <= 5);
    }

    #[test]
    fn fit_rejects_bad_aspect_ratio() {
        assert!(matches!(
            Dimensions::fit(0.0, 100),
            Err(MazeError::InvalidAspectRatio(_))
        ));
        assert!(Dimensions::fit(-1.5, 100).is_err());
        assert!(Dimensions::fit(f64::NAN, 100).is_err());
        assert!(Dimensions::fit(f64::INFINITY, 100).is_err());
    }

    #[test]
    fn clamp_to_keeps_minimum() {
        let dims = Dimensions::new(30, 20).clamp_to(10, 1);
        assert_eq!(dims, Dimensions { width: 10, height: 2 });
    }

    #[test]
    fn two_by_two_with_fixed_rng_is_a_snake() {
        // A zero stream always takes the first option: seed (0, 0), then
        // east, south, west.
        let mut rng = StepRng::new(0, 0);
        let grid = carve(&mut rng, Dimensions::new(2, 2));

        assert_eq!(grid.passage_count(), 3);
        assert!(grid.is_open(Pos::new(0, 0), Direction::East));
        assert!(grid.is_open(Pos::new(1, 0), Direction::South));
        assert!(grid.is_open(Pos::new(1, 1), Direction::West));
        assert!(!grid.is_open(Pos::new(0, 0), Direction::South));
    }

    #[test]
    fn same_seed_same_maze() {
        let dims = Dimensions::new(12, 9);
        let a = carve(&mut StdRng::seed_from_u64(7), dims);
        let b = carve(&mut StdRng::seed_from_u64(7), dims);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn carving_yields_spanning_tree(seed in any::<u64>(), w in 2usize..16, h in 2usize..16) {
            let grid = carve(&mut StdRng::seed_from_u64(seed), Dimensions::new(w, h));
            prop_assert_eq!(grid.passage_count(), w * h - 1);
            prop_assert_eq!(reachable_from(&grid, Pos::new(0, 0)), w * h);
        }

        #[test]
        fn passages_are_symmetric_and_closed_at_border(seed in any::<u64>(), w in 2usize..12, h in 2usize..12) {
            let grid = carve(&mut StdRng::seed_from_u64(seed), Dimensions::new(w, h));
            for pos in grid.cells() {
                for dir in Direction::ALL {
                    match grid.adjacent(pos, dir) {
                        Some(next) => {
                            prop_assert_eq!(grid.is_open(pos, dir), grid.is_open(next, dir.opposite()));
                        }
                        None => {
                            prop_assert!(!grid.is_open(pos, dir));
                        }
                    }
                }
            }
        }
    }
}
