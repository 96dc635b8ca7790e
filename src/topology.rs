use std::collections::VecDeque;

use crate::grid::{Grid, Pos};

/// How a cell shapes corridor-following.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// No open passage. Only hand-built grids have these.
    Isolated,
    /// One open passage.
    DeadEnd,
    /// Two open passages; movement flows straight through.
    Corridor,
    /// Three or four open passages.
    Fork,
}

impl CellKind {
    pub fn from_open_count(open: usize) -> Self {
        match open {
            0 => CellKind::Isolated,
            1 => CellKind::DeadEnd,
            2 => CellKind::Corridor,
            _ => CellKind::Fork,
        }
    }

    /// Every cell but a corridor is where a moving token stops.
    pub fn is_decision_point(self) -> bool {
        self != CellKind::Corridor
    }
}

/// Facts derived once from a carved grid: cell kinds, hop distances from the
/// start, and the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    width: usize,
    kinds: Vec<CellKind>,
    distances: Vec<Option<usize>>,
    goal: Pos,
}

impl Topology {
    pub fn analyze(grid: &Grid, start: Pos) -> Self {
        let kinds = grid
            .cells()
            .map(|pos| CellKind::from_open_count(grid.passages(pos).count()))
            .collect();
        let distances = bfs_distance(grid, start);

        // Row-major scan keeps the first cell among equally distant ones.
        let mut goal = start;
        let mut best = 0;
        for pos in grid.cells() {
            if let Some(d) = distances[pos.y * grid.width() + pos.x] {
                if d > best {
                    best = d;
                    goal = pos;
                }
            }
        }

        Self {
            width: grid.width(),
            kinds,
            distances,
            goal,
        }
    }

    pub fn classify(&self, pos: Pos) -> CellKind {
        self.kinds[self.index(pos)]
    }

    pub fn is_fork(&self, pos: Pos) -> bool {
        self.classify(pos) == CellKind::Fork
    }

    pub fn is_dead_end(&self, pos: Pos) -> bool {
        self.classify(pos) == CellKind::DeadEnd
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    /// Passage hops from the start, `None` when unreachable.
    #[cfg(test)]
    pub(crate) fn distance(&self, pos: Pos) -> Option<usize> {
        self.distances[self.index(pos)]
    }

    /// Fork cells in row-major order.
    pub fn forks(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width;
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == CellKind::Fork)
            .map(move |(i, _)| Pos::new(i % width, i / width))
    }

    #[cfg(test)]
    pub(crate) fn set_goal(&mut self, goal: Pos) {
        self.goal = goal;
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(
            pos.x < self.width && pos.y < self.kinds.len() / self.width,
            "cell ({}, {}) outside topology",
            pos.x,
            pos.y
        );
        pos.y * self.width + pos.x
    }
}

fn bfs_distance(grid: &Grid, start: Pos) -> Vec<Option<usize>> {
    let mut dist = vec![None; grid.cell_count()];
    let mut q = VecDeque::new();
    dist[start.y * grid.width() + start.x] = Some(0);
    q.push_back((start, 0));

    while let Some((pos, base)) = q.pop_front() {
        for dir in grid.passages(pos).iter() {
            let Some(next) = grid.neighbor(pos, dir) else {
                continue;
            };
            let slot = &mut dist[next.y * grid.width() + next.x];
            if slot.is_none() {
                *slot = Some(base + 1);
                q.push_back((next, base + 1));
            }
        }
    }
    dist
}
