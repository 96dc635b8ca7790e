use crate::direction::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Open passages of one cell, one bit per `Direction::index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Passages(u8);

impl Passages {
    pub fn is_open(self, dir: Direction) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |dir| self.is_open(*dir))
    }

    fn open(&mut self, dir: Direction) {
        self.0 |= 1 << dir.index();
    }
}

/// Rectangular cell array with symmetric passage bits.
///
/// Only the generator carves; everyone else sees a read-only grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Passages>,
}

impl Grid {
    /// A grid with every passage closed.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Self {
            width,
            height,
            cells: vec![Passages::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos { x, y }))
    }

    pub fn passages(&self, pos: Pos) -> Passages {
        self.cells[self.index(pos)]
    }

    pub fn is_open(&self, pos: Pos, dir: Direction) -> bool {
        self.passages(pos).is_open(dir)
    }

    /// The grid-adjacent cell in `dir`, walls ignored.
    pub fn adjacent(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let next = Pos {
            x: nx as usize,
            y: ny as usize,
        };
        self.contains(next).then_some(next)
    }

    /// The cell reached by walking through the open passage in `dir`.
    pub fn neighbor(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        if !self.is_open(pos, dir) {
            return None;
        }
        self.adjacent(pos, dir)
    }

    /// Number of carved passages (edges of the passage graph).
    pub fn passage_count(&self) -> usize {
        self.cells.iter().map(|p| p.count()).sum::<usize>() / 2
    }

    /// Opens the wall between `pos` and its neighbour in `dir`, on both sides.
    pub(crate) fn carve(&mut self, pos: Pos, dir: Direction) -> Pos {
        let next = self
            .adjacent(pos, dir)
            .unwrap_or_else(|| panic!("cannot carve {dir:?} out of border cell {pos:?}"));
        let here = self.index(pos);
        let there = self.index(next);
        self.cells[here].open(dir);
        self.cells[there].open(dir.opposite());
        next
    }

    /// Size of the drawn wall lattice: one block per cell plus one per wall.
    pub fn lattice_size(&self) -> (usize, usize) {
        (self.width * 2 + 1, self.height * 2 + 1)
    }

    /// Wall/corridor value of lattice block `(gx, gy)`. Cell `(x, y)` sits at
    /// `(2x + 1, 2y + 1)`; the blocks between two cells are open iff the
    /// passage is carved.
    pub fn is_wall(&self, gx: usize, gy: usize) -> bool {
        let (lw, lh) = self.lattice_size();
        assert!(gx < lw && gy < lh, "lattice block ({gx}, {gy}) outside {lw}x{lh}");
        match (gx % 2, gy % 2) {
            (1, 1) => false,
            (0, 0) => true,
            (0, _) => {
                if gx == 0 || gx == lw - 1 {
                    return true;
                }
                let west = Pos::new(gx / 2 - 1, gy / 2);
                !self.is_open(west, Direction::East)
            }
            _ => {
                if gy == 0 || gy == lh - 1 {
                    return true;
                }
                let north = Pos::new(gx / 2, gy / 2 - 1);
                !self.is_open(north, Direction::South)
            }
        }
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "cell ({}, {}) outside {}x{} grid",
            pos.x,
            pos.y,
            self.width,
            self.height
        );
        pos.y * self.width + pos.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carve_opens_both_sides() {
        let mut grid = Grid::new(3, 2);
        let next = grid.carve(Pos::new(1, 0), Direction::South);
        assert_eq!(next, Pos::new(1, 1));
        assert!(grid.is_open(Pos::new(1, 0), Direction::South));
        assert!(grid.is_open(Pos::new(1, 1), Direction::North));
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn neighbor_requires_open_passage() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.neighbor(Pos::new(0, 0), Direction::East), None);
        grid.carve(Pos::new(0, 0), Direction::East);
        assert_eq!(grid.neighbor(Pos::new(0, 0), Direction::East), Some(Pos::new(1, 0)));
        assert_eq!(grid.neighbor(Pos::new(1, 0), Direction::West), Some(Pos::new(0, 0)));
    }

    #[test]
    fn adjacent_stops_at_border() {
        let grid = Grid::new(2, 2);
        assert_eq!(grid.adjacent(Pos::new(0, 0), Direction::North), None);
        assert_eq!(grid.adjacent(Pos::new(0, 0), Direction::West), None);
        assert_eq!(grid.adjacent(Pos::new(1, 1), Direction::East), None);
        assert_eq!(grid.adjacent(Pos::new(1, 1), Direction::South), None);
    }

    #[test]
    #[should_panic]
    fn carving_through_border_panics() {
        let mut grid = Grid::new(2, 2);
        grid.carve(Pos::new(0, 0), Direction::North);
    }

    #[test]
    #[should_panic]
    fn out_of_range_query_panics() {
        let grid = Grid::new(2, 2);
        grid.passages(Pos::new(2, 0));
    }

    #[test]
    fn lattice_marks_carved_walls() {
        let mut grid = Grid::new(2, 2);
        grid.carve(Pos::new(0, 0), Direction::East);
        grid.carve(Pos::new(1, 0), Direction::South);
        assert_eq!(grid.lattice_size(), (5, 5));

        let rows: Vec<String> = (0..5)
            .map(|gy| {
                (0..5)
                    .map(|gx| if grid.is_wall(gx, gy) { '#' } else { '.' })
                    .collect()
            })
            .collect();
        assert_eq!(rows, vec!["#####", "#...#", "###.#", "#.#.#", "#####"]);
    }

    #[test]
    fn cells_iterate_row_major() {
        let grid = Grid::new(2, 2);
        let cells: Vec<Pos> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)]
        );
    }
}
