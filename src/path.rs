use crate::direction::Direction;
use crate::grid::Pos;
use crate::maze::Maze;

/// Turns one requested direction into the run of single steps a token takes
/// before it must choose again.
///
/// The first step is always taken when its passage is open, whatever `start`
/// is. After that the walk stops on arrival at a fork or dead end; a corridor
/// cell forwards it through the one passage that does not lead back.
/// A closed first passage yields an empty path.
pub fn resolve_path(maze: &Maze, start: Pos, requested: Direction) -> Vec<Direction> {
    let grid = maze.grid();
    let mut path = Vec::new();
    let mut pos = start;
    let mut heading = requested;

    // Bounded so a hand-built ring of corridor cells cannot spin forever.
    while path.len() < grid.cell_count() {
        let Some(next) = grid.neighbor(pos, heading) else {
            break;
        };
        path.push(heading);
        pos = next;

        if maze.classify(pos).is_decision_point() {
            break;
        }
        let back = heading.opposite();
        match grid.passages(pos).iter().find(|dir| *dir != back) {
            Some(dir) => heading = dir,
            None => break,
        }
    }
    path
}
