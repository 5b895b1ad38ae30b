use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    maze::{Cell, Direction, Maze},
};

/// Walls of a dead end that lead to an open cell.
pub(super) fn closed_sides(maze: &Maze, cell: Cell) -> Vec<Direction> {
    maze.neighbors(cell)
        .filter(|&(dir, next)| maze.is_open(next) && maze.has_wall(cell, dir))
        .map(|(dir, _)| dir)
        .collect()
}

/// Whether removing the wall would leave one of its end vertices standing
/// alone.
pub(super) fn leaves_pole(maze: &Maze, cell: Cell, dir: Direction) -> bool {
    let wall = maze.wall(cell, dir);
    maze.wall_ends(cell, dir)
        .into_iter()
        .any(|(x, y)| !maze.vertex_has_segment(x, y, wall))
}

/// Open one wall of every dead end, never leaving a pole behind. Passes
/// repeat until one opens nothing.
pub fn crack_dead_ends(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let mut passes = 0;
    loop {
        passes += 1;
        let mut cracked = 0;
        for cell in maze.cells() {
            if !maze.is_dead_end(cell) {
                continue;
            }
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            let sides = closed_sides(maze, cell)
                .into_iter()
                .filter(|&dir| !leaves_pole(maze, cell, dir))
                .collect::<Vec<_>>();
            if let Some(dir) = ctx.pick_among(&sides) {
                maze.set_wall(cell, dir, false);
                ctx.budget.spend();
                cracked += 1;
            }
        }
        tracing::trace!("[repair] crack pass {}: {} walls opened", passes, cracked);
        if cracked == 0 {
            return Ok(Outcome::Complete);
        }
    }
}

/// Open a wall of every dead end left, poles or not.
pub(crate) fn force_open_dead_ends(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    for cell in maze.cells() {
        if !maze.is_dead_end(cell) {
            continue;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let sides = closed_sides(maze, cell);
        if let Some(dir) = ctx.pick_among(&sides) {
            maze.set_wall(cell, dir, false);
            ctx.budget.spend();
        }
    }
    Ok(Outcome::Complete)
}
