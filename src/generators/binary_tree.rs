use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    lattice::Mode,
    maze::{Cell, Direction, Maze},
};

use super::raise_wall;

/// Every cell opens up or left; every interior vertex, in wall mode, grows
/// a wall up or left. The biased coin decides which.
pub fn binary_tree(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    match ctx.settings.mode {
        Mode::Carve => carve(maze, ctx),
        Mode::Build => build(maze, ctx),
    }
}

fn toward(ctx: &mut GenerationContext, up: bool, left: bool) -> Option<Direction> {
    match (up, left) {
        (true, true) if ctx.prefers_horizontal() => Some(Direction::Left),
        (true, _) => Some(Direction::Up),
        (false, true) => Some(Direction::Left),
        (false, false) => None,
    }
}

fn carve(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    maze.fill_active(true);
    for cell in maze.cells() {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        maze.set_open(cell, true);
        if let Some(dir) = toward(ctx, cell.1 > 0, cell.0 > 0) {
            maze.carve(cell, dir);
            ctx.budget.spend();
        }
    }
    Ok(Outcome::Complete)
}

fn build(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    maze.clear_interior();
    for vy in 1..maze.cells_y() {
        for vx in 1..maze.cells_x() {
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            if let Some(dir) = toward(ctx, true, true) {
                raise_wall(maze, vx, vy, dir);
                ctx.budget.spend();
            }
        }
    }
    Ok(Outcome::Complete)
}
