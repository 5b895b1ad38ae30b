use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    lattice::Mode,
    maze::{Cell, Direction, Maze},
};

use super::raise_wall;

/// Row by row: extend the current run to the right on the biased coin, or
/// close it by opening one random cell of the run upward. The top row is
/// a single corridor.
pub fn sidewinder(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    match ctx.settings.mode {
        Mode::Carve => carve(maze, ctx),
        Mode::Build => build(maze, ctx),
    }
}

fn carve(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let (cx, cy) = (maze.cells_x(), maze.cells_y());
    maze.fill_active(true);

    for y in 0..cy {
        let mut run_start = 0;
        for x in 0..cx {
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            let cell = Cell(x, y);
            maze.set_open(cell, true);
            let more = x + 1 < cx;
            if more && (y == 0 || ctx.prefers_horizontal()) {
                maze.carve(cell, Direction::Right);
                ctx.budget.spend();
            } else if y > 0 {
                let chosen = run_start + ctx.below((x - run_start + 1) as usize) as u32;
                maze.carve(Cell(chosen, y), Direction::Up);
                ctx.budget.spend();
                run_start = x + 1;
            }
        }
    }
    Ok(Outcome::Complete)
}

/// Same shape on the interior vertices: runs of walls to the right, each
/// run hung from the row above (or the border) by one wall.
fn build(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let (cx, cy) = (maze.cells_x(), maze.cells_y());
    maze.clear_interior();

    for vy in 1..cy {
        let mut run_start = 1;
        for vx in 1..cx {
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            if vx + 1 < cx && ctx.prefers_horizontal() {
                raise_wall(maze, vx, vy, Direction::Right);
            } else {
                let chosen = run_start + ctx.below((vx - run_start + 1) as usize) as u32;
                raise_wall(maze, chosen, vy, Direction::Up);
                run_start = vx + 1;
            }
            ctx.budget.spend();
        }
    }
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Settings;

    #[test]
    fn test_sidewinder_spans() {
        let mut maze = Maze::new(8, 6, None).unwrap();
        let mut ctx = GenerationContext::seeded(12);
        assert!(sidewinder(&mut maze, &mut ctx).unwrap().is_complete());
        assert_eq!(ctx.budget.spent(), 47);
        assert!((0..7).all(|x| maze.passable(Cell(x, 0), Direction::Right)));
    }

    #[test]
    fn test_sidewinder_build_mode() {
        let mut maze = Maze::new(7, 5, None).unwrap();
        let mut ctx = GenerationContext::new(Settings {
            seed: Some(12),
            mode: Mode::Build,
            ..Settings::default()
        });
        sidewinder(&mut maze, &mut ctx).unwrap();
        assert_eq!(ctx.budget.spent(), 6 * 4);
        assert!(maze.cells().all(|c| maze.is_open(c)));
    }
}
