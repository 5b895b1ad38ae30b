use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    maze::Maze,
};

/// Random walk over the whole maze, carving into each cell the first time
/// the walk enters it. Produces every spanning tree with equal probability
/// but may take a long time to find the last few cells.
pub fn aldous_broder(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    maze.fill_active(true);
    let total = maze.cell_count();
    let mut cell = maze.cell_at(ctx.below(total));
    maze.set_open(cell, true);
    let mut visited = 1;

    while visited < total {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let dirs = maze.neighbors(cell).map(|(dir, _)| dir).collect::<Vec<_>>();
        let Some(next) = ctx
            .pick_among(&dirs)
            .and_then(|dir| maze.neighbor(cell, dir).map(|next| (dir, next)))
        else {
            // A single cell has nowhere to go
            break;
        };
        let (dir, next) = next;
        if !maze.is_open(next) {
            maze.carve(cell, dir);
            ctx.budget.spend();
            visited += 1;
        }
        cell = next;
    }
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aldous_broder_spans() {
        let mut maze = Maze::new(6, 6, None).unwrap();
        let mut ctx = GenerationContext::seeded(3);
        assert!(aldous_broder(&mut maze, &mut ctx).unwrap().is_complete());
        assert_eq!(ctx.budget.spent(), 35);
        assert!(maze.cells().all(|c| maze.is_open(c)));
    }
}
