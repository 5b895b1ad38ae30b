use crate::{
    context::{GenerationContext, Outcome},
    error::{Result, alloc_vec, alloc_with_capacity},
    maze::{Cell, Direction, Maze},
};

/// Uniform spanning tree by loop-erased random walks.
///
/// Each walk starts at a cell outside the tree and wanders until it hits
/// the tree. Only the last exit taken from every cell is remembered, which
/// erases loops for free; the erased path is then carved from the tree end
/// back to the start so a truncated run never leaves a floating branch.
pub fn wilson(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    maze.fill_active(true);
    let mut exits: Vec<Option<Direction>> = alloc_vec(maze.cell_count(), None, "wilson exits")?;
    let mut path = alloc_with_capacity(maze.cell_count(), "wilson path")?;

    let root = maze.cell_at(ctx.below(maze.cell_count()));
    maze.set_open(root, true);

    for start in maze.cells() {
        if maze.is_open(start) {
            continue;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }

        // Walk until we hit the tree
        let mut cell = start;
        while !maze.is_open(cell) {
            let dirs = maze.neighbors(cell).map(|(dir, _)| dir).collect::<Vec<_>>();
            let Some(dir) = ctx.pick_among(&dirs) else {
                break;
            };
            exits[maze.index(cell)] = Some(dir);
            let Some(next) = maze.neighbor(cell, dir) else {
                break;
            };
            cell = next;
        }

        // Replay the erased walk
        path.clear();
        let mut cell = start;
        while !maze.is_open(cell) {
            let Some(dir) = exits[maze.index(cell)] else {
                break;
            };
            path.push((cell, dir));
            let Some(next) = maze.neighbor(cell, dir) else {
                break;
            };
            cell = next;
        }
        while let Some((cell, dir)) = path.pop() {
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            maze.carve(cell, dir);
            ctx.budget.spend();
        }
    }
    Ok(Outcome::Complete)
}
