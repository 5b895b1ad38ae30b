use rand::seq::SliceRandom;

use crate::{
    context::{GenerationContext, Outcome},
    disjoint_set::DisjointSet,
    error::Result,
    maze::{Cell, Direction, Maze},
};

/// Close every passage that completes a cycle, visiting passages in random
/// order, so the maze is left a forest.
pub fn remove_loops(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let mut passages = maze
        .cells()
        .flat_map(|cell| [(cell, Direction::Right), (cell, Direction::Down)])
        .filter(|&(cell, dir)| maze.passable(cell, dir))
        .collect::<Vec<(Cell, Direction)>>();
    passages.shuffle(ctx.rng());

    let mut sets = DisjointSet::new(maze.cell_count())?;
    let mut closed = 0;
    for (cell, dir) in passages {
        let Some(next) = maze.neighbor(cell, dir) else {
            continue;
        };
        if sets.union(maze.index(cell) as u32, maze.index(next) as u32) {
            continue;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        maze.set_wall(cell, dir, true);
        for (x, y) in maze.wall_ends(cell, dir) {
            maze.set(x, y, true);
        }
        ctx.budget.spend();
        closed += 1;
    }
    tracing::debug!("[repair] closed {} loops", closed);
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_room_becomes_tree() {
        let mut maze = Maze::new(5, 4, None).unwrap();
        maze.clear_interior();
        let mut ctx = GenerationContext::seeded(9);
        remove_loops(&mut maze, &mut ctx).unwrap();
        assert!(crate::analysis::is_perfect(&maze));
    }
}
