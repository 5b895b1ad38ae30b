use crate::{
    context::{GenerationContext, Outcome},
    disjoint_set::DisjointSet,
    error::{Result, alloc_vec},
    maze::{Cell, Direction, Maze},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// Not yet attached
    Out,
    /// Walled off from an attached cell
    Frontier,
    /// Attached by carving into it
    In,
    /// Attached through the passages of a cell that was carved into
    EffectivelyIn,
}

impl Reach {
    fn attached(self) -> bool {
        matches!(self, Reach::In | Reach::EffectivelyIn)
    }
}

/// Number of passage sections, counting every cell, open or not.
fn sections(maze: &Maze) -> Result<usize> {
    let mut sets = DisjointSet::new(maze.cell_count())?;
    for cell in maze.cells() {
        for (_, next) in maze.open_neighbors(cell) {
            sets.union(maze.index(cell) as u32, maze.index(next) as u32);
        }
    }
    Ok(sets.set_count())
}

/// Mark everything reachable from `start` through passages as attached and
/// queue the cells walled off from them.
fn flood(maze: &Maze, state: &mut [Reach], frontier: &mut Vec<Cell>, start: Cell) {
    let mut stack = vec![start];
    while let Some(cell) = stack.pop() {
        for (dir, next) in maze.neighbors(cell) {
            let index = maze.index(next);
            if maze.passable(cell, dir) {
                if !state[index].attached() {
                    state[index] = Reach::EffectivelyIn;
                    stack.push(next);
                }
            } else if state[index] == Reach::Out {
                state[index] = Reach::Frontier;
                frontier.push(next);
            }
        }
    }
}

/// Connect every section of the maze to every other by carving one wall
/// per section, picked at random along the growing boundary.
pub fn remove_isolations(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let count = sections(maze)?;
    tracing::debug!("[repair] {} passage sections", count);
    if count <= 1 {
        return Ok(Outcome::Complete);
    }

    let mut state = alloc_vec(maze.cell_count(), Reach::Out, "isolation marks")?;
    let mut frontier = Vec::new();
    let start = maze.cell_at(ctx.below(maze.cell_count()));
    maze.set_open(start, true);
    state[maze.index(start)] = Reach::In;
    flood(maze, &mut state, &mut frontier, start);

    while !frontier.is_empty() {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let cell = frontier.swap_remove(ctx.below(frontier.len()));
        if state[maze.index(cell)] != Reach::Frontier {
            continue;
        }
        let attached = maze
            .neighbors(cell)
            .filter(|&(_, n)| state[maze.index(n)].attached())
            .map(|(dir, _)| dir)
            .collect::<Vec<Direction>>();
        let Some(dir) = ctx.pick_among(&attached) else {
            continue;
        };
        maze.carve(cell, dir);
        ctx.budget.spend();
        state[maze.index(cell)] = Reach::In;
        flood(maze, &mut state, &mut frontier, cell);
    }
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;

    #[test]
    fn test_joins_every_section() {
        // Two separate corridors and a lone closed cell
        let mut maze = Maze::new(4, 3, None).unwrap();
        for x in 0..3 {
            maze.carve(Cell(x, 0), Direction::Right);
            maze.carve(Cell(x, 2), Direction::Right);
        }
        maze.carve(Cell(0, 1), Direction::Right);
        let mut ctx = GenerationContext::seeded(1);
        assert!(remove_isolations(&mut maze, &mut ctx).unwrap().is_complete());
        assert_eq!(analysis::component_count(&maze).unwrap(), 1);
        assert!(maze.cells().all(|c| maze.is_open(c)));
    }

    #[test]
    fn test_connected_maze_untouched() {
        let mut maze = Maze::new(5, 5, None).unwrap();
        let mut ctx = GenerationContext::seeded(2);
        crate::generators::eller(&mut maze, &mut ctx).unwrap();
        let before = maze.clone();
        remove_isolations(&mut maze, &mut ctx).unwrap();
        assert_eq!(maze, before);
    }
}
