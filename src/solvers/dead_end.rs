use crate::{
    context::{GenerationContext, Outcome},
    maze::{Cell, Maze},
};

/// Fill every dead end, and the corridor behind it, until only junctions,
/// loops and the two endpoints are left open. In a perfect maze what
/// remains is exactly the solution. Running it twice changes nothing.
pub fn fill_dead_ends(maze: &mut Maze, start: Cell, end: Cell, ctx: &mut GenerationContext) -> Outcome {
    let mut filled = 0;
    for origin in maze.cells() {
        let mut cell = origin;
        while cell != start && cell != end && maze.is_dead_end(cell) {
            if ctx.budget.is_exhausted() {
                return Outcome::Truncated;
            }
            let Some((dir, next)) = maze.open_neighbors(cell).next() else {
                break;
            };
            maze.set_wall(cell, dir, true);
            maze.set_open(cell, false);
            ctx.budget.spend();
            filled += 1;
            cell = next;
        }
    }
    tracing::debug!("[solve] filled {} dead-end cells", filled);
    Outcome::Complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;

    #[test]
    fn test_fill_leaves_the_solution() {
        let mut maze = Maze::new(9, 9, None).unwrap();
        let mut ctx = GenerationContext::seeded(31);
        crate::generators::wilson(&mut maze, &mut ctx).unwrap();
        let (start, end) = (Cell(0, 0), Cell(8, 8));
        fill_dead_ends(&mut maze, start, end, &mut ctx);

        // A single corridor from start to end is left
        assert_eq!(analysis::dead_end_count(&maze), 2);
        assert!(maze.is_dead_end(start) && maze.is_dead_end(end));
        assert_eq!(analysis::component_count(&maze).unwrap(), 1);

        let snapshot = maze.clone();
        fill_dead_ends(&mut maze, start, end, &mut ctx);
        assert_eq!(maze, snapshot);
    }
}
