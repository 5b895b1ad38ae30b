use crate::{
    error::{Result, alloc_vec},
    maze::{Cell, Direction, Maze},
};

use super::Route;

/// Depth-first search with an explicit stack. A cell is entered only when
/// its one neighbor on the current path is the tip, so the route found
/// never runs alongside itself through an open wall.
pub fn backtrack_search(maze: &Maze, start: Cell, end: Cell) -> Result<Option<Route>> {
    let mut on_path = alloc_vec(maze.cell_count(), false, "backtrack path marks")?;
    let mut entered = alloc_vec(maze.cell_count(), false, "backtrack visits")?;
    // Each frame is a path cell and the next direction to try from it
    let mut stack: Vec<(Cell, usize)> = vec![(start, 0)];
    on_path[maze.index(start)] = true;
    entered[maze.index(start)] = true;

    while let Some(frame) = stack.last_mut() {
        let (cell, tried) = *frame;
        if cell == end {
            return Ok(Some(Route::new(stack.iter().map(|&(c, _)| c).collect())));
        }
        if tried >= Direction::ALL.len() {
            on_path[maze.index(cell)] = false;
            stack.pop();
            continue;
        }
        frame.1 += 1;
        let dir = Direction::ALL[tried];

        let Some(next) = maze.neighbor(cell, dir).filter(|_| maze.passable(cell, dir)) else {
            continue;
        };
        if entered[maze.index(next)] {
            continue;
        }
        let touches_path = maze
            .open_neighbors(next)
            .any(|(_, other)| other != cell && on_path[maze.index(other)]);
        if touches_path {
            continue;
        }
        entered[maze.index(next)] = true;
        on_path[maze.index(next)] = true;
        stack.push((next, 0));
    }
    Ok(None)
}
