use crate::{
    error::{Result, alloc_vec},
    frontier::Bfs,
    maze::{Cell, Maze},
};

use super::Route;

fn flood(maze: &Maze, start: Cell, end: Option<Cell>) -> Result<Bfs> {
    let mut bfs = Bfs::new(maze.cell_count())?;
    bfs.seed(maze.index(start) as u32);
    let target = end.map(|c| maze.index(c) as u32);
    bfs.run(
        |node| {
            let cell = maze.cell_at(node as usize);
            maze.open_neighbors(cell)
                .map(|(_, next)| maze.index(next) as u32)
                .collect::<Vec<_>>()
        },
        |node| Some(node) == target,
    );
    Ok(bfs)
}

/// A shortest route from `start` to `end`, if they are connected.
pub fn shortest_path(maze: &Maze, start: Cell, end: Cell) -> Result<Option<Route>> {
    let bfs = flood(maze, start, Some(end))?;
    Ok(bfs.path_to(maze.index(end) as u32).map(|nodes| {
        Route::new(nodes.into_iter().map(|n| maze.cell_at(n as usize)).collect())
    }))
}

/// Steps from `start` to every cell, row-major. `None` for cells that
/// cannot be reached.
pub fn distance_map(maze: &Maze, start: Cell) -> Result<Vec<Option<u32>>> {
    let bfs = flood(maze, start, None)?;
    Ok((0..maze.cell_count() as u32).map(|n| bfs.distance(n)).collect())
}

/// Every cell that lies on at least one shortest route, row-major. Found by
/// walking back from `end` to neighbors exactly one step closer to `start`.
pub fn all_shortest_paths(maze: &Maze, start: Cell, end: Cell) -> Result<Vec<Cell>> {
    let distances = distance_map(maze, start)?;
    let mut on_path = alloc_vec(maze.cell_count(), false, "shortest path marks")?;
    if distances[maze.index(end)].is_none() {
        return Ok(Vec::new());
    }

    on_path[maze.index(end)] = true;
    let mut stack = vec![end];
    while let Some(cell) = stack.pop() {
        let Some(d) = distances[maze.index(cell)] else {
            continue;
        };
        for (_, prev) in maze.open_neighbors(cell) {
            let index = maze.index(prev);
            if !on_path[index] && d > 0 && distances[index] == Some(d - 1) {
                on_path[index] = true;
                stack.push(prev);
            }
        }
    }
    Ok(maze.cells().filter(|&c| on_path[maze.index(c)]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;

    #[test]
    fn test_open_room_paths() {
        let mut maze = Maze::new(3, 3, None).unwrap();
        maze.clear_interior();
        let route = shortest_path(&maze, Cell(0, 0), Cell(2, 2)).unwrap().unwrap();
        assert_eq!(route.len(), 5);
        assert!(route.is_valid(&maze));

        // Every cell of an open square lies on some shortest corner-to-corner route
        let all = all_shortest_paths(&maze, Cell(0, 0), Cell(2, 2)).unwrap();
        assert_eq!(all.len(), 9);

        let distances = distance_map(&maze, Cell(1, 1)).unwrap();
        assert_eq!(distances[0], Some(2));
        assert_eq!(distances[4], Some(0));
    }

    #[test]
    fn test_unreachable() {
        let mut maze = Maze::new(3, 1, None).unwrap();
        maze.carve(Cell(0, 0), Direction::Right);
        maze.set_open(Cell(2, 0), true);
        assert!(shortest_path(&maze, Cell(0, 0), Cell(2, 0)).unwrap().is_none());
        assert!(all_shortest_paths(&maze, Cell(0, 0), Cell(2, 0)).unwrap().is_empty());
        assert_eq!(distance_map(&maze, Cell(0, 0)).unwrap(), vec![Some(0), Some(1), None]);
    }
}
