use crate::{
    context::GenerationContext,
    error::{Result, alloc_vec},
    frontier::Bfs,
    maze::{Cell, Direction, Maze},
};

use super::Route;

/// Marks on passages, stored on the cell to the left of or above each one.
struct Marks {
    counts: Vec<u8>,
}

impl Marks {
    fn slot(maze: &Maze, cell: Cell, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Right => Some(maze.index(cell) * 2),
            Direction::Down => Some(maze.index(cell) * 2 + 1),
            Direction::Left | Direction::Up => {
                let other = maze.neighbor(cell, dir)?;
                Marks::slot(maze, other, dir.opposite())
            }
        }
    }

    fn get(&self, maze: &Maze, cell: Cell, dir: Direction) -> u8 {
        Marks::slot(maze, cell, dir).map_or(2, |i| self.counts[i])
    }

    fn add(&mut self, maze: &Maze, cell: Cell, dir: Direction) {
        if let Some(i) = Marks::slot(maze, cell, dir) {
            self.counts[i] = self.counts[i].saturating_add(1);
        }
    }
}

/// Tremaux's algorithm: mark every passage when walking it, never walk a
/// passage more than twice, and turn back at an already visited junction.
/// When `end` is reached, the passages marked once lead back to `start`.
pub fn tremaux(
    maze: &Maze,
    start: Cell,
    end: Cell,
    ctx: &mut GenerationContext,
) -> Result<Option<Route>> {
    let mut marks = Marks {
        counts: alloc_vec(maze.cell_count() * 2, 0u8, "tremaux marks")?,
    };
    let mut visited = alloc_vec(maze.cell_count(), false, "tremaux visits")?;
    let mut cell = start;
    let mut entry: Option<Direction> = None;
    visited[maze.index(start)] = true;

    while cell != end {
        let exits = maze.open_neighbors(cell).map(|(dir, _)| dir).collect::<Vec<_>>();
        let back = entry.map(Direction::opposite);
        let fresh = exits
            .iter()
            .copied()
            .filter(|&dir| Some(dir) != back && marks.get(maze, cell, dir) == 0)
            .collect::<Vec<_>>();

        let dir = match back {
            // Seen this junction before along a new passage: go back
            Some(back) if visited[maze.index(cell)] && marks.get(maze, cell, back) == 1 => {
                Some(back)
            }
            _ => ctx.pick_among(&fresh).or_else(|| {
                exits
                    .iter()
                    .copied()
                    .filter(|&dir| marks.get(maze, cell, dir) < 2)
                    .min_by_key(|&dir| marks.get(maze, cell, dir))
            }),
        };
        let Some(dir) = dir else {
            return Ok(None);
        };
        let Some(next) = maze.neighbor(cell, dir) else {
            return Ok(None);
        };
        visited[maze.index(cell)] = true;
        marks.add(maze, cell, dir);
        entry = Some(dir);
        cell = next;
    }
    tracing::trace!("[solve] tremaux reached the end");

    // The once-marked passages form the route
    let mut bfs = Bfs::new(maze.cell_count())?;
    bfs.seed(maze.index(start) as u32);
    let target = maze.index(end) as u32;
    bfs.run(
        |node| {
            let cell = maze.cell_at(node as usize);
            maze.open_neighbors(cell)
                .filter(|&(dir, _)| marks.get(maze, cell, dir) == 1)
                .map(|(_, next)| maze.index(next) as u32)
                .collect::<Vec<_>>()
        },
        |node| node == target,
    );
    Ok(bfs
        .path_to(target)
        .map(|nodes| Route::new(nodes.into_iter().map(|n| maze.cell_at(n as usize)).collect())))
}
