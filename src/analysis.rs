//! Read-only measurements of a finished maze.

use crate::{
    disjoint_set::DisjointSet,
    error::Result,
    maze::{Cell, Direction, Maze},
};

/// Right and down edge of every cell, in row-major order, `true` when open.
/// Two mazes over the same rectangle are the same tree exactly when these
/// agree.
pub fn open_edges(maze: &Maze) -> Vec<bool> {
    maze.cells()
        .flat_map(|cell| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter(move |&dir| maze.neighbor(cell, dir).is_some())
                .map(move |dir| maze.passable(cell, dir))
        })
        .collect()
}

pub fn open_edge_count(maze: &Maze) -> usize {
    open_edges(maze).into_iter().filter(|&open| open).count()
}

/// Connected groups of open cells.
pub fn component_count(maze: &Maze) -> Result<usize> {
    let mut sets = DisjointSet::new(maze.cell_count())?;
    let mut closed = 0;
    for cell in maze.cells() {
        if !maze.is_open(cell) {
            closed += 1;
            continue;
        }
        for dir in [Direction::Right, Direction::Down] {
            if let Some(next) = maze.neighbor(cell, dir).filter(|_| maze.passable(cell, dir)) {
                sets.union(maze.index(cell) as u32, maze.index(next) as u32);
            }
        }
    }
    Ok(sets.set_count() - closed)
}

pub fn dead_end_count(maze: &Maze) -> usize {
    maze.cells().filter(|&c| maze.is_dead_end(c)).count()
}

/// Every cell open, every cell reachable, and no cycles.
pub fn is_perfect(maze: &Maze) -> bool {
    maze.cells().all(|c: Cell| maze.is_open(c))
        && open_edge_count(maze) + 1 == maze.cell_count()
        && component_count(maze).is_ok_and(|n| n == 1)
}

/// Number of spanning trees of a `cells_x` by `cells_y` grid graph, by the
/// matrix-tree theorem with the closed-form Laplacian eigenvalues of the
/// grid. Exact for small grids, an `f64` approximation beyond that.
pub fn count_spanning_trees(cells_x: u32, cells_y: u32) -> f64 {
    if cells_x == 0 || cells_y == 0 {
        return 0.0;
    }
    let path = |n: u32, k: u32| 2.0 - 2.0 * (std::f64::consts::PI * k as f64 / n as f64).cos();
    let mut product = 1.0;
    for i in 0..cells_x {
        for j in 0..cells_y {
            if i == 0 && j == 0 {
                continue;
            }
            product *= path(cells_x, i) + path(cells_y, j);
        }
    }
    product / (cells_x as f64 * cells_y as f64)
}
