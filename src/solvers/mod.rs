mod backtrack;
mod bfs;
mod dead_end;
mod tremaux;
mod wall_follow;

pub use backtrack::backtrack_search;
pub use bfs::{all_shortest_paths, distance_map, shortest_path};
pub use dead_end::fill_dead_ends;
pub use tremaux::tremaux;
pub use wall_follow::{Hand, follow_wall, pledge};

use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    maze::{Cell, Direction, Grid, Maze},
};

/// Cells from start to end, each adjacent to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    cells: Vec<Cell>,
}

impl Route {
    pub fn new(cells: Vec<Cell>) -> Self {
        Route { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells, endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether every step of the route is an open passage of `maze`.
    pub fn is_valid(&self, maze: &Maze) -> bool {
        self.cells.iter().all(|&c| maze.contains(c) && maze.is_open(c))
            && self.cells.windows(2).all(|pair| {
                pair[0]
                    .direction_to(pair[1])
                    .is_some_and(|dir| maze.passable(pair[0], dir))
            })
    }

    /// The route painted into a fresh bitmap the size of the maze's: cell
    /// pixels and the wall pixels between consecutive cells are on.
    pub fn overlay(&self, maze: &Maze) -> Result<Grid> {
        let mut grid = Grid::new(maze.grid().width(), maze.grid().height(), false, None)?;
        for &cell in &self.cells {
            let (x, y) = maze.pixel(cell);
            grid.set(x, y, true);
        }
        for pair in self.cells.windows(2) {
            if let Some(dir) = pair[0].direction_to(pair[1]) {
                let wall = maze.wall(pair[0], dir);
                grid.set(wall.0, wall.1, true);
            }
        }
        Ok(grid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Solver {
    DeadEndFill,
    Bfs,
    LeftHand,
    RightHand,
    Pledge,
    Tremaux,
    Backtrack,
}

impl Solver {
    pub const ALL: [Solver; 7] = [
        Solver::DeadEndFill,
        Solver::Bfs,
        Solver::LeftHand,
        Solver::RightHand,
        Solver::Pledge,
        Solver::Tremaux,
        Solver::Backtrack,
    ];
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::DeadEndFill => write!(f, "Dead-End Filling"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::LeftHand => write!(f, "Wall Follower (left hand)"),
            Solver::RightHand => write!(f, "Wall Follower (right hand)"),
            Solver::Pledge => write!(f, "Pledge Algorithm"),
            Solver::Tremaux => write!(f, "Tremaux's Algorithm"),
            Solver::Backtrack => write!(f, "Recursive Backtracking Search"),
        }
    }
}

/// Top-left and bottom-right cells, the usual entrance and exit.
pub fn default_endpoints(maze: &Maze) -> (Cell, Cell) {
    (
        Cell(0, 0),
        Cell(
            maze.cells_x().saturating_sub(1),
            maze.cells_y().saturating_sub(1),
        ),
    )
}

/// Axis direction that points most nearly from `from` toward `to`.
fn heading_toward(from: Cell, to: Cell) -> Direction {
    let dx = i64::from(to.0) - i64::from(from.0);
    let dy = i64::from(to.1) - i64::from(from.1);
    if dx.abs() >= dy.abs() {
        if dx >= 0 { Direction::Right } else { Direction::Left }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Find a route from `start` to `end` with `solver`. Dead-end filling is
/// the only solver that changes the maze. Returns `None` when the solver
/// finds no route, or when an endpoint is not an open cell.
pub fn solve_maze(
    maze: &mut Maze,
    solver: Solver,
    start: Cell,
    end: Cell,
    ctx: &mut GenerationContext,
) -> Result<Option<Route>> {
    if !maze.contains(start) || !maze.contains(end) || !maze.is_open(start) || !maze.is_open(end) {
        tracing::warn!("[solve] endpoints {} and {} are not open cells", start, end);
        return Ok(None);
    }
    ctx.policy.reset();
    tracing::debug!("[solve] {} from {} to {}", solver, start, end);

    let route = match solver {
        Solver::DeadEndFill => match fill_dead_ends(maze, start, end, ctx) {
            Outcome::Complete => shortest_path(maze, start, end)?,
            Outcome::Truncated => None,
        },
        Solver::Bfs => shortest_path(maze, start, end)?,
        Solver::LeftHand => follow_wall(maze, start, end, Hand::Left)?,
        Solver::RightHand => follow_wall(maze, start, end, Hand::Right)?,
        Solver::Pledge => pledge(maze, start, end, heading_toward(start, end))?,
        Solver::Tremaux => tremaux(maze, start, end, ctx)?,
        Solver::Backtrack => backtrack_search(maze, start, end)?,
    };

    match &route {
        Some(route) => tracing::debug!("[solve] {} found a route of {} cells", solver, route.len()),
        None => tracing::debug!("[solve] {} found no route", solver),
    }
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, generate_maze};

    #[test]
    fn test_overlay() {
        let mut maze = Maze::new(3, 3, None).unwrap();
        maze.carve(Cell(0, 0), Direction::Right);
        let route = Route::new(vec![Cell(0, 0), Cell(1, 0)]);
        assert!(route.is_valid(&maze));
        let overlay = route.overlay(&maze).unwrap();
        assert_eq!(overlay.count_on(overlay.bounds()), 3);
        assert!(overlay.get(1, 1) && overlay.get(2, 1) && overlay.get(3, 1));
    }

    #[test]
    fn test_solvers_agree_on_perfect_mazes() {
        for seed in 0..3 {
            let mut maze = Maze::new(12, 10, None).unwrap();
            let mut ctx = GenerationContext::seeded(seed);
            generate_maze(&mut maze, Generator::Wilson, &mut ctx).unwrap();
            let (start, end) = default_endpoints(&maze);
            let expected = shortest_path(&maze, start, end).unwrap().unwrap();

            for solver in Solver::ALL.into_iter().filter(|&s| s != Solver::Pledge) {
                let mut copy = maze.clone();
                let route = solve_maze(&mut copy, solver, start, end, &mut ctx)
                    .unwrap()
                    .unwrap();
                // A tree has exactly one simple route
                assert_eq!(route, expected, "{solver} seed {seed}");
            }
        }
    }

    #[test]
    fn test_pledge_route_is_valid_when_found() {
        let mut maze = Maze::new(10, 10, None).unwrap();
        let mut ctx = GenerationContext::seeded(3);
        generate_maze(&mut maze, Generator::Kruskal, &mut ctx).unwrap();
        let (start, end) = default_endpoints(&maze);
        if let Some(route) = solve_maze(&mut maze, Solver::Pledge, start, end, &mut ctx).unwrap() {
            assert!(route.is_valid(&maze));
            assert_eq!(route.cells().last(), Some(&end));
        }
    }

    #[test]
    fn test_closed_endpoint() {
        let mut maze = Maze::new(4, 4, None).unwrap();
        let mut ctx = GenerationContext::seeded(0);
        let route = solve_maze(&mut maze, Solver::Bfs, Cell(0, 0), Cell(3, 3), &mut ctx).unwrap();
        assert!(route.is_none());
    }
}
