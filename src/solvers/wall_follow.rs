use std::collections::BTreeSet;

use crate::{
    error::{Result, alloc_vec},
    maze::{Cell, Direction, Maze},
};

use super::Route;

/// Which hand stays on the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Directions to try from `heading`, hand side first.
    fn order(self, heading: Direction) -> [Direction; 4] {
        match self {
            Hand::Left => [
                heading.turn_left(),
                heading,
                heading.turn_right(),
                heading.opposite(),
            ],
            Hand::Right => [
                heading.turn_right(),
                heading,
                heading.turn_left(),
                heading.opposite(),
            ],
        }
    }

    fn side(self, heading: Direction) -> Direction {
        match self {
            Hand::Left => heading.turn_left(),
            Hand::Right => heading.turn_right(),
        }
    }

    /// A heading that puts the hand on the outer wall, or failing that on
    /// any wall of `start`.
    fn initial_heading(self, maze: &Maze, start: Cell) -> Direction {
        Direction::ALL
            .into_iter()
            .find(|&dir| maze.neighbor(start, self.side(dir)).is_none())
            .or_else(|| {
                Direction::ALL
                    .into_iter()
                    .find(|&dir| !maze.passable(start, self.side(dir)))
            })
            .unwrap_or(Direction::Right)
    }
}

/// The walker's route with loops cut out as they close.
struct Trail {
    cells: Vec<Cell>,
    /// Position of each cell in `cells`
    position: Vec<Option<usize>>,
}

impl Trail {
    fn new(maze: &Maze, start: Cell) -> Result<Self> {
        let mut position = alloc_vec(maze.cell_count(), None, "trail positions")?;
        position[maze.index(start)] = Some(0);
        Ok(Trail {
            cells: vec![start],
            position,
        })
    }

    fn step(&mut self, maze: &Maze, cell: Cell) {
        match self.position[maze.index(cell)] {
            Some(at) => {
                for dropped in self.cells.drain(at + 1..) {
                    self.position[maze.index(dropped)] = None;
                }
            }
            None => {
                self.position[maze.index(cell)] = Some(self.cells.len());
                self.cells.push(cell);
            }
        }
    }
}

/// Follow one wall from `start` until `end`, starting on the outer wall when
/// `start` touches it. Returns `None` when the walk comes back to a state it
/// has been in, which happens when `end` is not on the wall being followed.
pub fn follow_wall(maze: &Maze, start: Cell, end: Cell, hand: Hand) -> Result<Option<Route>> {
    let mut seen = alloc_vec(maze.cell_count() * 4, false, "wall follower states")?;
    let mut trail = Trail::new(maze, start)?;
    let mut cell = start;
    let mut heading = hand.initial_heading(maze, start);

    while cell != end {
        let state = maze.index(cell) * 4 + heading.index();
        if seen[state] {
            return Ok(None);
        }
        seen[state] = true;

        let Some(dir) = hand
            .order(heading)
            .into_iter()
            .find(|&dir| maze.passable(cell, dir))
        else {
            return Ok(None);
        };
        let Some(next) = maze.neighbor(cell, dir) else {
            return Ok(None);
        };
        heading = dir;
        cell = next;
        trail.step(maze, cell);
    }
    Ok(Some(Route::new(trail.cells)))
}

/// Steps Pledge may take per cell before giving up: four full tours of
/// every wall side.
const PLEDGE_STEPS_PER_CELL: usize = 16;

/// Pledge's algorithm: head in `preferred` whenever the sum of turns made
/// is zero, otherwise follow the wall with the left hand, counting turns.
///
/// The turn count is unbounded, so a walk circling a wall that `end` is not
/// on never repeats a state. Returns `None` on a repeated state or once the
/// walk outgrows `PLEDGE_STEPS_PER_CELL` steps per cell.
pub fn pledge(maze: &Maze, start: Cell, end: Cell, preferred: Direction) -> Result<Option<Route>> {
    let limit = maze.cell_count().saturating_mul(PLEDGE_STEPS_PER_CELL);
    let mut seen = BTreeSet::new();
    let mut trail = Trail::new(maze, start)?;
    let mut cell = start;
    let mut heading = preferred;
    let mut turns: i64 = 0;

    while cell != end {
        if seen.len() >= limit || !seen.insert((maze.index(cell), heading.index(), turns)) {
            return Ok(None);
        }

        let dir = if turns == 0 && maze.passable(cell, heading) {
            Some(heading)
        } else if turns == 0 {
            // Blocked while free: turn right until the way is open
            let mut dir = heading;
            (0..4).find_map(|_| {
                dir = dir.turn_right();
                turns -= 1;
                maze.passable(cell, dir).then_some(dir)
            })
        } else {
            Hand::Left
                .order(heading)
                .into_iter()
                .zip([1, 0, -1, -2])
                .find(|&(dir, _)| maze.passable(cell, dir))
                .map(|(dir, turn)| {
                    turns += turn;
                    dir
                })
        };
        let Some(next) = dir.and_then(|dir| {
            heading = dir;
            maze.neighbor(cell, dir)
        }) else {
            return Ok(None);
        };
        cell = next;
        trail.step(maze, cell);
    }
    Ok(Some(Route::new(trail.cells)))
}
