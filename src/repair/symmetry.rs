use rand::seq::SliceRandom;

use crate::{
    context::{GenerationContext, Outcome, Symmetry},
    disjoint_set::DisjointSet,
    error::{MazeError, Result, alloc_with_capacity},
    maze::{Cell, Direction, Maze, Wall},
};

use super::crack::{closed_sides, leaves_pole};

/// Images of the pixel at offset `(dx, dy)` inside a `w` by `h` rectangle,
/// or `None` when the pixel is not in the half (or quarter) being copied.
fn images(symmetry: Symmetry, w: u32, h: u32, dx: u32, dy: u32) -> Option<Vec<(u32, u32)>> {
    let (mx, my) = (w - 1, h - 1);
    match symmetry {
        Symmetry::Horizontal => (dx < w / 2).then(|| vec![(mx - dx, dy)]),
        Symmetry::Vertical => (dy < h / 2).then(|| vec![(dx, my - dy)]),
        Symmetry::Rotate180 => ((dy * w + dx) < (w * h) / 2).then(|| vec![(mx - dx, my - dy)]),
        Symmetry::Rotate90 => {
            let half = mx / 2;
            (dx <= half && dy < half).then(|| vec![(mx - dy, dx), (mx - dx, mx - dy), (dy, mx - dx)])
        }
    }
}

/// Every offset the symmetry maps `(dx, dy)` to, itself included.
fn orbit(symmetry: Symmetry, w: u32, h: u32, dx: u32, dy: u32) -> Vec<(u32, u32)> {
    let (mx, my) = (w - 1, h - 1);
    let mut points = match symmetry {
        Symmetry::Horizontal => vec![(dx, dy), (mx - dx, dy)],
        Symmetry::Vertical => vec![(dx, dy), (dx, my - dy)],
        Symmetry::Rotate180 => vec![(dx, dy), (mx - dx, my - dy)],
        Symmetry::Rotate90 => vec![(dx, dy), (mx - dy, dx), (mx - dx, my - dy), (dy, mx - dx)],
    };
    points.sort_unstable();
    points.dedup();
    points
}

fn wall_orbit(maze: &Maze, symmetry: Symmetry, wall: Wall) -> Vec<Wall> {
    let rect = maze.active();
    orbit(symmetry, rect.width(), rect.height(), wall.0 - rect.xl, wall.1 - rect.yl)
        .into_iter()
        .map(|(x, y)| Wall(rect.xl + x, rect.yl + y))
        .collect()
}

fn cell_orbit(maze: &Maze, symmetry: Symmetry, cell: Cell) -> Vec<Cell> {
    let rect = maze.active();
    let (x, y) = maze.pixel(cell);
    orbit(symmetry, rect.width(), rect.height(), x - rect.xl, y - rect.yl)
        .into_iter()
        .map(|(x, y)| Cell(x / 2, y / 2))
        .collect()
}

/// Open `wall` and each of its images. Returns the walls opened.
fn open_orbit(maze: &mut Maze, symmetry: Symmetry, wall: Wall) -> Vec<Wall> {
    let walls = wall_orbit(maze, symmetry, wall);
    for &image in &walls {
        maze.set_wall_pixel(image, false);
    }
    walls
}

/// Copy one half (or quarter) of the active rectangle onto the rest.
fn copy_symmetric(maze: &mut Maze, symmetry: Symmetry) {
    let rect = maze.active();
    let (w, h) = (rect.width(), rect.height());
    for dy in 0..h {
        for dx in 0..w {
            let Some(targets) = images(symmetry, w, h, dx, dy) else {
                continue;
            };
            let on = maze.get(rect.xl + dx, rect.yl + dy);
            for (tx, ty) in targets {
                maze.set(rect.xl + tx, rect.yl + ty, on);
            }
        }
    }
}

/// Join the sections the copy cut apart. Every cell is opened, then walls
/// are taken in random order and opened with their images while they still
/// separate two sections.
fn reconnect(maze: &mut Maze, ctx: &mut GenerationContext, symmetry: Symmetry) -> Result<Outcome> {
    for cell in maze.cells() {
        maze.set_open(cell, true);
    }
    let mut sets = DisjointSet::new(maze.cell_count())?;
    let mut walls = alloc_with_capacity(maze.cell_count() * 2, "symmetry walls")?;
    for cell in maze.cells() {
        for dir in [Direction::Right, Direction::Down] {
            let Some(next) = maze.neighbor(cell, dir) else {
                continue;
            };
            if maze.has_wall(cell, dir) {
                walls.push(maze.wall(cell, dir));
            } else {
                sets.union(maze.index(cell) as u32, maze.index(next) as u32);
            }
        }
    }
    tracing::debug!("[repair] {} sections after the symmetry copy", sets.set_count());
    walls.shuffle(ctx.rng());

    for wall in walls {
        if sets.set_count() <= 1 {
            break;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let Some((cell, dir)) = maze.wall_side(wall) else {
            continue;
        };
        let Some(next) = maze.neighbor(cell, dir) else {
            continue;
        };
        if !maze.is_wall(wall) || sets.same(maze.index(cell) as u32, maze.index(next) as u32) {
            continue;
        }
        for image in open_orbit(maze, symmetry, wall) {
            let Some((a, side)) = maze.wall_side(image) else {
                continue;
            };
            if let Some(b) = maze.neighbor(a, side) {
                sets.union(maze.index(a) as u32, maze.index(b) as u32);
            }
        }
        ctx.budget.spend();
    }
    Ok(Outcome::Complete)
}

/// Dead ends the copy made: cells with one way out none of whose images
/// was a dead end before it.
fn new_dead_ends(maze: &Maze, symmetry: Symmetry, was_dead_end: &[bool]) -> Vec<Cell> {
    maze.cells()
        .filter(|&cell| maze.is_dead_end(cell))
        .filter(|&cell| {
            cell_orbit(maze, symmetry, cell)
                .into_iter()
                .all(|image| !was_dead_end[maze.index(image)])
        })
        .collect()
}

/// Crack the dead ends the copy made, each with its images. Passes that
/// find only pole-leaving walls skip to the last pass, which accepts poles.
fn crack_new_dead_ends(
    maze: &mut Maze,
    ctx: &mut GenerationContext,
    symmetry: Symmetry,
    was_dead_end: &[bool],
) -> Result<Outcome> {
    let passes = ctx.settings.symmetry_passes.max(1);
    let mut pass = 1;
    while pass <= passes {
        let created = new_dead_ends(maze, symmetry, was_dead_end);
        if created.is_empty() {
            break;
        }
        let allow_poles = pass == passes;
        let mut cracked = 0;
        for cell in created {
            // An image may have been opened already
            if !maze.is_dead_end(cell) {
                continue;
            }
            if ctx.budget.is_exhausted() {
                return Ok(Outcome::Truncated);
            }
            let sides = closed_sides(maze, cell)
                .into_iter()
                .filter(|&dir| allow_poles || !leaves_pole(maze, cell, dir))
                .collect::<Vec<_>>();
            if let Some(dir) = ctx.pick_among(&sides) {
                let wall = maze.wall(cell, dir);
                open_orbit(maze, symmetry, wall);
                ctx.budget.spend();
                cracked += 1;
            }
        }
        tracing::trace!("[repair] symmetry pass {}: {} walls opened", pass, cracked);
        pass = if cracked == 0 && pass < passes { passes } else { pass + 1 };
    }
    Ok(Outcome::Complete)
}

/// Make the maze symmetric, then reconnect what the copy cut apart and
/// crack the dead ends it made. Every wall these repairs open is opened
/// together with its images, so the result stays symmetric. Dead ends the
/// maze already had are kept.
///
/// `Settings::symmetry_passes` bounds the cracking passes.
pub fn enforce_symmetry(
    maze: &mut Maze,
    ctx: &mut GenerationContext,
    symmetry: Symmetry,
) -> Result<Outcome> {
    let rect = maze.active();
    if symmetry == Symmetry::Rotate90 && rect.width() != rect.height() {
        return Err(MazeError::NotSquare {
            width: rect.width(),
            height: rect.height(),
        });
    }
    maze.require_size(Maze::MIN_SIZE)?;

    let was_dead_end = maze.cells().map(|c| maze.is_dead_end(c)).collect::<Vec<_>>();
    copy_symmetric(maze, symmetry);
    if !reconnect(maze, ctx, symmetry)?.is_complete() {
        return Ok(Outcome::Truncated);
    }
    crack_new_dead_ends(maze, ctx, symmetry, &was_dead_end)
}
