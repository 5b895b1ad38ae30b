use crate::{
    context::{GenerationContext, Outcome},
    disjoint_set::DisjointSet,
    error::Result,
    lattice::Lattice,
    maze::Maze,
};

use super::crack::{crack_dead_ends, force_open_dead_ends};

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Turn the maze into a braid maze: no dead ends, passages still connected.
///
/// Dead ends are cracked open first, then walls are added back in one
/// sweep over all wall segments with a random stride coprime to their count,
/// so every segment is visited once in a scattered order. A segment is
/// skipped when it would leave a cell on either side with a single exit, or
/// when its two ends already belong to one wall section, which would close
/// a ring of walls around some cells.
pub fn braid(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    if !crack_dead_ends(maze, ctx)?.is_complete() || !force_open_dead_ends(maze, ctx)?.is_complete() {
        return Ok(Outcome::Truncated);
    }

    let lattice = Lattice::walls(maze)?;
    let mut sets = DisjointSet::new(lattice.node_count())?;
    for id in 0..lattice.links().len() as u32 {
        if lattice.is_linked(maze, id) {
            let link = lattice.link(id);
            sets.union(link.a, link.b);
        }
    }

    let count = lattice.links().len();
    if count == 0 {
        return Ok(Outcome::Complete);
    }
    let stride = loop {
        let stride = 1 + ctx.below(count);
        if gcd(stride, count) == 1 {
            break stride;
        }
    };
    let offset = ctx.below(count);

    let mut added = 0;
    for step in 0..count {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let id = ((offset + step * stride) % count) as u32;
        let link = lattice.link(id);
        if lattice.is_linked(maze, id) {
            continue;
        }
        let Some((cell, dir)) = maze.wall_side(link.wall) else {
            continue;
        };
        let Some(next) = maze.neighbor(cell, dir) else {
            continue;
        };
        if maze.open_count(cell) <= 2 || maze.open_count(next) <= 2 {
            continue;
        }
        if !sets.union(link.a, link.b) {
            continue;
        }
        lattice.connect(maze, id);
        ctx.budget.spend();
        added += 1;
    }
    tracing::debug!("[repair] braid added back {} walls", added);
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 20), 1);
    }

    #[test]
    fn test_braid_has_no_dead_ends() {
        for seed in 0..5 {
            let mut maze = Maze::new(12, 9, None).unwrap();
            let mut ctx = GenerationContext::seeded(seed);
            crate::generators::hunt_and_kill(&mut maze, &mut ctx).unwrap();
            assert!(braid(&mut maze, &mut ctx).unwrap().is_complete());
            assert_eq!(analysis::dead_end_count(&maze), 0, "seed {seed}");
            assert_eq!(analysis::component_count(&maze).unwrap(), 1, "seed {seed}");
        }
    }

    #[test]
    fn test_braid_of_open_room_adds_walls() {
        let mut maze = Maze::new(6, 6, None).unwrap();
        maze.clear_interior();
        let mut ctx = GenerationContext::seeded(1);
        braid(&mut maze, &mut ctx).unwrap();
        assert!(analysis::open_edge_count(&maze) < 60);
        assert_eq!(analysis::dead_end_count(&maze), 0);
        assert_eq!(analysis::component_count(&maze).unwrap(), 1);
    }
}
