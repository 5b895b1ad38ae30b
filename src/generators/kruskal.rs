use rand::seq::SliceRandom;

use crate::{
    context::{GenerationContext, Outcome},
    disjoint_set::DisjointSet,
    error::{Result, alloc_with_capacity},
    lattice::Lattice,
    maze::{Maze, Wall},
};

pub fn randomized_kruskal(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let lattice = Lattice::new(maze, ctx.settings.mode)?;
    let mut order = link_ids(&lattice)?;
    // Shuffle edges randomly
    order.shuffle(ctx.rng());
    join(maze, ctx, &lattice, &order)
}

/// Kruskal over links sorted by `weight` of their wall pixel. Ties keep
/// lattice order, so the result depends only on the weights.
pub fn weighted_kruskal<W>(maze: &mut Maze, ctx: &mut GenerationContext, mut weight: W) -> Result<Outcome>
where
    W: FnMut(Wall) -> u32,
{
    let lattice = Lattice::new(maze, ctx.settings.mode)?;
    let mut order = link_ids(&lattice)?;
    let weights = lattice
        .links()
        .iter()
        .map(|link| weight(link.wall))
        .collect::<Vec<_>>();
    order.sort_by_key(|&id| weights[id as usize]);
    join(maze, ctx, &lattice, &order)
}

fn link_ids(lattice: &Lattice) -> Result<Vec<u32>> {
    let mut ids = alloc_with_capacity(lattice.links().len(), "kruskal edges")?;
    ids.extend(0..lattice.links().len() as u32);
    Ok(ids)
}

/// Connect links in `order` whenever they join two different trees.
fn join(
    maze: &mut Maze,
    ctx: &mut GenerationContext,
    lattice: &Lattice,
    order: &[u32],
) -> Result<Outcome> {
    let mut sets = DisjointSet::new(lattice.node_count())?;
    lattice.prepare(maze, true);

    for &id in order {
        if sets.set_count() <= 1 {
            break;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let link = lattice.link(id);
        // If nodes are not yet connected, link them
        if sets.union(link.a, link.b) {
            lattice.connect(maze, id);
            ctx.budget.spend();
        }
    }
    Ok(Outcome::Complete)
}
