use std::{cmp::Reverse, collections::BinaryHeap};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    context::{GenerationContext, Outcome},
    error::{Result, alloc_vec, alloc_with_capacity},
    lattice::{Lattice, Mode},
    maze::{Maze, Wall},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Out,
    Frontier,
    In,
}

/// First node of the tree: a random cell, or the border when building walls.
fn root(lattice: &Lattice, ctx: &mut GenerationContext) -> u32 {
    match lattice.mode() {
        Mode::Carve => ctx.below(lattice.node_count()) as u32,
        Mode::Build => Lattice::BORDER,
    }
}

/// Push the unreached neighbors of `node` onto the frontier.
fn expand(lattice: &Lattice, state: &mut [State], frontiers: &mut Vec<u32>, node: u32) {
    for &id in lattice.links_of(node) {
        let next = lattice.link(id).other(node);
        if state[next as usize] == State::Out {
            state[next as usize] = State::Frontier;
            frontiers.push(next);
        }
    }
}

/// Simple Prim: grow from a random frontier node, attached to a random
/// neighbor already in the tree.
pub fn randomized_prim(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let lattice = Lattice::new(maze, ctx.settings.mode)?;
    let nodes = lattice.node_count();
    let mut state = alloc_vec(nodes, State::Out, "prim states")?;
    let mut frontiers = alloc_with_capacity(nodes, "prim frontier")?;
    lattice.prepare(maze, false);

    let start = root(&lattice, ctx);
    state[start as usize] = State::In;
    lattice.open_node(maze, start);
    expand(&lattice, &mut state, &mut frontiers, start);

    while !frontiers.is_empty() {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        // Randomly select a node from the frontiers
        let idx = ctx.below(frontiers.len());
        let frontier = frontiers.swap_remove(idx);

        let attached = lattice
            .links_of(frontier)
            .iter()
            .copied()
            .filter(|&id| state[lattice.link(id).other(frontier) as usize] == State::In)
            .collect::<Vec<_>>();
        debug_assert!(!attached.is_empty(), "frontier node with no tree neighbor");
        if attached.is_empty() {
            continue;
        }
        let id = attached[ctx.below(attached.len())];
        lattice.connect(maze, id);
        ctx.budget.spend();
        state[frontier as usize] = State::In;
        expand(&lattice, &mut state, &mut frontiers, frontier);
    }
    Ok(Outcome::Complete)
}

/// True Prim: always take the cheapest link leaving the tree. `weight` maps
/// each candidate wall pixel to its cost, e.g. the brightness of an image
/// pixel. Equal weights are taken in insertion order.
pub fn weighted_prim<W>(maze: &mut Maze, ctx: &mut GenerationContext, mut weight: W) -> Result<Outcome>
where
    W: FnMut(Wall) -> u32,
{
    let lattice = Lattice::new(maze, ctx.settings.mode)?;
    let nodes = lattice.node_count();
    let mut in_tree = alloc_vec(nodes, false, "prim states")?;
    let weights = lattice
        .links()
        .iter()
        .map(|link| weight(link.wall))
        .collect::<Vec<u32>>();
    lattice.prepare(maze, false);

    let mut heap: BinaryHeap<Reverse<(u32, u64, u32)>> = BinaryHeap::new();
    let mut sequence = 0u64;
    let mut push_links = |heap: &mut BinaryHeap<Reverse<(u32, u64, u32)>>, in_tree: &[bool], node: u32| {
        for &id in lattice.links_of(node) {
            if !in_tree[lattice.link(id).other(node) as usize] {
                heap.push(Reverse((weights[id as usize], sequence, id)));
                sequence += 1;
            }
        }
    };

    let start = root(&lattice, ctx);
    in_tree[start as usize] = true;
    lattice.open_node(maze, start);
    push_links(&mut heap, &in_tree, start);

    while let Some(Reverse((_, _, id))) = heap.pop() {
        let link = lattice.link(id);
        let next = if in_tree[link.a as usize] { link.b } else { link.a };
        if in_tree[next as usize] {
            continue;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        lattice.connect(maze, id);
        ctx.budget.spend();
        in_tree[next as usize] = true;
        push_links(&mut heap, &in_tree, next);
    }
    Ok(Outcome::Complete)
}

/// Weighted Prim with a fresh random weight per link. The weights come from
/// a generator seeded off the context's, so they do not depend on how often
/// or in what order `weighted_prim` asks for them.
pub fn random_weighted_prim(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let mut weights = StdRng::seed_from_u64(ctx.rng().random());
    weighted_prim(maze, ctx, |_| weights.random::<u32>())
}
