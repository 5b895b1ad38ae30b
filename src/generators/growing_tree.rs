use std::collections::VecDeque;

use crate::{
    context::{GenerationContext, Outcome, TreePick},
    disjoint_set::DisjointSet,
    error::{Result, alloc_vec},
    lattice::{Lattice, Mode},
    maze::Maze,
};

/// Index into the active list chosen by `pick`.
fn choose(pick: TreePick, len: usize, ctx: &mut GenerationContext) -> usize {
    match pick {
        TreePick::Newest => len - 1,
        TreePick::Oldest => 0,
        TreePick::Random => ctx.below(len),
        TreePick::Window(n) => len - 1 - ctx.below((n.max(1) as usize).min(len)),
    }
}

fn remove(active: &mut VecDeque<u32>, pick: TreePick, index: usize) {
    match pick {
        // Order does not matter when picking at random
        TreePick::Random => {
            active.swap_remove_back(index);
        }
        _ => {
            active.remove(index);
        }
    }
}

/// Links from `node` to nodes not in any tree yet.
fn outward(lattice: &Lattice, in_tree: &[bool], node: u32) -> Vec<u32> {
    lattice
        .links_of(node)
        .iter()
        .copied()
        .filter(|&id| !in_tree[lattice.link(id).other(node) as usize])
        .collect()
}

pub fn growing_tree(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let lattice = Lattice::new(maze, ctx.settings.mode)?;
    let pick = ctx.settings.tree_pick;
    let mut in_tree = alloc_vec(lattice.node_count(), false, "growing tree marks")?;
    let mut active = VecDeque::new();
    lattice.prepare(maze, false);

    let root = match lattice.mode() {
        Mode::Carve => ctx.below(lattice.node_count()) as u32,
        Mode::Build => Lattice::BORDER,
    };
    in_tree[root as usize] = true;
    lattice.open_node(maze, root);
    active.push_back(root);

    while !active.is_empty() {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let index = choose(pick, active.len(), ctx);
        let node = active[index];
        let links = outward(&lattice, &in_tree, node);
        if links.is_empty() {
            remove(&mut active, pick, index);
            continue;
        }
        let id = links[ctx.below(links.len())];
        let next = lattice.link(id).other(node);
        lattice.connect(maze, id);
        ctx.budget.spend();
        in_tree[next as usize] = true;
        active.push_back(next);
    }
    Ok(Outcome::Complete)
}

/// Several trees grown at once from `Settings::forest_trees` seeds. A node
/// with nothing left to claim joins its tree to any different tree next to
/// it before it retires, so the forest always ends as a single tree.
pub fn growing_forest(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let lattice = Lattice::new(maze, ctx.settings.mode)?;
    let nodes = lattice.node_count();
    let pick = ctx.settings.tree_pick;
    let mut in_tree = alloc_vec(nodes, false, "growing forest marks")?;
    let mut sets = DisjointSet::new(nodes)?;
    let mut active = VecDeque::new();
    lattice.prepare(maze, false);

    let trees = (ctx.settings.forest_trees.max(1) as usize).min(nodes);
    if lattice.mode() == Mode::Build {
        in_tree[Lattice::BORDER as usize] = true;
        active.push_back(Lattice::BORDER);
    }
    while active.len() < trees {
        let seed = ctx.below(nodes) as u32;
        if !in_tree[seed as usize] {
            in_tree[seed as usize] = true;
            lattice.open_node(maze, seed);
            active.push_back(seed);
        }
    }
    tracing::trace!("[generate] forest of {} seeds", active.len());

    while !active.is_empty() {
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }
        let index = choose(pick, active.len(), ctx);
        let node = active[index];
        let links = outward(&lattice, &in_tree, node);
        if let Some(&id) = links.get(ctx.below(links.len().max(1))) {
            let next = lattice.link(id).other(node);
            lattice.connect(maze, id);
            ctx.budget.spend();
            sets.union(node, next);
            in_tree[next as usize] = true;
            active.push_back(next);
            continue;
        }

        // Nothing left to claim: merge with a neighboring tree if there is one
        let foreign = lattice
            .links_of(node)
            .iter()
            .copied()
            .filter(|&id| !sets.same(node, lattice.link(id).other(node)))
            .collect::<Vec<_>>();
        if foreign.is_empty() {
            remove(&mut active, pick, index);
            continue;
        }
        let id = foreign[ctx.below(foreign.len())];
        sets.union(node, lattice.link(id).other(node));
        lattice.connect(maze, id);
        ctx.budget.spend();
    }
    Ok(Outcome::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Settings;

    fn context(seed: u64, tree_pick: TreePick, mode: Mode) -> GenerationContext {
        GenerationContext::new(Settings {
            seed: Some(seed),
            tree_pick,
            mode,
            ..Settings::default()
        })
    }

    #[test]
    fn test_every_pick_spans() {
        for pick in [
            TreePick::Newest,
            TreePick::Random,
            TreePick::Oldest,
            TreePick::Window(3),
        ] {
            let mut maze = Maze::new(7, 5, None).unwrap();
            let mut ctx = context(1, pick, Mode::Carve);
            assert!(growing_tree(&mut maze, &mut ctx).unwrap().is_complete());
            assert_eq!(ctx.budget.spent(), 34, "{pick:?}");
        }
    }

    #[test]
    fn test_forest_is_one_tree() {
        for mode in [Mode::Carve, Mode::Build] {
            let mut maze = Maze::new(9, 9, None).unwrap();
            let mut ctx = context(6, TreePick::Random, mode);
            ctx.settings.forest_trees = 5;
            assert!(growing_forest(&mut maze, &mut ctx).unwrap().is_complete());
            let links = match mode {
                Mode::Carve => 80,
                Mode::Build => 64,
            };
            assert_eq!(ctx.budget.spent(), links, "{mode:?}");
        }
    }
}
