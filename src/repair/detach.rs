use crate::{
    context::{GenerationContext, Outcome},
    disjoint_set::DisjointSet,
    error::{Result, alloc_vec},
    frontier::Bfs,
    lattice::Lattice,
    maze::Maze,
};

/// Join every wall section that floats free of the boundary to the main
/// wall network, along the shortest run of empty vertices.
pub fn remove_detachments(maze: &mut Maze, ctx: &mut GenerationContext) -> Result<Outcome> {
    let lattice = Lattice::walls(maze)?;
    let nodes = lattice.node_count();
    let mut sets = DisjointSet::new(nodes)?;
    for id in 0..lattice.links().len() as u32 {
        if lattice.is_linked(maze, id) {
            let link = lattice.link(id);
            sets.union(link.a, link.b);
        }
    }

    // Present nodes grouped by section, in a stable order
    let mut detached = Vec::new();
    for node in 1..nodes as u32 {
        if lattice.is_present(maze, node) && !sets.same(node, Lattice::BORDER) {
            detached.push((sets.find(node), node));
        }
    }
    detached.sort_unstable();
    tracing::debug!("[repair] {} detached wall vertices", detached.len());

    let mut attached = alloc_vec(nodes, false, "detachment marks")?;
    for (node, mark) in attached.iter_mut().enumerate() {
        *mark = sets.same(node as u32, Lattice::BORDER);
    }
    let mut bfs = Bfs::new(nodes)?;

    for group in detached.chunk_by(|a, b| a.0 == b.0) {
        if attached[group[0].1 as usize] {
            continue;
        }
        if ctx.budget.is_exhausted() {
            return Ok(Outcome::Truncated);
        }

        bfs.reset();
        group.iter().for_each(|&(_, n)| bfs.seed(n));
        let found = bfs.run(
            |node| {
                lattice
                    .links_of(node)
                    .iter()
                    .map(|&id| lattice.link(id).other(node))
                    .filter(|&next| attached[next as usize] || !lattice.is_present(maze, next))
                    .collect::<Vec<_>>()
            },
            |node| attached[node as usize],
        );
        let Some(path) = found.map(|index| bfs.trace(index)) else {
            tracing::warn!("[repair] wall section at vertex {} cannot reach the boundary", group[0].1);
            continue;
        };

        for pair in path.windows(2) {
            if let Some(&id) = lattice
                .links_of(pair[0])
                .iter()
                .find(|&&id| lattice.link(id).other(pair[0]) == pair[1])
            {
                lattice.connect(maze, id);
                ctx.budget.spend();
            }
        }
        for &(_, n) in group {
            attached[n as usize] = true;
        }
        path.iter().for_each(|&n| attached[n as usize] = true);
    }
    Ok(Outcome::Complete)
}
