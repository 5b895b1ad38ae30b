mod aldous_broder;
mod binary_tree;
mod eller;
mod growing_tree;
mod hunt_kill;
mod kruskal;
mod prim;
mod recur_div;
mod sidewinder;
mod wilson;

pub use aldous_broder::aldous_broder;
pub use binary_tree::binary_tree;
pub use eller::eller;
pub use growing_tree::{growing_forest, growing_tree};
pub use hunt_kill::{Carver, Phase, Strategy, hunt_and_kill, recursive_backtrack};
pub use kruskal::{randomized_kruskal, weighted_kruskal};
pub use prim::{random_weighted_prim, randomized_prim, weighted_prim};
pub use recur_div::recursive_division;
pub use sidewinder::sidewinder;
pub use wilson::wilson;

use crate::{
    context::{GenerationContext, Outcome},
    error::Result,
    maze::{Direction, Maze},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Generator {
    HuntAndKill,
    Backtrack,
    Prim,
    PrimWeighted,
    Kruskal,
    Wilson,
    AldousBroder,
    Eller,
    GrowingTree,
    GrowingForest,
    BinaryTree,
    Sidewinder,
    Division,
}

impl Generator {
    pub const ALL: [Generator; 13] = [
        Generator::HuntAndKill,
        Generator::Backtrack,
        Generator::Prim,
        Generator::PrimWeighted,
        Generator::Kruskal,
        Generator::Wilson,
        Generator::AldousBroder,
        Generator::Eller,
        Generator::GrowingTree,
        Generator::GrowingForest,
        Generator::BinaryTree,
        Generator::Sidewinder,
        Generator::Division,
    ];

    /// Whether the generator honors [`crate::lattice::Mode::Build`].
    pub fn can_build(self) -> bool {
        matches!(
            self,
            Generator::Prim
                | Generator::PrimWeighted
                | Generator::Kruskal
                | Generator::GrowingTree
                | Generator::GrowingForest
                | Generator::BinaryTree
                | Generator::Sidewinder
        )
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::HuntAndKill => write!(f, "Hunt and Kill"),
            Generator::Backtrack => write!(f, "Recursive Backtracking"),
            Generator::Prim => write!(f, "Prim's Algorithm (simplified)"),
            Generator::PrimWeighted => write!(f, "Prim's Algorithm (weighted)"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
            Generator::Wilson => write!(f, "Wilson's Algorithm"),
            Generator::AldousBroder => write!(f, "Aldous-Broder"),
            Generator::Eller => write!(f, "Eller's Algorithm"),
            Generator::GrowingTree => write!(f, "Growing Tree"),
            Generator::GrowingForest => write!(f, "Growing Forest"),
            Generator::BinaryTree => write!(f, "Binary Tree"),
            Generator::Sidewinder => write!(f, "Sidewinder"),
            Generator::Division => write!(f, "Recursive Division"),
        }
    }
}

/// Replace the active rectangle with a perfect maze built by `generator`.
pub fn generate_maze(
    maze: &mut Maze,
    generator: Generator,
    ctx: &mut GenerationContext,
) -> Result<Outcome> {
    maze.require_size(Maze::MIN_SIZE)?;
    ctx.policy.reset();
    tracing::debug!(
        "[generate] {} on {}x{} cells",
        generator,
        maze.cells_x(),
        maze.cells_y()
    );

    let outcome = match generator {
        Generator::HuntAndKill => hunt_and_kill(maze, ctx),
        Generator::Backtrack => recursive_backtrack(maze, ctx),
        Generator::Prim => randomized_prim(maze, ctx),
        Generator::PrimWeighted => random_weighted_prim(maze, ctx),
        Generator::Kruskal => randomized_kruskal(maze, ctx),
        Generator::Wilson => wilson(maze, ctx),
        Generator::AldousBroder => aldous_broder(maze, ctx),
        Generator::Eller => eller(maze, ctx),
        Generator::GrowingTree => growing_tree(maze, ctx),
        Generator::GrowingForest => growing_forest(maze, ctx),
        Generator::BinaryTree => binary_tree(maze, ctx),
        Generator::Sidewinder => sidewinder(maze, ctx),
        Generator::Division => recursive_division(maze, ctx),
    }?;

    tracing::debug!(
        "[generate] {} finished: {:?} after {} steps",
        generator,
        outcome,
        ctx.budget.spent()
    );
    Ok(outcome)
}

/// Grow a wall from the vertex `(vx, vy)` one segment toward `dir`,
/// turning on both end vertices.
fn raise_wall(maze: &mut Maze, vx: u32, vy: u32, dir: Direction) {
    let (x, y) = maze.vertex(vx, vy);
    let (dx, dy) = dir.delta();
    maze.set(x, y, true);
    maze.set(x.wrapping_add_signed(dx), y.wrapping_add_signed(dy), true);
    maze.set(x.wrapping_add_signed(2 * dx), y.wrapping_add_signed(2 * dy), true);
}
