use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::lattice::Mode;
use crate::maze::Direction;
use crate::random::RandomPolicy;

/// How the growing tree picks the next active node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreePick {
    /// Most recently added: behaves like the recursive backtracker
    Newest,
    /// Uniformly random: behaves like simple Prim
    Random,
    /// First added: long straight corridors
    Oldest,
    /// Random among the `n` most recently added
    Window(u32),
}

/// Symmetry enforced on a finished maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Symmetry {
    /// Mirror the left half onto the right half
    Horizontal,
    /// Mirror the top half onto the bottom half
    Vertical,
    /// Point symmetry through the center
    Rotate180,
    /// Four-fold rotation; needs a square active rectangle
    Rotate90,
}

/// Knobs read by the generators, repairs and solvers. Callers fill these in
/// before a pass; the core never changes them.
#[derive(Debug, Clone)]
pub struct Settings {
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Direction bias, see [`RandomPolicy`]
    pub bias: i32,
    /// Maximum run length, see [`RandomPolicy`]
    pub run: u32,
    /// Cancellation budget in carved cells. `None` is unlimited.
    pub budget: Option<u64>,
    /// Carve passages or add walls, for the generators that can do both
    pub mode: Mode,
    pub tree_pick: TreePick,
    /// Number of seeds for the growing forest
    pub forest_trees: u32,
    /// Recursive division stops splitting areas narrower than this, in cells
    pub division_min: u32,
    /// Bound on the dead-end passes after a symmetry copy
    pub symmetry_passes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            seed: None,
            bias: 0,
            run: 0,
            budget: None,
            mode: Mode::Carve,
            tree_pick: TreePick::Newest,
            forest_trees: 4,
            division_min: 2,
            symmetry_passes: 4,
        }
    }
}

/// Result of a pass that may be cut short by the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// The budget ran out. The maze is valid but may not span every cell.
    Truncated,
}

impl Outcome {
    pub fn is_complete(self) -> bool {
        self == Outcome::Complete
    }
}

/// Cancellation budget, decremented once per carved or filled cell.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    limit: Option<u64>,
    spent: u64,
}

impl Budget {
    pub fn new(limit: Option<u64>) -> Self {
        Budget { limit, spent: 0 }
    }

    /// Take one unit. Returns `false`, without spending, once exhausted.
    pub fn spend(&mut self) -> bool {
        if self.limit.is_some_and(|limit| self.spent >= limit) {
            return false;
        }
        self.spent += 1;
        true
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }

    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.spent))
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == Some(0)
    }
}

/// Everything a pass needs besides the maze itself.
pub struct GenerationContext {
    rng: StdRng,
    pub policy: RandomPolicy,
    pub budget: Budget,
    pub settings: Settings,
}

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

impl GenerationContext {
    pub fn new(settings: Settings) -> Self {
        GenerationContext {
            rng: get_rng(settings.seed),
            policy: RandomPolicy::new(settings.bias, settings.run),
            budget: Budget::new(settings.budget),
            settings,
        }
    }

    /// Default settings with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        GenerationContext::new(Settings {
            seed: Some(seed),
            ..Settings::default()
        })
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Refill the budget for a new pass.
    pub fn reset_budget(&mut self, limit: Option<u64>) {
        self.budget = Budget::new(limit);
    }

    /// Uniform index below `n`. `n` must be positive.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        self.rng.random_range(0..n)
    }

    pub fn pick_among(&mut self, candidates: &[Direction]) -> Option<Direction> {
        self.policy.pick_among(&mut self.rng, candidates)
    }

    pub fn pick_direction(&mut self) -> Direction {
        self.policy.pick_direction(&mut self.rng)
    }

    pub fn prefers_horizontal(&mut self) -> bool {
        self.policy.prefers_horizontal(&mut self.rng)
    }
}
