//! Biased direction choice with run-length memory.
//!
//! Every generator that walks picks its next direction through
//! [`RandomPolicy`]. Two knobs shape the result:
//!
//! * `bias` in `-10..=10` weights horizontal directions (positive) or
//!   vertical directions (negative) by `1 + |bias|` against `1`, giving the
//!   maze a visible grain.
//! * `run` makes a freshly chosen direction stick for up to `run` more
//!   picks, so corridors tend to go straight. A run along the favored axis
//!   is stretched by the same `1 + |bias|` factor.
//!
//! With both knobs at zero every pick is a single uniform draw, which keeps
//! the uniform spanning-tree samplers uniform.

use rand::Rng;

use crate::maze::{Direction, Orientation};

#[derive(Debug, Clone, Default)]
pub struct RandomPolicy {
    bias: i32,
    run: u32,
    /// Picks left in the current run
    run_left: u32,
    run_dir: Option<Direction>,
}

impl RandomPolicy {
    pub const MAX_BIAS: i32 = 10;

    pub fn new(bias: i32, run: u32) -> Self {
        RandomPolicy {
            bias: bias.clamp(-RandomPolicy::MAX_BIAS, RandomPolicy::MAX_BIAS),
            run,
            run_left: 0,
            run_dir: None,
        }
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn is_unbiased(&self) -> bool {
        self.bias == 0 && self.run == 0
    }

    /// Forget the current run. Called at the start of every pass.
    pub fn reset(&mut self) {
        self.run_left = 0;
        self.run_dir = None;
    }

    fn favored(&self) -> Option<Orientation> {
        match self.bias.signum() {
            1 => Some(Orientation::Horizontal),
            -1 => Some(Orientation::Vertical),
            _ => None,
        }
    }

    fn weight(&self, dir: Direction) -> u32 {
        if self.favored() == Some(dir.orientation()) {
            1 + self.bias.unsigned_abs()
        } else {
            1
        }
    }

    /// Choose one of `candidates`, honoring the current run and the bias.
    pub fn pick_among<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        candidates: &[Direction],
    ) -> Option<Direction> {
        if candidates.is_empty() {
            return None;
        }
        if self.run_left > 0 {
            if let Some(dir) = self.run_dir.filter(|d| candidates.contains(d)) {
                self.run_left -= 1;
                return Some(dir);
            }
        }

        let dir = if self.bias == 0 {
            candidates[rng.random_range(0..candidates.len())]
        } else {
            let total: u32 = candidates.iter().map(|&d| self.weight(d)).sum();
            let mut roll = rng.random_range(0..total);
            let mut chosen = candidates[candidates.len() - 1];
            for &d in candidates {
                let w = self.weight(d);
                if roll < w {
                    chosen = d;
                    break;
                }
                roll -= w;
            }
            chosen
        };

        if self.run > 0 {
            self.run_left = rng.random_range(0..=self.run) * self.weight(dir);
            self.run_dir = Some(dir);
        }
        Some(dir)
    }

    /// Any of the four directions.
    pub fn pick_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Direction {
        self.pick_among(rng, &Direction::ALL)
            .unwrap_or(Direction::Up)
    }

    /// Biased coin: `true` means "go horizontally". Fair when unbiased.
    pub fn prefers_horizontal<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let horizontal = self.weight(Direction::Right);
        let vertical = self.weight(Direction::Down);
        rng.random_range(0..horizontal + vertical) < horizontal
    }
}
