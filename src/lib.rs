//! Bitmap maze generation, repair and solving.
//!
//! A maze lives in a [`maze::Grid`] of on (wall) and off (passage) pixels.
//! [`generators`] carve perfect mazes into it, [`repair`] reshapes their
//! topology and [`solvers`] find routes through them. Every pass takes a
//! [`context::GenerationContext`] holding the seeded RNG, the direction
//! policy and the cancellation budget.

pub mod analysis;
pub mod app;
pub mod context;
pub mod disjoint_set;
pub mod error;
pub mod frontier;
pub mod generators;
pub mod lattice;
pub mod maze;
pub mod random;
pub mod repair;
pub mod solvers;

pub use context::{GenerationContext, Outcome, Settings};
pub use error::{MazeError, Result};
pub use maze::{Cell, Direction, Grid, GridEvent, Maze};
