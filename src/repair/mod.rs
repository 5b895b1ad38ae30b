//! Topology fixes applied to a finished maze: reconnecting cut-off
//! passages and walls, removing loops or dead ends, and symmetry.

mod braid;
mod crack;
mod detach;
mod isolation;
mod loops;
mod poles;
mod symmetry;

pub use braid::braid;
pub use crack::crack_dead_ends;
pub use detach::remove_detachments;
pub use isolation::remove_isolations;
pub use loops::remove_loops;
pub use poles::remove_poles;
pub use symmetry::enforce_symmetry;
