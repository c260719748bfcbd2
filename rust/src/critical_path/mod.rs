//! Critical Path Method scheduling.
//!
//! The solver runs a forward pass (earliest starts) and a backward pass
//! (latest starts) over one topological order of the dependency graph. Nodes
//! whose earliest and latest starts coincide have zero slack and form the
//! critical path.

mod calculation;
mod extraction;
mod types;

pub use calculation::{backward_pass, compute_start_times, forward_pass, SolveError};
pub use extraction::{critical_chains, find_critical_path};
pub use types::{CriticalPath, Schedule, TaskTiming};
