pub mod errors;
pub mod handler;
pub mod operations;
pub mod types;

// Public API exports
pub use errors::{MutationOp, SweepError};
pub use handler::{run_sweep, run_sweeps};
pub use types::{KindReport, SweepOptions, SweepReport};
