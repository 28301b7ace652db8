//! Checkpoints for suspending and resuming long tasks
//!
//! A checkpoint records what is done, what is left and a hint for where to
//! pick up. It deliberately captures nothing more than that.

mod store;
mod types;

pub use store::CheckpointStore;
pub use types::{Checkpoint, CheckpointMetadata, FileProgress, FileStatus, NewCheckpoint};
