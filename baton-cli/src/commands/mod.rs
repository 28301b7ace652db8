//! CLI command implementations

pub mod checkpoint;
pub mod correction;
pub mod role;
pub mod workflow;

pub use checkpoint::CheckpointArgs;
pub use correction::CorrectionArgs;
pub use role::RoleArgs;
pub use workflow::WorkflowArgs;
