//! Baton Core - orchestration library for multi-role development workflows
//!
//! This crate walks a task through an ordered sequence of roles, persists
//! resumable checkpoints of in-progress work, and warns before a previously
//! corrected mistake is repeated.

pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod correction;
pub mod error;
pub mod git;
pub mod role;
mod storage;
pub mod workflow;

pub use agent::{ClaudeExecutor, DryRunExecutor};
pub use checkpoint::{Checkpoint, CheckpointStore, NewCheckpoint};
pub use config::Config;
pub use correction::{CorrectionStore, NewCorrection, WarningContext};
pub use error::{Error, Result};
pub use role::{Role, RoleCatalog, RoleSelector, Task};
pub use workflow::{NewWorkflow, RoleExecutor, WorkflowEngine, WorkflowState, WorkflowStatus};
