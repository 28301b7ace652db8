//! Workflow orchestration
//!
//! A workflow tracks one task through an ordered sequence of roles, keeping
//! an append-only log of role executions and a handoff baton that each role
//! passes to the next.

mod engine;
mod sequence;
mod state;
mod store;
mod summary;

pub use engine::{
    EnhancedContext, NewWorkflow, RoleExecutor, RoleOutput, RoleRequest, WorkflowEngine,
    HANDOFF_ARTIFACT, PR_ARTIFACT, SUGGESTED_ROLE_KEY,
};
pub use sequence::{RoleSequence, DEFAULT_ROLE_SEQUENCE};
pub use state::{
    workspace_id, ExecutionStatus, HandoffData, WorkflowExecution, WorkflowState, WorkflowStatus,
};
pub use store::WorkflowStore;
pub use summary::{render_handoff_summary, render_pr_summary};
