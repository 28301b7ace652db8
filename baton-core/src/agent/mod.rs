//! Role executors
//!
//! Implementations of [`RoleExecutor`](crate::workflow::RoleExecutor) that
//! hand a role's work to an external agent process.

mod claude;
mod dry_run;
mod output;
mod prompts;

pub use claude::ClaudeExecutor;
pub use dry_run::DryRunExecutor;
pub use output::{parse_role_output, DELIVERABLE_PREFIX};
pub use prompts::{role_prompt, PromptContext};
