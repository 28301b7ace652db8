//! Executor that does no work
//!
//! Used to walk a workflow through its roles without spawning an agent, e.g.
//! to check the configured sequence or the generated artifacts.

use async_trait::async_trait;

use super::prompts::role_prompt;
use crate::workflow::{RoleExecutor, RoleOutput, RoleRequest};
use crate::Result;

/// Produces placeholder output for every role
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl RoleExecutor for DryRunExecutor {
    async fn execute(&self, request: &RoleRequest) -> Result<RoleOutput> {
        let prompt = role_prompt(request);
        tracing::info!(
            role = %request.role_id,
            prompt_len = prompt.len(),
            "Dry run: skipping agent"
        );

        Ok(RoleOutput {
            output: format!(
                "[dry run] {} role skipped ({} byte prompt)",
                request.role_id,
                prompt.len()
            ),
            deliverables: Vec::new(),
        })
    }
}
