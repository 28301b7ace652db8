//! Workflow state machine
//!
//! `WorkflowState` is the aggregate persisted for every orchestration run. It
//! owns its execution log and the handoff baton passed between roles.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Length of the hex workspace identifier
const WORKSPACE_ID_LEN: usize = 12;

/// Overall status of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Created, no role has run yet
    #[default]
    Pending,
    /// At least one role has started
    InProgress,
    /// The terminal role finished
    Completed,
    /// A role failed; terminal
    Failed,
    /// Paused until someone resumes it
    Blocked,
}

impl WorkflowStatus {
    /// Statuses reachable from this one
    pub fn valid_transitions(&self) -> &'static [WorkflowStatus] {
        match self {
            WorkflowStatus::Pending => &[WorkflowStatus::InProgress],
            WorkflowStatus::InProgress => &[
                WorkflowStatus::Completed,
                WorkflowStatus::Failed,
                WorkflowStatus::Blocked,
            ],
            WorkflowStatus::Blocked => &[WorkflowStatus::InProgress, WorkflowStatus::Failed],
            WorkflowStatus::Completed | WorkflowStatus::Failed => &[],
        }
    }

    /// Check if moving to `next` is allowed
    pub fn can_transition_to(&self, next: &WorkflowStatus) -> bool {
        self.valid_transitions().contains(next)
    }

    /// Completed and failed workflows never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Failed)
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one role execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One role's attempt at its part of the workflow
///
/// Append-only: once `end_time` is set the execution is never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    pub id: String,
    pub role_id: String,
    pub status: ExecutionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowExecution {
    /// Start an execution of `role_id`
    pub fn start(role_id: impl Into<String>) -> Self {
        Self {
            id: format!("exec-{}", uuid::Uuid::new_v4().simple()),
            role_id: role_id.into(),
            status: ExecutionStatus::InProgress,
            start_time: Utc::now(),
            end_time: None,
            output: None,
            deliverables: Vec::new(),
            error: None,
        }
    }

    /// Whether the execution has ended
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Record a successful result
    pub fn complete(&mut self, output: String, deliverables: Vec<String>) -> Result<()> {
        self.finish(ExecutionStatus::Completed)?;
        self.output = Some(output);
        self.deliverables = deliverables;
        Ok(())
    }

    /// Record a failure
    pub fn fail(&mut self, error: impl Into<String>) -> Result<()> {
        self.finish(ExecutionStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn finish(&mut self, status: ExecutionStatus) -> Result<()> {
        if self.is_finished() {
            return Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        self.end_time = Some(Utc::now());
        Ok(())
    }
}

/// The baton passed from one role to the next
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffData {
    pub current_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_role: Option<String>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
    #[serde(default)]
    pub pending_tasks: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Persisted state of one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stable hash used to partition on-disk artifacts
    pub workspace_id: String,
    pub current_role: String,
    pub status: WorkflowStatus,
    #[serde(default)]
    pub executions: Vec<WorkflowExecution>,
    pub handoff_data: HandoffData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowState {
    /// Create a pending workflow positioned at `first_role`
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        issue_id: Option<String>,
        first_role: &str,
    ) -> Self {
        let id = format!("wf-{}", uuid::Uuid::new_v4().simple());
        let now = Utc::now();
        let workspace_id = workspace_id(&id, title.as_deref().unwrap_or(""), &now);

        Self {
            id,
            issue_id,
            title,
            description,
            workspace_id,
            current_role: first_role.to_string(),
            status: WorkflowStatus::Pending,
            executions: Vec::new(),
            handoff_data: HandoffData {
                current_role: first_role.to_string(),
                ..Default::default()
            },
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Title and description joined, for matching and prompts
    pub fn summary_text(&self) -> String {
        [self.title.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Change status, enforcing the transition table
    pub fn transition_to(&mut self, status: WorkflowStatus) -> Result<()> {
        if !self.status.can_transition_to(&status) {
            return Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }

        tracing::info!(
            workflow = %self.id,
            from = %self.status,
            to = %status,
            "Workflow status transition"
        );

        self.status = status;
        self.touch();
        if status == WorkflowStatus::Completed {
            self.completed_at = Some(self.updated_at);
        }
        Ok(())
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Most recent execution
    pub fn last_execution(&self) -> Option<&WorkflowExecution> {
        self.executions.last()
    }

    /// Replace the most recent execution with its finished copy
    pub(crate) fn record_execution(&mut self, execution: &WorkflowExecution) {
        if let Some(slot) = self.executions.iter_mut().rev().find(|e| e.id == execution.id) {
            *slot = execution.clone();
        } else {
            self.executions.push(execution.clone());
        }
        self.touch();
    }
}

/// Short stable hash of id, title and creation time
pub fn workspace_id(id: &str, title: &str, created_at: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(title.as_bytes());
    hasher.update(created_at.to_rfc3339().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..WORKSPACE_ID_LEN].to_string()
}
