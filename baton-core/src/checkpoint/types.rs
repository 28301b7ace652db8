//! Checkpoint documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress state of one file in a checkpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FileStatus::Pending => "pending",
            FileStatus::InProgress => "in_progress",
            FileStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// A file tracked by a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProgress {
    /// Path relative to the project
    pub path: String,
    /// What was or will be done to it
    #[serde(default)]
    pub description: String,
    /// Progress state
    #[serde(default)]
    pub status: FileStatus,
}

impl FileProgress {
    /// A completed file
    pub fn completed(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            status: FileStatus::Completed,
        }
    }

    /// A file still to do
    pub fn pending(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            status: FileStatus::Pending,
        }
    }
}

/// Best-effort environment metadata; VCS fields are omitted when unknown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_files: Option<Vec<String>>,
    pub total_files: usize,
    pub completed_count: usize,
}

/// A resumable snapshot of an in-progress task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Unique id
    pub id: String,
    /// What the task is
    pub task_description: String,
    /// Files already done
    #[serde(default)]
    pub completed: Vec<FileProgress>,
    /// Files still to do
    #[serde(default)]
    pub pending: Vec<FileProgress>,
    /// Free-text context needed to pick the task back up
    #[serde(default)]
    pub context: String,
    /// Where to resume
    #[serde(default)]
    pub next_step: String,
    /// Workflow this checkpoint belongs to (lookup only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// Environment metadata
    #[serde(default)]
    pub metadata: CheckpointMetadata,
    /// Creation time
    pub checkpoint: DateTime<Utc>,
    /// Whether the checkpoint is being worked on
    #[serde(default)]
    pub is_active: bool,
}

impl Checkpoint {
    /// Fraction of tracked files that are completed, `0.0` if none are tracked
    pub fn progress(&self) -> f64 {
        let total = self.completed.len() + self.pending.len();
        if total == 0 {
            0.0
        } else {
            self.completed.len() as f64 / total as f64
        }
    }
}

/// Input to [`CheckpointStore::save`](super::CheckpointStore::save)
#[derive(Debug, Clone, Default)]
pub struct NewCheckpoint {
    pub task_description: String,
    pub completed: Vec<FileProgress>,
    pub pending: Vec<FileProgress>,
    pub context: String,
    pub next_step: String,
    pub workflow_id: Option<String>,
}

impl NewCheckpoint {
    /// Start a checkpoint request for a task
    pub fn new(task_description: impl Into<String>) -> Self {
        Self {
            task_description: task_description.into(),
            ..Default::default()
        }
    }

    /// Set completed files
    pub fn with_completed(mut self, completed: Vec<FileProgress>) -> Self {
        self.completed = completed;
        self
    }

    /// Set pending files
    pub fn with_pending(mut self, pending: Vec<FileProgress>) -> Self {
        self.pending = pending;
        self
    }

    /// Set free-text context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the resume hint
    pub fn with_next_step(mut self, next_step: impl Into<String>) -> Self {
        self.next_step = next_step.into();
        self
    }

    /// Link to a workflow
    pub fn with_workflow(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }
}
