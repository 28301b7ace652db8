//! File-backed workflow persistence

use std::path::{Path, PathBuf};

use super::state::WorkflowState;
use crate::storage::{document_path, list_documents, read_json, write_document};
use crate::Result;

/// One JSON document per workflow id
#[derive(Debug, Clone)]
pub struct WorkflowStore {
    dir: PathBuf,
}

impl WorkflowStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Overwrite the document for `state.id`
    pub async fn save(&self, state: &WorkflowState) -> Result<()> {
        write_document(&self.dir, &state.id, state).await
    }

    /// Load a workflow; `None` if it was never saved
    pub async fn load(&self, id: &str) -> Result<Option<WorkflowState>> {
        match document_path(&self.dir, id) {
            Some(path) => read_json(&path).await,
            None => Ok(None),
        }
    }

    /// Every readable workflow, newest first
    pub async fn list(&self) -> Result<Vec<WorkflowState>> {
        let mut workflows = Vec::new();
        for path in list_documents(&self.dir, None).await? {
            match read_json::<WorkflowState>(&path).await {
                Ok(Some(state)) => workflows.push(state),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping unreadable workflow: {}", e),
            }
        }
        workflows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(workflows)
    }
}
