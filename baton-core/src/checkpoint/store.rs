//! File-backed checkpoint persistence
//!
//! One JSON document per checkpoint under the store directory. Several
//! checkpoints may be marked active at the same time; resuming one does not
//! deactivate the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::types::{Checkpoint, CheckpointMetadata, NewCheckpoint};
use crate::git::{probe_with_timeout, GitInfoProvider, NoGitInfo};
use crate::storage::{document_path, list_documents, read_json, remove_json, write_document};
use crate::{Error, Result};

/// Default bound on the VCS metadata probe
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Durable store of resumable task snapshots
pub struct CheckpointStore {
    dir: PathBuf,
    git: Arc<dyn GitInfoProvider>,
    probe_timeout: Duration,
}

impl std::fmt::Debug for CheckpointStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointStore")
            .field("dir", &self.dir)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}

impl CheckpointStore {
    /// Create a store in `dir` that records no VCS metadata
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            git: Arc::new(NoGitInfo),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Use `provider` for branch, commit and modified-file metadata
    pub fn with_git(mut self, provider: Arc<dyn GitInfoProvider>) -> Self {
        self.git = provider;
        self
    }

    /// Bound the VCS probe
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// The store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a new checkpoint and return its id
    ///
    /// The new checkpoint is marked active. VCS metadata is best effort and
    /// never causes the save to fail.
    pub async fn save(&self, request: NewCheckpoint) -> Result<String> {
        let now = Utc::now();
        let id = format!(
            "cp-{}-{}",
            now.format("%Y%m%d%H%M%S"),
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        );

        let mut metadata = CheckpointMetadata {
            total_files: request.completed.len() + request.pending.len(),
            completed_count: request.completed.len(),
            ..Default::default()
        };
        if let Some(info) = probe_with_timeout(self.git.as_ref(), self.probe_timeout).await {
            metadata.branch = info.branch;
            metadata.last_commit = info.last_commit;
            metadata.modified_files = Some(info.modified_files);
        }

        let checkpoint = Checkpoint {
            id: id.clone(),
            task_description: request.task_description,
            completed: request.completed,
            pending: request.pending,
            context: request.context,
            next_step: request.next_step,
            workflow_id: request.workflow_id,
            metadata,
            checkpoint: now,
            is_active: true,
        };

        write_document(&self.dir, &id, &checkpoint).await?;

        tracing::info!(
            checkpoint = %id,
            completed = checkpoint.metadata.completed_count,
            total = checkpoint.metadata.total_files,
            "Checkpoint saved"
        );

        Ok(id)
    }

    /// Load one checkpoint without changing it
    pub async fn get(&self, id: &str) -> Result<Checkpoint> {
        let Some(path) = document_path(&self.dir, id) else {
            return Err(Error::not_found("checkpoint", id));
        };
        read_json(&path)
            .await?
            .ok_or_else(|| Error::not_found("checkpoint", id))
    }

    /// Resume a checkpoint, or the most recent one if `id` is `None`
    ///
    /// Marks the resumed checkpoint active and persists that flag.
    pub async fn resume(&self, id: Option<&str>) -> Result<Checkpoint> {
        let mut checkpoint = match id {
            Some(id) => self.get(id).await?,
            None => self
                .load_all()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| Error::not_found("checkpoint", "(latest)"))?,
        };

        if !checkpoint.is_active {
            checkpoint.is_active = true;
            write_document(&self.dir, &checkpoint.id, &checkpoint).await?;
        }

        tracing::info!(checkpoint = %checkpoint.id, "Checkpoint resumed");
        Ok(checkpoint)
    }

    /// The newest `limit` checkpoints, newest first
    pub async fn list(&self, limit: usize) -> Result<Vec<Checkpoint>> {
        let mut checkpoints = self.load_all().await?;
        checkpoints.truncate(limit);
        Ok(checkpoints)
    }

    /// Remove one checkpoint, or all of them if `id` is `None`
    ///
    /// Returns the number removed; an unknown id removes nothing.
    pub async fn clear(&self, id: Option<&str>) -> Result<usize> {
        match id {
            Some(id) => {
                let removed = match document_path(&self.dir, id) {
                    Some(path) => remove_json(&path).await?,
                    None => false,
                };
                if removed {
                    tracing::info!(checkpoint = %id, "Checkpoint cleared");
                } else {
                    tracing::debug!(checkpoint = %id, "Checkpoint to clear not found");
                }
                Ok(usize::from(removed))
            }
            None => {
                let mut removed = 0;
                for path in list_documents(&self.dir, None).await? {
                    if remove_json(&path).await? {
                        removed += 1;
                    }
                }
                tracing::info!(removed, "All checkpoints cleared");
                Ok(removed)
            }
        }
    }

    /// Keep only the newest `keep` checkpoints; returns the number removed
    pub async fn prune(&self, keep: usize) -> Result<usize> {
        let checkpoints = self.load_all().await?;
        let mut removed = 0;
        for checkpoint in checkpoints.iter().skip(keep) {
            let Some(path) = document_path(&self.dir, &checkpoint.id) else {
                continue;
            };
            if remove_json(&path).await? {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!(removed, keep, "Old checkpoints pruned");
        }
        Ok(removed)
    }

    /// Every readable checkpoint, newest first
    async fn load_all(&self) -> Result<Vec<Checkpoint>> {
        let mut checkpoints = Vec::new();
        for path in list_documents(&self.dir, None).await? {
            match read_json::<Checkpoint>(&path).await {
                Ok(Some(checkpoint)) => checkpoints.push(checkpoint),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping unreadable checkpoint: {}", e),
            }
        }

        checkpoints.sort_by(|a, b| {
            b.checkpoint
                .cmp(&a.checkpoint)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(checkpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::FileProgress;
    use crate::git::GitInfo;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedGitInfo;

    #[async_trait]
    impl GitInfoProvider for FixedGitInfo {
        async fn probe(&self) -> Option<GitInfo> {
            Some(GitInfo {
                branch: Some("feature/auth".to_string()),
                last_commit: Some("abc123".to_string()),
                modified_files: vec!["src/auth.rs".to_string()],
            })
        }
    }

    struct HangingGitInfo;

    #[async_trait]
    impl GitInfoProvider for HangingGitInfo {
        async fn probe(&self) -> Option<GitInfo> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            None
        }
    }

    fn request() -> NewCheckpoint {
        NewCheckpoint::new("Port the config loader")
            .with_completed(vec![FileProgress::completed("src/config.rs", "parser")])
            .with_pending(vec![
                FileProgress::pending("src/env.rs", "env overrides"),
                FileProgress::pending("src/cli.rs", "flag overrides"),
            ])
            .with_context("Using toml; env vars are prefixed BATON_")
            .with_next_step("Wire env overrides into Config::load")
    }

    /// Backdate a stored checkpoint so ordering does not depend on timing
    async fn backdate(store: &CheckpointStore, id: &str, seconds: i64) {
        let mut checkpoint = store.get(id).await.unwrap();
        checkpoint.checkpoint -= chrono::Duration::seconds(seconds);
        write_document(store.dir(), id, &checkpoint).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_then_resume_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let req = request();
        let id = store.save(req.clone()).await.unwrap();
        let resumed = store.resume(Some(&id)).await.unwrap();

        assert_eq!(resumed.task_description, req.task_description);
        assert_eq!(resumed.completed, req.completed);
        assert_eq!(resumed.pending, req.pending);
        assert_eq!(resumed.context, req.context);
        assert_eq!(resumed.next_step, req.next_step);
        assert!(resumed.is_active);
        assert_eq!(resumed.metadata.total_files, 3);
        assert_eq!(resumed.metadata.completed_count, 1);
    }

    #[tokio::test]
    async fn test_save_without_git_omits_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let id = store.save(request()).await.unwrap();
        let checkpoint = store.get(&id).await.unwrap();
        assert_eq!(checkpoint.metadata.branch, None);
        assert_eq!(checkpoint.metadata.last_commit, None);
        assert_eq!(checkpoint.metadata.modified_files, None);
    }

    #[tokio::test]
    async fn test_save_records_git_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path()).with_git(Arc::new(FixedGitInfo));

        let id = store.save(request()).await.unwrap();
        let checkpoint = store.get(&id).await.unwrap();
        assert_eq!(checkpoint.metadata.branch.as_deref(), Some("feature/auth"));
        assert_eq!(checkpoint.metadata.last_commit.as_deref(), Some("abc123"));
        assert_eq!(
            checkpoint.metadata.modified_files,
            Some(vec!["src/auth.rs".to_string()])
        );
    }

    #[tokio::test]
    async fn test_save_survives_hanging_git_probe() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path())
            .with_git(Arc::new(HangingGitInfo))
            .with_probe_timeout(Duration::from_millis(20));

        let id = store.save(request()).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().metadata.branch, None);
    }

    #[tokio::test]
    async fn test_save_links_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let id = store.save(request().with_workflow("wf-1")).await.unwrap();
        assert_eq!(
            store.get(&id).await.unwrap().workflow_id.as_deref(),
            Some("wf-1")
        );
    }

    #[tokio::test]
    async fn test_resume_latest() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let older = store.save(NewCheckpoint::new("older")).await.unwrap();
        let newer = store.save(NewCheckpoint::new("newer")).await.unwrap();
        backdate(&store, &older, 60).await;

        let resumed = store.resume(None).await.unwrap();
        assert_eq!(resumed.id, newer);
        assert_eq!(resumed.task_description, "newer");
    }

    #[tokio::test]
    async fn test_resume_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        assert!(store.resume(None).await.unwrap_err().is_not_found());
        assert!(store.resume(Some("cp-nope")).await.unwrap_err().is_not_found());
    }

    // Resuming does not deactivate other checkpoints: more than one can be
    // active at once. This mirrors current behavior rather than guaranteeing
    // a single active checkpoint.
    #[tokio::test]
    async fn test_resume_does_not_deactivate_others() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let first = store.save(NewCheckpoint::new("first")).await.unwrap();
        let second = store.save(NewCheckpoint::new("second")).await.unwrap();

        let mut stored = store.get(&first).await.unwrap();
        stored.is_active = false;
        write_document(store.dir(), &first, &stored).await.unwrap();

        store.resume(Some(&first)).await.unwrap();
        assert!(store.get(&first).await.unwrap().is_active);
        assert!(store.get(&second).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_list_limit_and_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let mut ids = Vec::new();
        for i in 0..5 {
            let id = store
                .save(NewCheckpoint::new(format!("task {}", i)))
                .await
                .unwrap();
            ids.push(id);
        }
        // task 0 is oldest, task 4 newest
        for (age, id) in ids.iter().rev().enumerate() {
            backdate(&store, id, age as i64 * 10).await;
        }

        let listed = store.list(3).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].task_description, "task 4");
        assert_eq!(listed[1].task_description, "task 3");
        assert_eq!(listed[2].task_description, "task 2");
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].checkpoint >= pair[1].checkpoint));

        assert_eq!(store.list(10).await.unwrap().len(), 5);
        assert!(store.list(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_one_and_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let id = store.save(NewCheckpoint::new("a")).await.unwrap();
        store.save(NewCheckpoint::new("b")).await.unwrap();
        store.save(NewCheckpoint::new("c")).await.unwrap();

        assert_eq!(store.clear(Some(&id)).await.unwrap(), 1);
        assert_eq!(store.clear(Some(&id)).await.unwrap(), 0);
        assert_eq!(store.clear(None).await.unwrap(), 2);
        assert!(store.list(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_cannot_reach_other_stores() {
        let temp_dir = TempDir::new().unwrap();
        let workflows = crate::workflow::WorkflowStore::new(temp_dir.path().join("workflows"));
        let workflow = crate::workflow::WorkflowState::new(None, None, None, "analysis");
        workflows.save(&workflow).await.unwrap();

        let store = CheckpointStore::new(temp_dir.path().join("checkpoints"));
        let escaping = format!("../workflows/{}", workflow.id);
        assert_eq!(store.clear(Some(&escaping)).await.unwrap(), 0);
        assert!(store.get(&escaping).await.unwrap_err().is_not_found());
        assert!(store.resume(Some(&escaping)).await.unwrap_err().is_not_found());
        assert!(workflows.load(&workflow.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_on_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path().join("never-created"));
        assert_eq!(store.clear(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_prune_keeps_newest() {
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());

        let old = store.save(NewCheckpoint::new("old")).await.unwrap();
        let newest = store.save(NewCheckpoint::new("newest")).await.unwrap();
        backdate(&store, &old, 60).await;

        assert_eq!(store.prune(1).await.unwrap(), 1);
        let remaining = store.list(10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, newest);
    }
}
