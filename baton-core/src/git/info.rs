//! Best-effort VCS metadata for checkpoints
//!
//! Probing never fails: a missing repository, a git error or a timeout all
//! produce `None`, and the caller simply omits the metadata.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use super::repo::GitRepo;
use crate::Result;

/// Repository state captured alongside a checkpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    /// Current branch, if HEAD is on one
    pub branch: Option<String>,
    /// SHA of the HEAD commit
    pub last_commit: Option<String>,
    /// Files with uncommitted changes
    pub modified_files: Vec<String>,
}

/// Source of VCS metadata
#[async_trait]
pub trait GitInfoProvider: Send + Sync {
    /// Probe the repository, returning `None` if there is nothing to report
    async fn probe(&self) -> Option<GitInfo>;
}

/// Reads metadata from the repository containing `workdir`
#[derive(Debug, Clone)]
pub struct RepoGitInfo {
    workdir: PathBuf,
}

impl RepoGitInfo {
    /// Create a provider for the repository containing `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn read(workdir: &Path) -> Result<GitInfo> {
        let repo = GitRepo::open(workdir)?;
        Ok(GitInfo {
            branch: repo.current_branch()?,
            last_commit: repo.head_commit()?,
            modified_files: repo.modified_files()?,
        })
    }
}

#[async_trait]
impl GitInfoProvider for RepoGitInfo {
    async fn probe(&self) -> Option<GitInfo> {
        let workdir = self.workdir.clone();
        match tokio::task::spawn_blocking(move || Self::read(&workdir)).await {
            Ok(Ok(info)) => Some(info),
            Ok(Err(e)) => {
                tracing::debug!(workdir = %self.workdir.display(), "Git metadata unavailable: {}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Git probe task failed: {}", e);
                None
            }
        }
    }
}

/// Provider for environments without version control
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGitInfo;

#[async_trait]
impl GitInfoProvider for NoGitInfo {
    async fn probe(&self) -> Option<GitInfo> {
        None
    }
}

/// Probe `provider`, giving up after `timeout`
pub async fn probe_with_timeout(
    provider: &dyn GitInfoProvider,
    timeout: Duration,
) -> Option<GitInfo> {
    match tokio::time::timeout(timeout, provider.probe()).await {
        Ok(info) => info,
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Git metadata probe timed out"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct SlowGitInfo;

    #[async_trait]
    impl GitInfoProvider for SlowGitInfo {
        async fn probe(&self) -> Option<GitInfo> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Some(GitInfo::default())
        }
    }

    #[tokio::test]
    async fn test_no_git_info() {
        assert_eq!(NoGitInfo.probe().await, None);
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        let info = probe_with_timeout(&SlowGitInfo, Duration::from_millis(20)).await;
        assert_eq!(info, None);
    }

    #[tokio::test]
    async fn test_repo_probe_outside_repository() {
        let temp_dir = TempDir::new().unwrap();
        if !GitRepo::is_git_repo(temp_dir.path()) {
            let provider = RepoGitInfo::new(temp_dir.path());
            assert_eq!(provider.probe().await, None);
        }
    }

    #[tokio::test]
    async fn test_repo_probe_reports_untracked_files() {
        let temp_dir = TempDir::new().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("draft.md"), "notes").unwrap();

        let provider = RepoGitInfo::new(temp_dir.path());
        let info = probe_with_timeout(&provider, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(info.branch, None);
        assert_eq!(info.last_commit, None);
        assert_eq!(info.modified_files, vec!["draft.md".to_string()]);
    }
}
