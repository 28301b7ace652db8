//! Git repository detection and inspection

use std::path::{Path, PathBuf};

use git2::{Repository, StatusOptions};

use crate::{Error, Result};

/// A git repository wrapper exposing the state a checkpoint records
pub struct GitRepo {
    /// The underlying git2 repository
    repo: Repository,
    /// Path to the repository root
    root: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// This will search upward from the given path to find the repository root.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::Git(format!("Not a git repository: {}", path.display()))
            } else {
                Error::Git(e.to_string())
            }
        })?;

        let root = repo
            .workdir()
            .ok_or_else(|| Error::Git("Bare repositories are not supported".to_string()))?
            .to_path_buf();

        Ok(Self { repo, root })
    }

    /// Get the repository root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the given path is inside a git repository
    pub fn is_git_repo(path: impl AsRef<Path>) -> bool {
        Repository::discover(path.as_ref()).is_ok()
    }

    /// Get the current branch name
    ///
    /// `None` for an unborn branch or a detached HEAD.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(Error::Git(format!("Failed to get HEAD: {}", e))),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Get the SHA of the commit HEAD points at
    pub fn head_commit(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(Error::Git(format!("Failed to get HEAD: {}", e))),
        };

        let commit = head
            .peel_to_commit()
            .map_err(|e| Error::Git(format!("Failed to resolve HEAD commit: {}", e)))?;

        Ok(Some(commit.id().to_string()))
    }

    /// Paths with uncommitted changes, including untracked files
    pub fn modified_files(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .map_err(|e| Error::Git(format!("Failed to read status: {}", e)))?;

        let mut files: Vec<String> = statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .filter_map(|entry| entry.path().map(|p| p.to_string()))
            .collect();
        files.sort();

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        (temp_dir, repo)
    }

    fn commit_file(repo: &Repository, root: &Path, name: &str) -> git2::Oid {
        std::fs::write(root.join(name), "contents").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap()
    }

    #[test]
    fn test_open_non_git_dir() {
        let temp_dir = TempDir::new().unwrap();
        if !GitRepo::is_git_repo(temp_dir.path()) {
            let result = GitRepo::open(temp_dir.path());
            assert!(matches!(result, Err(Error::Git(_))));
        }
    }

    #[test]
    fn test_unborn_head() {
        let (temp_dir, _repo) = init_repo();
        let repo = GitRepo::open(temp_dir.path()).unwrap();
        assert_eq!(repo.current_branch().unwrap(), None);
        assert_eq!(repo.head_commit().unwrap(), None);
    }

    #[test]
    fn test_branch_commit_and_modified_files() {
        let (temp_dir, raw) = init_repo();
        let oid = commit_file(&raw, temp_dir.path(), "committed.txt");
        std::fs::write(temp_dir.path().join("new.txt"), "fresh").unwrap();
        std::fs::write(temp_dir.path().join("committed.txt"), "changed").unwrap();

        let repo = GitRepo::open(temp_dir.path()).unwrap();
        assert!(repo.current_branch().unwrap().is_some());
        assert_eq!(repo.head_commit().unwrap(), Some(oid.to_string()));
        assert_eq!(
            repo.modified_files().unwrap(),
            vec!["committed.txt".to_string(), "new.txt".to_string()]
        );
    }
}
