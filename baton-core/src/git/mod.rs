//! Git operations for Baton
//!
//! This module provides repository inspection used to stamp checkpoints with
//! branch, commit and working-tree state.

mod info;
mod repo;

pub use info::{probe_with_timeout, GitInfo, GitInfoProvider, NoGitInfo, RepoGitInfo};
pub use repo::GitRepo;
