//! Role progression table
//!
//! A workflow walks an ordered list of role names. The list is plain data so
//! it can be replaced from configuration without touching the state machine.

use crate::{Error, Result};

/// Default progression from analysis to documentation
pub const DEFAULT_ROLE_SEQUENCE: &[&str] = &[
    "analysis",
    "archaeology",
    "design",
    "build",
    "implement",
    "test",
    "qa",
    "documentation",
];

/// Ordered, non-empty list of role names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSequence {
    roles: Vec<String>,
}

impl Default for RoleSequence {
    fn default() -> Self {
        Self {
            roles: DEFAULT_ROLE_SEQUENCE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RoleSequence {
    /// Build a sequence, rejecting an empty list or blank names
    pub fn new(roles: Vec<String>) -> Result<Self> {
        if roles.is_empty() {
            return Err(Error::Config("role sequence is empty".to_string()));
        }
        if roles.iter().any(|r| r.trim().is_empty()) {
            return Err(Error::Config(
                "role sequence contains a blank role name".to_string(),
            ));
        }
        Ok(Self { roles })
    }

    /// All roles in order
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Number of roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// The role every workflow starts with
    pub fn first(&self) -> &str {
        &self.roles[0]
    }

    /// The role that completes a workflow
    pub fn terminal(&self) -> &str {
        &self.roles[self.roles.len() - 1]
    }

    /// Index of `role`, compared case-insensitively
    pub fn position(&self, role: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.eq_ignore_ascii_case(role))
    }

    /// Whether `role` is the terminal role
    pub fn is_terminal(&self, role: &str) -> bool {
        self.terminal().eq_ignore_ascii_case(role)
    }

    /// Role after `current`
    ///
    /// Clamped to the terminal role when `current` is last or not in the
    /// sequence.
    pub fn next(&self, current: &str) -> &str {
        match self.position(current) {
            Some(idx) if idx + 1 < self.roles.len() => &self.roles[idx + 1],
            _ => self.terminal(),
        }
    }

    /// Roles still to run once `current` has finished
    pub fn remaining_after(&self, current: &str) -> Vec<String> {
        match self.position(current) {
            Some(idx) => self.roles[idx + 1..].to_vec(),
            None => vec![self.terminal().to_string()],
        }
    }
}
