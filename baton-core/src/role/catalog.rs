//! Role catalog loading
//!
//! Catalogs are immutable once loaded. Reloading produces a new catalog that
//! replaces the old one wholesale.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::Role;
use crate::{Error, Result};

/// Name of the role synthesized when a catalog has no general-purpose role
pub const FALLBACK_ROLE_NAME: &str = "General Assistant";

/// An ordered set of roles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleCatalog {
    /// Roles in catalog order; order breaks scoring ties
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl RoleCatalog {
    /// Create a catalog from roles
    pub fn new(roles: Vec<Role>) -> Self {
        Self { roles }
    }

    /// The built-in catalog, one role per default workflow step plus a
    /// general-purpose fallback
    pub fn builtin() -> Self {
        Self::new(vec![
            Role::new(
                "analysis",
                "Analyze requirements and break the request into concrete tasks",
            )
            .with_keywords(&["analyze", "requirement", "scope", "plan", "breakdown", "estimate"])
            .with_capabilities(&["requirements", "planning", "task breakdown"])
            .with_priority(8),
            Role::new(
                "archaeology",
                "Explore the existing codebase and document how the relevant parts work",
            )
            .with_keywords(&["explore", "investigate", "legacy", "existing", "codebase", "trace"])
            .with_capabilities(&["code reading", "dependency mapping", "history"])
            .with_priority(6),
            Role::new(
                "design",
                "Design the architecture, interfaces and data model for the change",
            )
            .with_keywords(&["design", "architecture", "interface", "schema", "model", "api"])
            .with_capabilities(&["architecture", "interface design", "data modeling"])
            .with_priority(7),
            Role::new(
                "build",
                "Set up build configuration, dependencies and project scaffolding",
            )
            .with_keywords(&["build", "scaffold", "setup", "dependency", "config", "pipeline"])
            .with_capabilities(&["build tooling", "dependency management", "ci"])
            .with_priority(5),
            Role::new(
                "implement",
                "Write the production code that implements the designed change",
            )
            .with_keywords(&["implement", "code", "feature", "fix", "refactor", "add", "bug"])
            .with_capabilities(&["coding", "refactoring", "bug fixing"])
            .with_priority(9),
            Role::new("test", "Write and run tests that verify the implemented behavior")
                .with_keywords(&["test", "verify", "coverage", "assert", "unit", "integration"])
                .with_capabilities(&["unit testing", "integration testing", "test automation"])
                .with_priority(8),
            Role::new(
                "qa",
                "Review the change for quality, regressions and edge cases",
            )
            .with_keywords(&["review", "quality", "regression", "edge", "audit", "validate"])
            .with_capabilities(&["code review", "quality assurance", "risk assessment"])
            .with_priority(7),
            Role::new(
                "documentation",
                "Document the change for users and maintainers",
            )
            .with_keywords(&["document", "docs", "readme", "guide", "changelog", "explain"])
            .with_capabilities(&["technical writing", "api docs", "release notes"])
            .with_priority(5),
            Self::synthesized_fallback(),
        ])
    }

    /// Load a catalog from a TOML file with `[[roles]]` tables
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_toml(&contents)
    }

    /// Parse a catalog from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse role catalog: {}", e)))?;

        if let Some(role) = catalog.roles.iter().find(|r| r.name.trim().is_empty()) {
            return Err(Error::Config(format!(
                "Role catalog contains a role without a name: {:?}",
                role.description
            )));
        }

        Ok(catalog)
    }

    /// Number of roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the catalog has no roles
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterate roles in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    /// Find a role by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// The role used when nothing scores above zero
    ///
    /// The first general-purpose role in the catalog, or a synthesized one.
    pub fn fallback_role(&self) -> Role {
        self.roles
            .iter()
            .find(|r| r.is_general_purpose())
            .cloned()
            .unwrap_or_else(Self::synthesized_fallback)
    }

    fn synthesized_fallback() -> Role {
        Role::new(
            FALLBACK_ROLE_NAME,
            "General purpose assistant for tasks that match no specialised role",
        )
        .with_keywords(&["help", "general", "misc"])
        .with_capabilities(&["general assistance"])
        .with_priority(1)
    }
}
