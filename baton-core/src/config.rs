//! Configuration management for Baton
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (BATON_*)
//! 3. Config file (~/.config/baton/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::workflow::DEFAULT_ROLE_SEQUENCE;
use crate::{Error, Result};

/// Agent-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Path to the claude executable
    pub claude_path: String,

    /// Model to use for Claude
    pub model: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            claude_path: "claude".to_string(),
            model: None, // Let claude use its default
        }
    }
}

/// Where workflows, checkpoints and corrections are stored
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; `None` means the platform data directory
    pub root: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the storage root
    ///
    /// Returns `<data_local_dir>/baton`, or `./.baton` when the platform
    /// has no data directory.
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|p| p.join("baton"))
                .unwrap_or_else(|| PathBuf::from(".baton"))
        })
    }

    /// Directory holding one JSON document per workflow
    pub fn workflows_dir(&self) -> PathBuf {
        self.root_dir().join("workflows")
    }

    /// Directory holding one JSON document per checkpoint
    pub fn checkpoints_dir(&self) -> PathBuf {
        self.root_dir().join("checkpoints")
    }

    /// Directory holding correction documents and their index
    pub fn corrections_dir(&self) -> PathBuf {
        self.root_dir().join("corrections")
    }

    /// Directory partitioned by workflow workspace identifier
    pub fn workspaces_dir(&self) -> PathBuf {
        self.root_dir().join("workspaces")
    }
}

/// Git probing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Upper bound on the checkpoint metadata probe
    #[serde(with = "humantime_serde")]
    pub probe_timeout: Duration,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(2),
        }
    }
}

/// Workflow progression configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Ordered role names a workflow walks through
    pub sequence: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            sequence: DEFAULT_ROLE_SEQUENCE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Role catalog configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Optional TOML catalog replacing the built-in roles
    pub catalog: Option<PathBuf>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Agent configuration
    pub agent: AgentConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Git configuration
    pub git: GitConfig,
    /// Workflow configuration
    pub workflow: WorkflowConfig,
    /// Role catalog configuration
    pub roles: RolesConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/baton/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("baton").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - BATON_HOME: Storage root directory
    /// - BATON_CLAUDE_PATH: Path to claude executable
    /// - BATON_MODEL: Model to use
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(home) = std::env::var("BATON_HOME") {
            self.storage.root = Some(PathBuf::from(home));
        }

        if let Ok(claude_path) = std::env::var("BATON_CLAUDE_PATH") {
            self.agent.claude_path = claude_path;
        }

        if let Ok(model) = std::env::var("BATON_MODEL") {
            self.agent.model = Some(model);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        home: Option<PathBuf>,
        claude_path: Option<String>,
        model: Option<String>,
    ) -> Self {
        if let Some(home) = home {
            self.storage.root = Some(home);
        }

        if let Some(path) = claude_path {
            self.agent.claude_path = path;
        }

        if let Some(m) = model {
            self.agent.model = Some(m);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        home: Option<PathBuf>,
        claude_path: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(home, claude_path, model))
    }
}
