//! Role executor backed by the Claude Code CLI

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::output::parse_role_output;
use super::prompts::role_prompt;
use crate::config::AgentConfig;
use crate::workflow::{RoleExecutor, RoleOutput, RoleRequest};
use crate::{Error, Result};

/// Runs each role as one `claude --print` invocation
#[derive(Debug, Clone)]
pub struct ClaudeExecutor {
    claude_path: String,
    model: Option<String>,
    workdir: PathBuf,
}

impl ClaudeExecutor {
    /// Executor using `claude` from `PATH` in `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            claude_path: "claude".to_string(),
            model: None,
            workdir: workdir.into(),
        }
    }

    /// Executor configured from the `[agent]` section
    pub fn from_config(config: &AgentConfig, workdir: impl Into<PathBuf>) -> Self {
        let executor = Self::new(workdir).with_path(&config.claude_path);
        match &config.model {
            Some(model) => executor.with_model(model),
            None => executor,
        }
    }

    /// Use a custom claude executable
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.claude_path = path.into();
        self
    }

    /// Use a specific model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Directory the agent runs in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Build the command, without the prompt argument
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.claude_path);
        cmd.arg("--print");

        if let Some(ref model) = self.model {
            cmd.arg("--model").arg(model);
        }

        cmd.current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd
    }
}

#[async_trait]
impl RoleExecutor for ClaudeExecutor {
    async fn execute(&self, request: &RoleRequest) -> Result<RoleOutput> {
        if !self.workdir.exists() {
            return Err(Error::Agent(format!(
                "Working directory does not exist: {}",
                self.workdir.display()
            )));
        }

        let prompt = role_prompt(request);
        tracing::debug!(
            role = %request.role_id,
            claude = %self.claude_path,
            prompt_len = prompt.len(),
            "Spawning claude"
        );

        let output = self
            .build_command()
            .arg(&prompt)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Agent(format!(
                        "Claude executable not found at '{}'. Is Claude Code installed?",
                        self.claude_path
                    ))
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Agent(format!(
                "claude exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_role_output(&stdout);
        tracing::debug!(
            role = %request.role_id,
            deliverables = parsed.deliverables.len(),
            "Claude finished"
        );
        Ok(parsed)
    }
}
