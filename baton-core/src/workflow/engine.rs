//! Workflow orchestration
//!
//! The engine walks a workflow through its role sequence. Each step runs the
//! current role through a [`RoleExecutor`], appends the execution to the
//! workflow's log, replaces the handoff baton and either advances to the
//! next role or completes the workflow. Every state change is persisted
//! before the engine returns.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use super::sequence::RoleSequence;
use super::state::{HandoffData, WorkflowExecution, WorkflowState, WorkflowStatus};
use super::store::WorkflowStore;
use super::summary::{render_handoff_summary, render_pr_summary};
use crate::config::Config;
use crate::correction::{
    format_warnings_as_context, CorrectionStore, CorrectionWarning, WarningContext,
};
use crate::role::{Role, RoleCatalog, RoleRecommendation, RoleSelector, Task};
use crate::{Error, Result};

/// Handoff context key holding the selector's pick at creation
pub const SUGGESTED_ROLE_KEY: &str = "suggested_role";

/// File names of the completion artifacts
pub const HANDOFF_ARTIFACT: &str = "handoff.md";
pub const PR_ARTIFACT: &str = "pull-request.md";

/// Everything a role sees besides the workflow itself
#[derive(Debug, Clone, Default)]
pub struct EnhancedContext {
    /// Baton as left by the previous role
    pub handoff: HandoffData,
    /// Catalog profile of the running role, if the catalog knows it
    pub role: Option<Role>,
    /// Past corrections relevant to this step
    pub warnings: Vec<CorrectionWarning>,
    /// `warnings` rendered as markdown, `None` when there are none
    pub corrections: Option<String>,
}

/// Input to a role executor
#[derive(Debug, Clone)]
pub struct RoleRequest {
    pub role_id: String,
    pub workflow: WorkflowState,
    pub context: EnhancedContext,
}

/// What a role produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleOutput {
    pub output: String,
    pub deliverables: Vec<String>,
}

/// Does the actual work of a role
///
/// The engine treats implementations as black boxes: an `Err` fails the
/// workflow, there is no retry.
#[async_trait]
pub trait RoleExecutor: Send + Sync {
    async fn execute(&self, request: &RoleRequest) -> Result<RoleOutput>;
}

/// Request to start a workflow
#[derive(Debug, Clone, Default)]
pub struct NewWorkflow {
    pub title: String,
    pub description: String,
    pub issue_id: Option<String>,
}

impl NewWorkflow {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            issue_id: None,
        }
    }

    /// Link the workflow to an issue
    pub fn with_issue(mut self, issue_id: impl Into<String>) -> Self {
        self.issue_id = Some(issue_id.into());
        self
    }
}

/// Sequences roles for workflows and persists their state
pub struct WorkflowEngine {
    store: WorkflowStore,
    executor: Arc<dyn RoleExecutor>,
    sequence: RoleSequence,
    selector: RoleSelector,
    corrections: Option<Arc<CorrectionStore>>,
    workspaces_dir: Option<PathBuf>,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("store", &self.store)
            .field("sequence", &self.sequence)
            .field("corrections", &self.corrections.is_some())
            .field("workspaces_dir", &self.workspaces_dir)
            .finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    /// Engine with the default sequence, built-in roles and no corrections
    pub fn new(workflows_dir: impl Into<PathBuf>, executor: Arc<dyn RoleExecutor>) -> Self {
        Self {
            store: WorkflowStore::new(workflows_dir),
            executor,
            sequence: RoleSequence::default(),
            selector: RoleSelector::new(RoleCatalog::builtin()),
            corrections: None,
            workspaces_dir: None,
        }
    }

    /// Engine wired from configuration
    ///
    /// Loads the configured role catalog and sequence, and enables both
    /// correction warnings and completion artifacts under the storage root.
    pub fn from_config(config: &Config, executor: Arc<dyn RoleExecutor>) -> Result<Self> {
        let catalog = match &config.roles.catalog {
            Some(path) => RoleCatalog::load_from_file(path)?,
            None => RoleCatalog::builtin(),
        };
        let sequence = RoleSequence::new(config.workflow.sequence.clone())?;

        Ok(Self::new(config.storage.workflows_dir(), executor)
            .with_sequence(sequence)
            .with_selector(RoleSelector::new(catalog))
            .with_corrections(Arc::new(CorrectionStore::new(
                config.storage.corrections_dir(),
            )))
            .with_workspaces_dir(config.storage.workspaces_dir()))
    }

    /// Use a different role progression
    pub fn with_sequence(mut self, sequence: RoleSequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// Use a different role selector
    pub fn with_selector(mut self, selector: RoleSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Inject correction warnings into every role's context
    pub fn with_corrections(mut self, store: Arc<CorrectionStore>) -> Self {
        self.corrections = Some(store);
        self
    }

    /// Write completion artifacts under `dir/<workspace id>/`
    pub fn with_workspaces_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspaces_dir = Some(dir.into());
        self
    }

    /// The role progression
    pub fn sequence(&self) -> &RoleSequence {
        &self.sequence
    }

    /// The role selector
    pub fn selector(&self) -> &RoleSelector {
        &self.selector
    }

    /// Create and persist a pending workflow at the first role
    pub async fn create_workflow(&self, request: NewWorkflow) -> Result<WorkflowState> {
        let first = self.sequence.first();
        let mut state = WorkflowState::new(
            Some(request.title),
            Some(request.description),
            request.issue_id,
            first,
        );

        let suggested = self.suggest_role(&state.summary_text());
        state
            .handoff_data
            .context
            .insert(SUGGESTED_ROLE_KEY.to_string(), suggested.name);
        state.handoff_data.pending_tasks = self.sequence.roles().to_vec();

        self.store.save(&state).await?;

        tracing::info!(
            workflow = %state.id,
            workspace = %state.workspace_id,
            role = %state.current_role,
            "Workflow created"
        );

        Ok(state)
    }

    /// Run the current role of a workflow
    ///
    /// On success the execution is returned and the workflow has advanced
    /// (or completed, if the role was terminal). On executor failure the
    /// execution and the workflow are marked failed, persisted, and an
    /// [`Error::Execution`] is returned.
    pub async fn execute_next_role(&self, workflow_id: &str) -> Result<WorkflowExecution> {
        let mut state = self.require(workflow_id).await?;

        match state.status {
            WorkflowStatus::Pending => state.transition_to(WorkflowStatus::InProgress)?,
            WorkflowStatus::InProgress => {}
            WorkflowStatus::Blocked => {
                return Err(Error::Other(format!(
                    "Workflow {} is blocked; resume it before running the next role",
                    workflow_id
                )))
            }
            status => {
                return Err(Error::InvalidTransition {
                    from: status.to_string(),
                    to: WorkflowStatus::InProgress.to_string(),
                })
            }
        }

        let role = state.current_role.clone();
        let context = self.enhanced_context(&state, &role).await?;

        let mut execution = WorkflowExecution::start(&role);
        state.record_execution(&execution);
        self.store.save(&state).await?;

        tracing::info!(workflow = %state.id, role = %role, "Executing role");

        let request = RoleRequest {
            role_id: role.clone(),
            workflow: state.clone(),
            context,
        };

        match self.executor.execute(&request).await {
            Ok(output) => {
                execution.complete(output.output, output.deliverables)?;
                state.record_execution(&execution);
                self.advance(&mut state, &execution)?;
                self.store.save(&state).await?;

                if state.status == WorkflowStatus::Completed {
                    self.write_artifacts(&state).await;
                }

                Ok(execution)
            }
            Err(e) => {
                let message = e.to_string();
                execution.fail(message.clone())?;
                state.record_execution(&execution);
                state.transition_to(WorkflowStatus::Failed)?;
                self.store.save(&state).await?;

                tracing::error!(workflow = %state.id, role = %role, "Role failed: {}", message);

                Err(Error::Execution { role, message })
            }
        }
    }

    /// Execute roles until the workflow completes or is blocked
    pub async fn run_to_completion(&self, workflow_id: &str) -> Result<WorkflowState> {
        loop {
            let state = self.require(workflow_id).await?;
            if state.status.is_terminal() || state.status == WorkflowStatus::Blocked {
                return Ok(state);
            }
            self.execute_next_role(workflow_id).await?;
        }
    }

    /// Current state of a workflow, `None` if it does not exist
    pub async fn get_workflow_state(&self, workflow_id: &str) -> Result<Option<WorkflowState>> {
        self.store.load(workflow_id).await
    }

    /// Every workflow, newest first
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowState>> {
        self.store.list().await
    }

    /// Pause an in-progress workflow
    pub async fn block_workflow(&self, workflow_id: &str, reason: &str) -> Result<WorkflowState> {
        let mut state = self.require(workflow_id).await?;
        state.transition_to(WorkflowStatus::Blocked)?;
        state.handoff_data.notes = Some(format!("Blocked: {}", reason));
        self.store.save(&state).await?;
        Ok(state)
    }

    /// Return a blocked workflow to in-progress
    pub async fn resume_workflow(&self, workflow_id: &str) -> Result<WorkflowState> {
        let mut state = self.require(workflow_id).await?;
        if state.status != WorkflowStatus::Blocked {
            return Err(Error::InvalidTransition {
                from: state.status.to_string(),
                to: WorkflowStatus::InProgress.to_string(),
            });
        }
        state.transition_to(WorkflowStatus::InProgress)?;
        self.store.save(&state).await?;
        Ok(state)
    }

    /// Best role for a free-text description; counts toward usage history
    pub fn suggest_role(&self, description: &str) -> Role {
        self.selector.select_optimal_role(&Task::new(description))
    }

    /// Top role recommendations for a description, without side effects
    pub fn recommend_roles(&self, description: &str) -> Vec<RoleRecommendation> {
        self.selector.recommendations(&Task::new(description))
    }

    async fn require(&self, workflow_id: &str) -> Result<WorkflowState> {
        self.store
            .load(workflow_id)
            .await?
            .ok_or_else(|| Error::not_found("workflow", workflow_id))
    }

    async fn enhanced_context(&self, state: &WorkflowState, role: &str) -> Result<EnhancedContext> {
        let mut context = EnhancedContext {
            handoff: state.handoff_data.clone(),
            role: self.selector.catalog().find(role).cloned(),
            ..Default::default()
        };

        if let Some(store) = &self.corrections {
            let query = WarningContext::new(state.summary_text()).with_phase(role);
            context.warnings = store.warnings(&query).await?;
            if !context.warnings.is_empty() {
                context.corrections = Some(format_warnings_as_context(&context.warnings));
            }
        }

        Ok(context)
    }

    /// Replace the baton and move to the next role, or complete
    fn advance(&self, state: &mut WorkflowState, execution: &WorkflowExecution) -> Result<()> {
        let role = execution.role_id.clone();
        let terminal = self.sequence.is_terminal(&role);
        let next = if terminal {
            role.clone()
        } else {
            self.sequence.next(&role).to_string()
        };

        let previous = &state.handoff_data;
        let mut handoff = HandoffData {
            current_role: next.clone(),
            previous_role: Some(role.clone()),
            context: previous.context.clone(),
            completed_tasks: previous.completed_tasks.clone(),
            pending_tasks: self.sequence.remaining_after(&role),
            deliverables: previous.deliverables.clone(),
            next_steps: previous.next_steps.clone(),
            notes: Some(format!(
                "{} finished with {} deliverable(s)",
                role,
                execution.deliverables.len()
            )),
        };
        handoff.completed_tasks.push(role.clone());
        handoff
            .deliverables
            .extend(execution.deliverables.iter().cloned());
        if let Some(output) = &execution.output {
            handoff
                .context
                .insert(format!("{}.output", role), output.clone());
        }
        if !terminal {
            handoff
                .next_steps
                .push(format!("{}: continue from {} handoff", next, role));
        }

        state.handoff_data = handoff;
        state.current_role = next;

        if terminal {
            state.transition_to(WorkflowStatus::Completed)?;
            tracing::info!(
                workflow = %state.id,
                executions = state.executions.len(),
                "Workflow completed"
            );
        } else {
            state.touch();
            tracing::info!(
                workflow = %state.id,
                from = %role,
                to = %state.current_role,
                "Handing off to next role"
            );
        }

        Ok(())
    }

    async fn write_artifacts(&self, state: &WorkflowState) {
        let Some(root) = &self.workspaces_dir else {
            return;
        };
        let dir = root.join(&state.workspace_id);

        let result = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(dir.join(HANDOFF_ARTIFACT), render_handoff_summary(state)).await?;
            tokio::fs::write(dir.join(PR_ARTIFACT), render_pr_summary(state)).await
        }
        .await;

        match result {
            Ok(()) => tracing::info!(path = %dir.display(), "Wrote workflow summaries"),
            Err(e) => tracing::warn!(
                path = %dir.display(),
                "Failed to write workflow summaries: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::NewCorrection;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every request and optionally fails one role
    #[derive(Default)]
    struct ScriptedExecutor {
        fail_on: Option<String>,
        calls: Mutex<Vec<RoleRequest>>,
    }

    impl ScriptedExecutor {
        fn failing_on(role: &str) -> Self {
            Self {
                fail_on: Some(role.to_string()),
                ..Default::default()
            }
        }

        fn roles(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.role_id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl RoleExecutor for ScriptedExecutor {
        async fn execute(&self, request: &RoleRequest) -> Result<RoleOutput> {
            self.calls.lock().unwrap().push(request.clone());
            if self.fail_on.as_deref() == Some(request.role_id.as_str()) {
                return Err(Error::Agent("model refused".to_string()));
            }
            Ok(RoleOutput {
                output: format!("{} output", request.role_id),
                deliverables: vec![format!("{}.md", request.role_id)],
            })
        }
    }

    fn engine(temp_dir: &TempDir, executor: Arc<ScriptedExecutor>) -> WorkflowEngine {
        WorkflowEngine::new(temp_dir.path().join("workflows"), executor)
            .with_workspaces_dir(temp_dir.path().join("workspaces"))
    }

    #[tokio::test]
    async fn test_create_persists_pending_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, Arc::new(ScriptedExecutor::default()));

        let state = engine
            .create_workflow(NewWorkflow::new("Add auth", "Login form").with_issue("#7"))
            .await
            .unwrap();

        assert_eq!(state.status, WorkflowStatus::Pending);
        assert_eq!(state.current_role, "analysis");
        assert_eq!(state.issue_id.as_deref(), Some("#7"));
        assert!(state
            .handoff_data
            .context
            .contains_key(SUGGESTED_ROLE_KEY));
        assert_eq!(state.handoff_data.pending_tasks.len(), 8);

        let stored = engine.get_workflow_state(&state.id).await.unwrap().unwrap();
        assert_eq!(stored, state);
    }

    #[tokio::test]
    async fn test_first_step_advances() {
        let temp_dir = TempDir::new().unwrap();
        let executor = Arc::new(ScriptedExecutor::default());
        let engine = engine(&temp_dir, executor.clone());
        let id = engine
            .create_workflow(NewWorkflow::new("Add auth", ""))
            .await
            .unwrap()
            .id;

        let execution = engine.execute_next_role(&id).await.unwrap();
        assert_eq!(execution.role_id, "analysis");
        assert!(execution.is_finished());
        assert_eq!(execution.deliverables, vec!["analysis.md"]);

        let state = engine.get_workflow_state(&id).await.unwrap().unwrap();
        assert_eq!(state.status, WorkflowStatus::InProgress);
        assert_eq!(state.current_role, "archaeology");
        let handoff = &state.handoff_data;
        assert_eq!(handoff.current_role, "archaeology");
        assert_eq!(handoff.previous_role.as_deref(), Some("analysis"));
        assert_eq!(handoff.completed_tasks, vec!["analysis"]);
        assert_eq!(handoff.pending_tasks.len(), 7);
        assert_eq!(handoff.pending_tasks[0], "archaeology");
        assert_eq!(handoff.context["analysis.output"], "analysis output");
        assert_eq!(handoff.next_steps.len(), 1);
    }

    #[tokio::test]
    async fn test_runs_every_role_to_completion() {
        let temp_dir = TempDir::new().unwrap();
        let executor = Arc::new(ScriptedExecutor::default());
        let engine = engine(&temp_dir, executor.clone());
        let id = engine
            .create_workflow(NewWorkflow::new("Add auth", "Session login"))
            .await
            .unwrap()
            .id;

        let mut steps = 0;
        loop {
            engine.execute_next_role(&id).await.unwrap();
            steps += 1;
            let state = engine.get_workflow_state(&id).await.unwrap().unwrap();
            if state.status == WorkflowStatus::Completed {
                break;
            }
            assert!(steps < 20, "workflow never completed");
        }

        let state = engine.get_workflow_state(&id).await.unwrap().unwrap();
        assert_eq!(state.executions.len(), 8);
        assert_eq!(steps, 8);
        assert!(state.completed_at.is_some());
        assert_eq!(state.current_role, "documentation");
        assert!(state.handoff_data.pending_tasks.is_empty());
        assert_eq!(state.handoff_data.deliverables.len(), 8);
        assert_eq!(executor.roles(), engine.sequence().roles());

        let workspace = temp_dir.path().join("workspaces").join(&state.workspace_id);
        let handoff = std::fs::read_to_string(workspace.join(HANDOFF_ARTIFACT)).unwrap();
        assert!(handoff.contains("# Handoff: Add auth"));
        assert!(workspace.join(PR_ARTIFACT).exists());
    }

    #[tokio::test]
    async fn test_completed_workflow_never_changes() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, Arc::new(ScriptedExecutor::default()))
            .with_sequence(RoleSequence::new(vec!["only".to_string()]).unwrap());
        let id = engine
            .create_workflow(NewWorkflow::new("t", "d"))
            .await
            .unwrap()
            .id;

        let state = engine.run_to_completion(&id).await.unwrap();
        assert_eq!(state.status, WorkflowStatus::Completed);

        let err = engine.execute_next_role(&id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert!(engine.block_workflow(&id, "late").await.is_err());
        assert!(engine.resume_workflow(&id).await.is_err());

        let after = engine.get_workflow_state(&id).await.unwrap().unwrap();
        assert_eq!(after, state);
    }

    #[tokio::test]
    async fn test_failure_marks_workflow_failed() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, Arc::new(ScriptedExecutor::failing_on("design")));
        let id = engine
            .create_workflow(NewWorkflow::new("t", "d"))
            .await
            .unwrap()
            .id;

        let err = engine.run_to_completion(&id).await.unwrap_err();
        match err {
            Error::Execution { role, message } => {
                assert_eq!(role, "design");
                assert!(message.contains("model refused"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let state = engine.get_workflow_state(&id).await.unwrap().unwrap();
        assert_eq!(state.status, WorkflowStatus::Failed);
        assert_eq!(state.executions.len(), 3);
        let last = state.last_execution().unwrap();
        assert_eq!(last.role_id, "design");
        assert!(last.error.as_deref().unwrap().contains("model refused"));
        assert!(last.end_time.is_some());
        assert!(state.completed_at.is_none());

        // terminal: no retry through the engine
        assert!(engine.execute_next_role(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_block_and_resume() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, Arc::new(ScriptedExecutor::default()));
        let id = engine
            .create_workflow(NewWorkflow::new("t", "d"))
            .await
            .unwrap()
            .id;

        // only in-progress workflows can be blocked
        assert!(engine.block_workflow(&id, "waiting").await.is_err());

        engine.execute_next_role(&id).await.unwrap();
        let blocked = engine.block_workflow(&id, "needs review").await.unwrap();
        assert_eq!(blocked.status, WorkflowStatus::Blocked);
        assert_eq!(blocked.handoff_data.notes.as_deref(), Some("Blocked: needs review"));

        assert!(engine.execute_next_role(&id).await.is_err());
        let paused = engine.run_to_completion(&id).await.unwrap();
        assert_eq!(paused.status, WorkflowStatus::Blocked);

        let resumed = engine.resume_workflow(&id).await.unwrap();
        assert_eq!(resumed.status, WorkflowStatus::InProgress);
        let execution = engine.execute_next_role(&id).await.unwrap();
        assert_eq!(execution.role_id, "archaeology");
    }

    #[tokio::test]
    async fn test_missing_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, Arc::new(ScriptedExecutor::default()));

        assert!(engine.get_workflow_state("wf-nope").await.unwrap().is_none());
        assert!(engine
            .execute_next_role("wf-nope")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(engine
            .block_workflow("wf-nope", "x")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_correction_warnings_injected() {
        let temp_dir = TempDir::new().unwrap();
        let corrections = Arc::new(CorrectionStore::new(temp_dir.path().join("corrections")));
        corrections
            .record(
                NewCorrection::new("stored passwords in plain text", "hash with argon2")
                    .with_trigger_keywords(&["password"])
                    .with_phases(&["analysis"]),
            )
            .await
            .unwrap();

        let executor = Arc::new(ScriptedExecutor::default());
        let engine = engine(&temp_dir, executor.clone()).with_corrections(corrections);
        let id = engine
            .create_workflow(NewWorkflow::new("Password reset", "Email a reset link"))
            .await
            .unwrap()
            .id;

        engine.execute_next_role(&id).await.unwrap();

        let calls = executor.calls.lock().unwrap();
        let context = &calls[0].context;
        assert_eq!(context.warnings.len(), 1);
        assert!(context
            .corrections
            .as_deref()
            .unwrap()
            .contains("hash with argon2"));
        assert_eq!(context.role.as_ref().unwrap().name, "analysis");
    }

    #[tokio::test]
    async fn test_artifact_failure_does_not_fail_workflow() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let engine = WorkflowEngine::new(
            temp_dir.path().join("workflows"),
            Arc::new(ScriptedExecutor::default()),
        )
        .with_sequence(RoleSequence::new(vec!["only".to_string()]).unwrap())
        .with_workspaces_dir(&blocker);
        let id = engine
            .create_workflow(NewWorkflow::new("t", "d"))
            .await
            .unwrap()
            .id;

        let state = engine.run_to_completion(&id).await.unwrap();
        assert_eq!(state.status, WorkflowStatus::Completed);
    }

    #[tokio::test]
    async fn test_list_and_recommend() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, Arc::new(ScriptedExecutor::default()));

        let first = engine
            .create_workflow(NewWorkflow::new("one", ""))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = engine
            .create_workflow(NewWorkflow::new("two", ""))
            .await
            .unwrap();

        let listed = engine.list_workflows().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        let recommendations = engine.recommend_roles("write unit tests for the parser");
        assert!(recommendations.len() <= 3);
    }
}
