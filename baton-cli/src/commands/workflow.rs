//! Workflow commands

use std::path::PathBuf;
use std::sync::Arc;

use baton_core::workflow::{NewWorkflow, RoleExecutor, WorkflowEngine, WorkflowState};
use baton_core::{ClaudeExecutor, Config, DryRunExecutor};
use clap::{Args, Subcommand};

/// Workflow commands
#[derive(Args, Debug)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommand,
}

/// How roles are executed
#[derive(Args, Debug, Clone)]
pub struct ExecutionOptions {
    /// Walk the roles without spawning an agent
    #[arg(long)]
    pub dry_run: bool,

    /// Directory the agent works in (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub workdir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowCommand {
    /// Create a workflow for a task
    Create {
        /// Short title of the task
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Issue the workflow belongs to
        #[arg(short, long)]
        issue: Option<String>,
    },

    /// Run roles until the workflow completes, fails or is blocked
    Run {
        /// Workflow id
        id: String,

        #[command(flatten)]
        options: ExecutionOptions,
    },

    /// Run only the current role
    Step {
        /// Workflow id
        id: String,

        #[command(flatten)]
        options: ExecutionOptions,
    },

    /// Show a workflow
    Status {
        /// Workflow id
        id: String,
    },

    /// List workflows, newest first
    List,

    /// Pause an in-progress workflow
    Block {
        /// Workflow id
        id: String,

        /// Why it is blocked
        reason: String,
    },

    /// Resume a blocked workflow
    Resume {
        /// Workflow id
        id: String,
    },
}

impl WorkflowArgs {
    /// Execute the workflow command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        match &self.command {
            WorkflowCommand::Create {
                title,
                description,
                issue,
            } => {
                let engine = engine(config, None)?;
                let mut request = NewWorkflow::new(title, description);
                if let Some(issue) = issue {
                    request = request.with_issue(issue);
                }
                let state = engine.create_workflow(request).await?;

                println!("Created workflow {}", state.id);
                println!("  status: {}", state.status);
                println!("  current role: {}", state.current_role);
                if let Some(suggested) = state
                    .handoff_data
                    .context
                    .get(baton_core::workflow::SUGGESTED_ROLE_KEY)
                {
                    println!("  suggested role: {}", suggested);
                }
                Ok(())
            }
            WorkflowCommand::Run { id, options } => {
                let engine = engine(config, Some(options))?;
                let result = engine.run_to_completion(id).await;
                // show what was recorded even when a role failed
                if let Some(state) = engine.get_workflow_state(id).await? {
                    print_state(&state, verbose);
                }
                result?;
                Ok(())
            }
            WorkflowCommand::Step { id, options } => {
                let engine = engine(config, Some(options))?;
                let execution = engine.execute_next_role(id).await?;
                println!(
                    "Role {} {} ({} deliverable(s))",
                    execution.role_id,
                    execution.status,
                    execution.deliverables.len()
                );
                if verbose {
                    if let Some(output) = &execution.output {
                        println!();
                        println!("{}", output);
                    }
                }
                Ok(())
            }
            WorkflowCommand::Status { id } => {
                let engine = engine(config, None)?;
                match engine.get_workflow_state(id).await? {
                    Some(state) => print_state(&state, verbose),
                    None => anyhow::bail!("Workflow not found: {}", id),
                }
                Ok(())
            }
            WorkflowCommand::List => {
                let engine = engine(config, None)?;
                let workflows = engine.list_workflows().await?;
                if workflows.is_empty() {
                    println!("No workflows");
                    return Ok(());
                }
                for state in workflows {
                    println!(
                        "{}  {:<11}  {:<13}  {}",
                        state.id,
                        state.status.as_str(),
                        state.current_role,
                        state.title.as_deref().unwrap_or("")
                    );
                }
                Ok(())
            }
            WorkflowCommand::Block { id, reason } => {
                let engine = engine(config, None)?;
                let state = engine.block_workflow(id, reason).await?;
                println!("Workflow {} is {}", state.id, state.status);
                Ok(())
            }
            WorkflowCommand::Resume { id } => {
                let engine = engine(config, None)?;
                let state = engine.resume_workflow(id).await?;
                println!(
                    "Workflow {} is {} at role {}",
                    state.id, state.status, state.current_role
                );
                Ok(())
            }
        }
    }
}

fn engine(config: &Config, options: Option<&ExecutionOptions>) -> anyhow::Result<WorkflowEngine> {
    let executor: Arc<dyn RoleExecutor> = match options {
        Some(options) if !options.dry_run => {
            let workdir = match &options.workdir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            Arc::new(ClaudeExecutor::from_config(&config.agent, workdir))
        }
        _ => Arc::new(DryRunExecutor),
    };
    Ok(WorkflowEngine::from_config(config, executor)?)
}

fn print_state(state: &WorkflowState, verbose: bool) {
    println!("Workflow {}", state.id);
    if let Some(title) = &state.title {
        println!("  title: {}", title);
    }
    if let Some(issue) = &state.issue_id {
        println!("  issue: {}", issue);
    }
    println!("  status: {}", state.status);
    println!("  current role: {}", state.current_role);
    println!("  workspace: {}", state.workspace_id);
    println!(
        "  created: {}",
        state.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(done) = state.completed_at {
        println!("  completed: {}", done.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    if !state.executions.is_empty() {
        println!();
        println!("Executions:");
        for execution in &state.executions {
            println!("  {:<13} {}", execution.role_id, execution.status);
            if let Some(error) = &execution.error {
                println!("    error: {}", error);
            }
            if verbose {
                for deliverable in &execution.deliverables {
                    println!("    - {}", deliverable);
                }
            }
        }
    }

    let handoff = &state.handoff_data;
    if !handoff.pending_tasks.is_empty() {
        println!();
        println!("Pending: {}", handoff.pending_tasks.join(", "));
    }
    if let Some(notes) = &handoff.notes {
        println!("Notes: {}", notes);
    }
}
