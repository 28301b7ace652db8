//! Checkpoint commands

use std::sync::Arc;

use baton_core::checkpoint::{Checkpoint, CheckpointStore, FileProgress, NewCheckpoint};
use baton_core::git::RepoGitInfo;
use baton_core::Config;
use chrono::{Duration, Utc};
use clap::{Args, Subcommand};

/// Checkpoint commands
#[derive(Args, Debug)]
pub struct CheckpointArgs {
    #[command(subcommand)]
    pub command: CheckpointCommand,
}

#[derive(Subcommand, Debug)]
pub enum CheckpointCommand {
    /// Save a checkpoint of the current task
    Save {
        /// What the task is
        task: String,

        /// Finished file, as `path` or `path:description` (repeatable)
        #[arg(long = "done")]
        completed: Vec<String>,

        /// File still to do, as `path` or `path:description` (repeatable)
        #[arg(long = "todo")]
        pending: Vec<String>,

        /// Free-text context to carry over
        #[arg(short, long, default_value = "")]
        context: String,

        /// Where to pick up
        #[arg(short, long, default_value = "")]
        next_step: String,

        /// Workflow this checkpoint belongs to
        #[arg(short, long)]
        workflow: Option<String>,

        /// Skip git metadata
        #[arg(long)]
        no_git: bool,
    },

    /// Resume a checkpoint (the latest if no id is given)
    Resume {
        /// Checkpoint id
        id: Option<String>,
    },

    /// List checkpoints, newest first
    List {
        /// Maximum number to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Delete one checkpoint, or all with --all
    Clear {
        /// Checkpoint id
        id: Option<String>,

        /// Delete every checkpoint
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },

    /// Keep only the newest checkpoints
    Prune {
        /// How many to keep
        #[arg(short, long, default_value = "5")]
        keep: usize,
    },
}

impl CheckpointArgs {
    /// Execute the checkpoint command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let store = CheckpointStore::new(config.storage.checkpoints_dir())
            .with_probe_timeout(config.git.probe_timeout);

        match &self.command {
            CheckpointCommand::Save {
                task,
                completed,
                pending,
                context,
                next_step,
                workflow,
                no_git,
            } => {
                let store = if *no_git {
                    store
                } else {
                    store.with_git(Arc::new(RepoGitInfo::new(std::env::current_dir()?)))
                };

                let mut request = NewCheckpoint::new(task)
                    .with_completed(completed.iter().map(|s| parse_file(s, true)).collect())
                    .with_pending(pending.iter().map(|s| parse_file(s, false)).collect())
                    .with_context(context)
                    .with_next_step(next_step);
                if let Some(workflow) = workflow {
                    request = request.with_workflow(workflow);
                }

                let id = store.save(request).await?;
                println!("Saved checkpoint {}", id);
                if verbose {
                    print_checkpoint(&store.get(&id).await?);
                }
                Ok(())
            }
            CheckpointCommand::Resume { id } => {
                let checkpoint = store.resume(id.as_deref()).await?;
                print_checkpoint(&checkpoint);
                Ok(())
            }
            CheckpointCommand::List { limit } => {
                let checkpoints = store.list(*limit).await?;
                if checkpoints.is_empty() {
                    println!("No checkpoints");
                    return Ok(());
                }
                let now = Utc::now();
                for cp in checkpoints {
                    println!(
                        "{} {} {:>3.0}%  {:>8}  {}",
                        cp.id,
                        if cp.is_active { "*" } else { " " },
                        cp.progress() * 100.0,
                        format_age(now - cp.checkpoint),
                        cp.task_description
                    );
                }
                Ok(())
            }
            CheckpointCommand::Clear { id, all } => {
                if id.is_none() && !*all {
                    anyhow::bail!("Specify a checkpoint id or --all");
                }
                let removed = store.clear(id.as_deref()).await?;
                match id {
                    Some(id) if removed == 0 => println!("Checkpoint not found: {}", id),
                    _ => println!("Removed {} checkpoint(s)", removed),
                }
                Ok(())
            }
            CheckpointCommand::Prune { keep } => {
                let removed = store.prune(*keep).await?;
                println!("Pruned {} checkpoint(s)", removed);
                Ok(())
            }
        }
    }
}

/// Parse `path` or `path:description`
fn parse_file(arg: &str, done: bool) -> FileProgress {
    let (path, description) = arg.split_once(':').unwrap_or((arg, ""));
    if done {
        FileProgress::completed(path.trim(), description.trim())
    } else {
        FileProgress::pending(path.trim(), description.trim())
    }
}

/// Compact age such as `5m ago`
fn format_age(age: Duration) -> String {
    if age.num_days() > 0 {
        format!("{}d ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m ago", age.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn print_checkpoint(cp: &Checkpoint) {
    println!("Checkpoint {}", cp.id);
    println!("  task: {}", cp.task_description);
    println!("  saved: {}", cp.checkpoint.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  progress: {}/{} files",
        cp.completed.len(),
        cp.completed.len() + cp.pending.len()
    );
    if let Some(workflow) = &cp.workflow_id {
        println!("  workflow: {}", workflow);
    }
    if let Some(branch) = &cp.metadata.branch {
        println!("  branch: {}", branch);
    }
    if let Some(commit) = &cp.metadata.last_commit {
        println!("  commit: {}", commit);
    }

    if !cp.completed.is_empty() {
        println!();
        println!("Done:");
        for file in &cp.completed {
            print_file(file);
        }
    }
    if !cp.pending.is_empty() {
        println!();
        println!("To do:");
        for file in &cp.pending {
            print_file(file);
        }
    }
    if !cp.context.is_empty() {
        println!();
        println!("Context:");
        println!("{}", cp.context);
    }
    if !cp.next_step.is_empty() {
        println!();
        println!("Next step: {}", cp.next_step);
    }
}

fn print_file(file: &FileProgress) {
    if file.description.is_empty() {
        println!("  - {}", file.path);
    } else {
        println!("  - {}: {}", file.path, file.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file() {
        let done = parse_file("src/auth.rs: add login", true);
        assert_eq!(done.path, "src/auth.rs");
        assert_eq!(done.description, "add login");
        assert_eq!(done.status, baton_core::checkpoint::FileStatus::Completed);

        let todo = parse_file("README.md", false);
        assert_eq!(todo.path, "README.md");
        assert!(todo.description.is_empty());
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(10)), "just now");
        assert_eq!(format_age(Duration::minutes(5)), "5m ago");
        assert_eq!(format_age(Duration::hours(3)), "3h ago");
        assert_eq!(format_age(Duration::days(2)), "2d ago");
    }
}
