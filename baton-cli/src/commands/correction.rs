//! Correction commands

use baton_core::correction::{
    format_warnings_as_context, CorrectionContext, CorrectionStore, NewCorrection, Severity,
    WarningContext,
};
use baton_core::Config;
use clap::{Args, Subcommand};

/// Correction commands
#[derive(Args, Debug)]
pub struct CorrectionArgs {
    #[command(subcommand)]
    pub command: CorrectionCommand,
}

#[derive(Subcommand, Debug)]
pub enum CorrectionCommand {
    /// Remember a mistake and its fix
    Add {
        /// What was done wrong
        wrong: String,

        /// What should have been done
        correct: String,

        /// Word that should trigger the warning (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// File path fragment involved (repeatable)
        #[arg(short, long = "file")]
        files: Vec<String>,

        /// Technology involved (repeatable)
        #[arg(short, long = "tech")]
        tech: Vec<String>,

        /// Workflow phase it happened in (repeatable)
        #[arg(short, long = "phase")]
        phases: Vec<String>,

        /// minor, moderate or critical
        #[arg(short, long)]
        severity: Option<Severity>,

        /// Workflow the mistake came from
        #[arg(short, long)]
        workflow: Option<String>,
    },

    /// Show corrections relevant to a task
    Warn {
        /// Task description
        task: String,

        /// File about to be touched (repeatable)
        #[arg(short, long = "file")]
        files: Vec<String>,

        /// Technology in use (repeatable)
        #[arg(short, long = "tech")]
        tech: Vec<String>,

        /// Current phase
        #[arg(short, long)]
        phase: Option<String>,

        /// Print the markdown block handed to roles
        #[arg(long)]
        markdown: bool,
    },

    /// List corrections, newest first
    List,

    /// Delete a correction
    Remove {
        /// Correction id
        id: String,
    },
}

impl CorrectionArgs {
    /// Execute the correction command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let store = CorrectionStore::new(config.storage.corrections_dir());

        match &self.command {
            CorrectionCommand::Add {
                wrong,
                correct,
                keywords,
                files,
                tech,
                phases,
                severity,
                workflow,
            } => {
                let correction = NewCorrection {
                    wrong_behavior: wrong.clone(),
                    correct_behavior: correct.clone(),
                    context: CorrectionContext {
                        file_patterns: files.clone(),
                        tech_stack: tech.clone(),
                        trigger_keywords: keywords.clone(),
                        phases: phases.clone(),
                    },
                    severity: *severity,
                    workflow_ids: workflow.iter().cloned().collect(),
                };
                let id = store.record(correction).await?;
                println!("Recorded correction {}", id);
                if verbose {
                    let saved = store.get(&id).await?;
                    println!("  severity: {}", saved.severity);
                    println!("  tags: {}", saved.tags.join(", "));
                }
                Ok(())
            }
            CorrectionCommand::Warn {
                task,
                files,
                tech,
                phase,
                markdown,
            } => {
                let context = WarningContext {
                    task_description: task.clone(),
                    files: files.clone(),
                    tech_stack: tech.clone(),
                    phase: phase.clone(),
                };
                let warnings = store.warnings(&context).await?;

                if warnings.is_empty() {
                    println!("No relevant corrections");
                    return Ok(());
                }
                if *markdown {
                    print!("{}", format_warnings_as_context(&warnings));
                    return Ok(());
                }
                for warning in warnings {
                    let c = &warning.correction;
                    println!(
                        "[{}] {:.0}%  {}",
                        c.severity,
                        warning.confidence * 100.0,
                        c.id
                    );
                    println!("  wrong:   {}", c.wrong_behavior);
                    println!("  correct: {}", c.correct_behavior);
                    println!("  matched: {}", warning.reason);
                }
                Ok(())
            }
            CorrectionCommand::List => {
                let entries = store.list().await?;
                if entries.is_empty() {
                    println!("No corrections");
                    return Ok(());
                }
                for entry in entries {
                    println!(
                        "{}  {:<8}  {}  {}",
                        entry.id,
                        entry.severity.name(),
                        entry.created_at.format("%Y-%m-%d"),
                        entry.wrong_behavior
                    );
                }
                Ok(())
            }
            CorrectionCommand::Remove { id } => {
                store.delete(id).await?;
                println!("Removed correction {}", id);
                Ok(())
            }
        }
    }
}
