//! Baton CLI - Command line interface for Baton
//!
//! Role-based workflow orchestration, checkpoints and remembered corrections
//! for AI-assisted development.

mod commands;

use std::path::PathBuf;

use baton_core::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CheckpointArgs, CorrectionArgs, RoleArgs, WorkflowArgs};

/// Baton: hand a task from role to role without losing the thread
#[derive(Parser, Debug)]
#[command(name = "baton")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Storage root for workflows, checkpoints and corrections
    #[arg(long, global = true, env = "BATON_HOME")]
    home: Option<PathBuf>,

    /// Path to claude executable (overrides config and env)
    #[arg(long, global = true, env = "BATON_CLAUDE_PATH")]
    claude_path: Option<String>,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "BATON_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Create and run role workflows
    #[command(visible_alias = "wf")]
    Workflow(WorkflowArgs),

    /// Save and resume task checkpoints
    #[command(visible_alias = "cp")]
    Checkpoint(CheckpointArgs),

    /// Record corrections and check for warnings
    Correction(CorrectionArgs),

    /// Inspect roles and role selection
    Role(RoleArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(
        cli.home.clone(),
        cli.claude_path.clone(),
        cli.model.clone(),
    )?;

    if cli.verbose {
        tracing::info!(
            claude_path = %config.agent.claude_path,
            model = ?config.agent.model,
            storage = %config.storage.root_dir().display(),
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("baton {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Workflow(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Checkpoint(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Correction(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Role(args)) => {
            args.execute(cli.verbose, &config)?;
        }
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("Baton - role-based workflow orchestration");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("Baton Configuration");
    println!("===================");
    println!();
    println!("Agent Settings:");
    println!("  claude_path: {}", config.agent.claude_path);
    println!(
        "  model: {}",
        config.agent.model.as_deref().unwrap_or("(default)")
    );
    println!();
    println!("Storage:");
    println!("  root: {}", config.storage.root_dir().display());
    println!();
    println!("Git:");
    println!("  probe_timeout: {:?}", config.git.probe_timeout);
    println!();
    println!("Workflow:");
    println!("  sequence: {}", config.workflow.sequence.join(" -> "));
    println!(
        "  role catalog: {}",
        config
            .roles
            .catalog
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string())
    );
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
