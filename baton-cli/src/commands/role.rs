//! Role commands

use baton_core::role::{RoleCatalog, RoleSelector, Task};
use baton_core::Config;
use clap::{Args, Subcommand};

/// Role commands
#[derive(Args, Debug)]
pub struct RoleArgs {
    #[command(subcommand)]
    pub command: RoleCommand,
}

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// List roles in the catalog
    List,

    /// Pick the best role for a task
    Select {
        /// Task description
        description: String,

        /// Keywords to match instead of ones derived from the description
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
    },

    /// Show the top role recommendations for a task
    Recommend {
        /// Task description
        description: String,
    },
}

impl RoleArgs {
    /// Execute the role command
    pub fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let catalog = match &config.roles.catalog {
            Some(path) => RoleCatalog::load_from_file(path)?,
            None => RoleCatalog::builtin(),
        };

        match &self.command {
            RoleCommand::List => {
                for role in catalog.iter() {
                    println!("{:<20} p{:<2}  {}", role.name, role.priority, role.description);
                    if verbose {
                        println!("    keywords: {}", role.discovery_keywords.join(", "));
                        println!("    capabilities: {}", role.capabilities.join(", "));
                    }
                }
                Ok(())
            }
            RoleCommand::Select {
                description,
                keywords,
            } => {
                let mut task = Task::new(description);
                if !keywords.is_empty() {
                    let keywords: Vec<&str> = keywords.iter().map(String::as_str).collect();
                    task = task.with_keywords(&keywords);
                }

                let selector = RoleSelector::new(catalog);
                if verbose {
                    for score in selector.score_candidates(&task) {
                        println!("  {:<20} {:.3}  {}", score.role.name, score.total, score.reason());
                    }
                }
                let role = selector.select_optimal_role(&task);
                println!("{}", role.name);
                Ok(())
            }
            RoleCommand::Recommend { description } => {
                let selector = RoleSelector::new(catalog);
                let recommendations = selector.recommendations(&Task::new(description));
                if recommendations.is_empty() {
                    println!("No matching roles; the fallback role would be used");
                    return Ok(());
                }
                for (i, rec) in recommendations.iter().enumerate() {
                    println!(
                        "{}. {} ({:.0}%)  {}",
                        i + 1,
                        rec.role.name,
                        rec.confidence * 100.0,
                        rec.reason
                    );
                }
                Ok(())
            }
        }
    }
}
