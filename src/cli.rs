//! CLI argument parsing for sequent.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sequent",
    about = "Dependency-aware task labeling for Todoist",
    version,
    after_help = "Requires TODOIST_ACCESS_TOKEN in the environment.\n\
                  Logs are written to: ~/.local/share/sequent/logs/sequent.log"
)]
pub struct Cli {
    /// Marker label to manage
    #[arg(short, long, default_value = sequent::DEFAULT_LABEL, global = true)]
    pub label: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the webhook server in the foreground
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Reconcile marker state across the whole inventory
    Sweep,

    /// Reconcile a single task by id
    Check {
        /// Task ID
        id: String,
    },
}
