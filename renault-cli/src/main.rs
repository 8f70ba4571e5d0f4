//! Renault: multi-repository workspace and project scaffolding CLI.
//!
//! # Usage
//!
//! ```text
//! renault [--workspace <PATH>] project init --name <MODULE>
//! renault [--workspace <PATH>] workspace init
//! renault [--workspace <PATH>] workspace add --url <URL> [--name <NAME>]
//! renault [--workspace <PATH>] workspace list [--json]
//! renault [--workspace <PATH>] workspace sync [--force] [--concurrency N] [--timeout SECS]
//! ```

mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{project::ProjectCommand, workspace::WorkspaceCommand};
use renault_core::Workspace;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "renault",
    version,
    about = "Scaffold projects and keep a workspace of git checkouts in sync",
    long_about = None,
)]
struct Cli {
    /// Workspace root used for every path. Defaults to the current directory.
    #[arg(long, short = 'w', global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create new projects from templates.
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Register and synchronize the workspace's git checkouts.
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir().context("could not determine current directory")?,
    };
    let workspace = Workspace::new(root);
    tracing::debug!(root = %workspace.root().display(), "workspace resolved");

    match cli.command {
        Commands::Project { command } => commands::project::run(command, &workspace),
        Commands::Workspace { command } => commands::workspace::run(command, &workspace),
    }
}

/// stderr only, so stdout carries nothing but report lines.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
