//! `renault project init --name <MODULE>`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use renault_core::Workspace;
use renault_scaffold::{ScaffoldContext, Scaffolder};

/// Create and manage single projects.
#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Scaffold a new Go service skeleton.
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Go module path, e.g. "github.com/acme/payments". The last segment
    /// names the project directory.
    #[arg(long, short = 'n', value_name = "MODULE")]
    pub name: String,
}

pub fn run(cmd: ProjectCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        ProjectCommand::Init(args) => init(args, workspace),
    }
}

fn init(args: InitArgs, workspace: &Workspace) -> Result<()> {
    let ctx = ScaffoldContext::from_module(&args.name);
    let scaffolder = Scaffolder::new().context("failed to load project templates")?;
    let root = scaffolder
        .apply(workspace.root(), &ctx)
        .with_context(|| format!("failed to scaffold project '{}'", args.name))?;

    println!("✓ Created project '{}' ({})", ctx.project_name, ctx.module);
    println!("  Location: {}", root.display());
    Ok(())
}
