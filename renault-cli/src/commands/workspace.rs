//! `renault workspace init|add|list|sync`

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use renault_core::{
    manifest::{self, ManifestStore},
    Workspace, WorkspaceConfig, YamlManifest,
};
use renault_sync::{
    ManifestWrite, ProcessGit, SyncOptions, SyncOutcome, SyncReporter, WorkspaceSync,
};

use crate::render;

/// Manage the multi-project workspace rooted at `--workspace`.
#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// Create `.renault/` and register every checkout already in the root.
    Init,

    /// Register a project by remote URL. It is cloned on the next sync.
    Add(AddArgs),

    /// List registered projects.
    List(ListArgs),

    /// Clone missing projects and pull the rest, in parallel.
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Remote URL, e.g. "git@github.com:acme/api.git".
    #[arg(long, short = 'u')]
    pub url: String,

    /// Project name. Defaults to the last URL segment without `.git`.
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Pull even over local commits, staged or unstaged changes, and untracked files.
    #[arg(long)]
    pub force: bool,

    /// Number of projects synced at once [config: sync.concurrency].
    #[arg(long, short = 'c', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Seconds allowed per git command [config: sync.timeout_secs].
    #[arg(long, short = 't', value_name = "SECS")]
    pub timeout: Option<u64>,
}

pub fn run(cmd: WorkspaceCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        WorkspaceCommand::Init => init(workspace),
        WorkspaceCommand::Add(args) => add(args, workspace),
        WorkspaceCommand::List(args) => list(args, workspace),
        WorkspaceCommand::Sync(args) => sync(args, workspace),
    }
}

// ---------------------------------------------------------------------------
// init / add
// ---------------------------------------------------------------------------

fn init(workspace: &Workspace) -> Result<()> {
    if workspace.is_initialized() {
        println!("Workspace already exists.");
        return Ok(());
    }

    let found = renault_detector::discover(workspace.root(), &HashSet::new())
        .with_context(|| format!("failed to scan '{}'", workspace.root().display()))?;
    let projects = manifest::init(workspace, found).context("failed to create workspace")?;

    for project in &projects {
        println!("  + {} ({})", project.name, project.url);
    }
    println!(
        "✓ Workspace initialized with {} project(s) at {}",
        projects.len(),
        workspace.manifest_path().display()
    );
    Ok(())
}

fn add(args: AddArgs, workspace: &Workspace) -> Result<()> {
    let project = manifest::add(workspace, &args.url, args.name.as_deref())
        .with_context(|| format!("failed to add '{}'", args.url))?;
    println!("✓ Added '{}' ({})", project.name, project.url);
    println!("  Run `renault workspace sync` to clone it.");
    Ok(())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[derive(Serialize, Tabled)]
struct ProjectRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "url")]
    url: String,
    #[tabled(rename = "cloned")]
    cloned: bool,
}

fn list(args: ListArgs, workspace: &Workspace) -> Result<()> {
    manifest::require_initialized(workspace).context("run `renault workspace init` first")?;
    let projects = YamlManifest::for_workspace(workspace)
        .load()
        .context("failed to load workspace manifest")?;

    let rows: Vec<ProjectRow> = projects
        .into_iter()
        .map(|p| ProjectRow {
            cloned: workspace.project_dir(&p.name).is_dir(),
            name: p.name.to_string(),
            url: p.url,
        })
        .collect();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("failed to serialize project list")?
        );
        return Ok(());
    }

    if rows.is_empty() {
        println!("No projects registered.");
        println!("Run: renault workspace add --url <URL>");
        return Ok(());
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

struct ConsoleReporter;

impl SyncReporter for ConsoleReporter {
    fn discovered(&self, project: &renault_core::Project) {
        println!("[{}] found unregistered checkout ({})", project.name, project.url);
    }

    fn finished(&self, outcome: &SyncOutcome) {
        for line in render::outcome_lines(outcome) {
            println!("{line}");
        }
    }
}

fn sync(args: SyncArgs, workspace: &Workspace) -> Result<()> {
    manifest::require_initialized(workspace).context("run `renault workspace init` first")?;

    let mut settings = WorkspaceConfig::load(workspace)
        .context("failed to load workspace config")?
        .sync;
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }
    settings.force_pull |= args.force;
    settings.validate().context("invalid sync settings")?;
    tracing::debug!(?settings, "sync settings");

    let store = Arc::new(YamlManifest::for_workspace(workspace));
    let projects = store.load().context("failed to load workspace manifest")?;
    let engine = WorkspaceSync::new(
        workspace.clone(),
        Arc::new(ProcessGit::new(settings.timeout())),
        store,
        SyncOptions::from(&settings),
    )?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime
        .block_on(engine.sync_all(projects, &ConsoleReporter))
        .context("workspace sync failed")?;

    println!("{}", render::tally_line(&report));
    match report.manifest {
        ManifestWrite::Failed(err) => {
            Err(anyhow!(err).context("failed to save workspace manifest"))
        }
        ManifestWrite::Saved => {
            println!("✓ Registered {} new project(s).", report.discovered.len());
            Ok(())
        }
        ManifestWrite::Unchanged => Ok(()),
    }
}
