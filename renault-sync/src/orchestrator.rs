//! Bounded fan-out of [`RepoSyncWorker`] over every project in a workspace.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use renault_core::config::{SyncSettings, DEFAULT_CONCURRENCY};
use renault_core::{manifest, ManifestError, ManifestStore, Project, ProjectName, Workspace};

use crate::error::SyncError;
use crate::git::GitRunner;
use crate::worker::{OutcomeKind, RepoSyncWorker, SyncOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Maximum number of projects synced at once.
    pub concurrency: usize,
    /// Pull over local changes instead of skipping.
    pub force_pull: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            force_pull: false,
        }
    }
}

impl From<&SyncSettings> for SyncOptions {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            concurrency: settings.concurrency,
            force_pull: settings.force_pull,
        }
    }
}

/// Receives progress while a sync runs. Called from the orchestrating task only.
pub trait SyncReporter {
    fn discovered(&self, _project: &Project) {}
    fn finished(&self, outcome: &SyncOutcome);
}

/// Reporter that drops everything.
pub struct SilentReporter;

impl SyncReporter for SilentReporter {
    fn finished(&self, _outcome: &SyncOutcome) {}
}

/// What happened to the manifest at the end of a run.
#[derive(Debug, Default)]
pub enum ManifestWrite {
    /// No new projects, nothing written.
    #[default]
    Unchanged,
    Saved,
    /// Every project was synced but the save failed.
    Failed(ManifestError),
}

#[derive(Debug, Default)]
pub struct SyncReport {
    /// Outcomes in completion order.
    pub outcomes: Vec<SyncOutcome>,
    /// Local checkouts that were added to the manifest.
    pub discovered: Vec<Project>,
    pub manifest: ManifestWrite,
    /// Tasks that panicked or were cancelled and produced no outcome.
    pub lost: usize,
}

impl SyncReport {
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes.iter().filter(|o| o.kind == kind).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.kind.is_failure()).count() + self.lost
    }
}

/// Syncs every project of one workspace and persists newly found ones.
pub struct WorkspaceSync {
    workspace: Workspace,
    git: Arc<dyn GitRunner>,
    store: Arc<dyn ManifestStore>,
    options: SyncOptions,
}

impl WorkspaceSync {
    pub fn new(
        workspace: Workspace,
        git: Arc<dyn GitRunner>,
        store: Arc<dyn ManifestStore>,
        options: SyncOptions,
    ) -> Result<Self, SyncError> {
        if options.concurrency == 0 {
            return Err(SyncError::ZeroConcurrency);
        }
        Ok(Self {
            workspace,
            git,
            store,
            options,
        })
    }

    /// Sync `projects` plus any unregistered local checkout.
    ///
    /// A repeated or path-like project name aborts the run before any git
    /// command is issued.
    ///
    /// Discovery runs before any task is spawned, so the project list has a
    /// single writer. The manifest is saved at most once, after every task
    /// has finished, and only if discovery grew the list.
    pub async fn sync_all(
        &self,
        mut projects: Vec<Project>,
        reporter: &dyn SyncReporter,
    ) -> Result<SyncReport, SyncError> {
        // One worker per checkout directory.
        manifest::check_projects(&projects)?;
        let known: HashSet<ProjectName> = projects.iter().map(|p| p.name.clone()).collect();
        let discovered = renault_detector::discover(self.workspace.root(), &known)?;
        for project in &discovered {
            tracing::info!(project = %project.name, url = %project.url, "found unregistered checkout");
            reporter.discovered(project);
        }
        projects.extend(discovered.iter().cloned());

        let permits = Arc::new(Semaphore::new(self.options.concurrency));
        let worker = Arc::new(RepoSyncWorker::new(
            self.workspace.clone(),
            Arc::clone(&self.git),
            self.options.force_pull,
        ));

        let mut tasks = JoinSet::new();
        for project in projects.iter().cloned() {
            let permits = Arc::clone(&permits);
            let worker = Arc::clone(&worker);
            tasks.spawn(async move {
                // The semaphore is never closed, so acquire only fails on shutdown.
                let _permit = permits.acquire_owned().await.ok();
                worker.sync(&project).await
            });
        }
        tracing::debug!(
            projects = projects.len(),
            concurrency = self.options.concurrency,
            "sync tasks dispatched"
        );

        let mut report = SyncReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    reporter.finished(&outcome);
                    report.outcomes.push(outcome);
                }
                Err(err) => {
                    tracing::error!(error = %err, "sync task ended without an outcome");
                    report.lost += 1;
                }
            }
        }

        if !discovered.is_empty() {
            report.manifest = match self.store.save(&projects) {
                Ok(()) => ManifestWrite::Saved,
                Err(err) => {
                    tracing::error!(error = %err, "manifest save failed");
                    ManifestWrite::Failed(err)
                }
            };
        }
        report.discovered = discovered;
        Ok(report)
    }
}
