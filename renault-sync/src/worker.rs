//! Per-project clone-or-pull state machine.
//!
//! ```text
//! absent  -> clone -> Cloned | CloneFailed
//! present -> fetch, status, describe -> UpToDate
//!                                     | PullSkipped
//!                                     | pull -> Pulled | PullFailed
//!         (any inspect failure)      -> StatusFailed
//! ```

use std::path::Path;
use std::sync::Arc;

use renault_core::{Project, ProjectName, Workspace};

use crate::error::{GitError, SyncError};
use crate::git::GitRunner;
use crate::parser::parse_porcelain_v2;
use crate::status::{RepoStatus, TagLookup};

const MERGE_MARKER: &str = "MERGE_HEAD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Cloned,
    UpToDate,
    Pulled,
    PullSkipped,
    CloneFailed,
    PullFailed,
    StatusFailed,
}

impl OutcomeKind {
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            OutcomeKind::CloneFailed | OutcomeKind::PullFailed | OutcomeKind::StatusFailed
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::Cloned => "cloned",
            OutcomeKind::UpToDate => "up-to-date",
            OutcomeKind::Pulled => "pulled",
            OutcomeKind::PullSkipped => "pull-skipped",
            OutcomeKind::CloneFailed => "clone-failed",
            OutcomeKind::PullFailed => "pull-failed",
            OutcomeKind::StatusFailed => "status-failed",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened to one project during a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub project: ProjectName,
    pub kind: OutcomeKind,
    /// Latest status, when one was taken. After a pull this is the post-pull status.
    pub status: Option<RepoStatus>,
    /// Error text for failures, refusal reason for skipped pulls.
    pub detail: Option<String>,
    /// Raw git output of a clone or pull.
    pub output: String,
    pub warnings: Vec<String>,
}

impl SyncOutcome {
    fn new(project: &Project, kind: OutcomeKind) -> Self {
        Self {
            project: project.name.clone(),
            kind,
            status: None,
            detail: None,
            output: String::new(),
            warnings: Vec::new(),
        }
    }

    fn with_status(mut self, status: RepoStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_output(mut self, output: String) -> Self {
        self.output = output;
        self
    }
}

/// Brings one project checkout in line with its remote.
pub struct RepoSyncWorker {
    workspace: Workspace,
    git: Arc<dyn GitRunner>,
    force_pull: bool,
}

impl RepoSyncWorker {
    pub fn new(workspace: Workspace, git: Arc<dyn GitRunner>, force_pull: bool) -> Self {
        Self {
            workspace,
            git,
            force_pull,
        }
    }

    /// Sync one project. Never fails; every error becomes an outcome.
    pub async fn sync(&self, project: &Project) -> SyncOutcome {
        let dir = self.workspace.project_dir(&project.name);
        if !dir.exists() {
            return self.clone_project(project).await;
        }

        let warnings = self.check_remote(project, &dir);
        let mut outcome = self.update_project(project, &dir).await;
        outcome.warnings = warnings;
        outcome
    }

    async fn clone_project(&self, project: &Project) -> SyncOutcome {
        let args = ["clone", "--", project.url.as_str(), project.name.as_str()];
        match self.git.run(self.workspace.root(), &args).await {
            Ok(out) => {
                tracing::info!(project = %project.name, "cloned");
                SyncOutcome::new(project, OutcomeKind::Cloned).with_output(out.combined())
            }
            Err(err) => {
                tracing::error!(project = %project.name, error = %err, "clone failed");
                SyncOutcome::new(project, OutcomeKind::CloneFailed).with_detail(err.to_string())
            }
        }
    }

    async fn update_project(&self, project: &Project, dir: &Path) -> SyncOutcome {
        let status = match self.inspect(dir).await {
            Ok(status) => status,
            Err(err) => {
                tracing::error!(project = %project.name, error = %err, "status failed");
                return SyncOutcome::new(project, OutcomeKind::StatusFailed)
                    .with_detail(err.to_string());
            }
        };

        if !status.can_pull(self.force_pull) {
            return match status.pull_blocker().filter(|_| status.behind > 0) {
                Some(blocker) => {
                    tracing::info!(project = %project.name, reason = %blocker, "pull skipped");
                    SyncOutcome::new(project, OutcomeKind::PullSkipped)
                        .with_detail(blocker.to_string())
                        .with_status(status)
                }
                None => SyncOutcome::new(project, OutcomeKind::UpToDate).with_status(status),
            };
        }

        let pulled = match self.git.run(dir, &["pull"]).await {
            Ok(out) => out.combined(),
            Err(err) => {
                tracing::error!(project = %project.name, error = %err, "pull failed");
                return SyncOutcome::new(project, OutcomeKind::PullFailed)
                    .with_detail(err.to_string())
                    .with_status(status);
            }
        };
        tracing::info!(project = %project.name, behind = status.behind, "pulled");

        let outcome = SyncOutcome::new(project, OutcomeKind::Pulled).with_output(pulled);
        match self.inspect(dir).await {
            Ok(mut fresh) => {
                fresh.new_pull = true;
                outcome.with_status(fresh)
            }
            Err(err) => {
                tracing::warn!(project = %project.name, error = %err, "post-pull status failed");
                outcome.with_detail(format!("post-pull status unavailable: {err}"))
            }
        }
    }

    /// fetch, status, describe, then probe for an in-progress merge.
    pub async fn inspect(&self, dir: &Path) -> Result<RepoStatus, SyncError> {
        self.git.run(dir, &["fetch"]).await?;
        let raw = self
            .git
            .run(dir, &["status", "--porcelain=v2", "--branch"])
            .await?;
        let mut status = parse_porcelain_v2(&raw.stdout)?;
        status.tag = self.describe(dir).await;
        status.merge_in_progress = self.merge_in_progress(dir).await;
        Ok(status)
    }

    async fn describe(&self, dir: &Path) -> TagLookup {
        match self.git.run(dir, &["describe", "--tags"]).await {
            Ok(out) => match out.stdout.trim() {
                "" => TagLookup::Untagged,
                tag => TagLookup::Tagged(tag.to_string()),
            },
            Err(GitError::Failed { output, .. })
                if output.contains("No names found") || output.contains("No tags can describe") =>
            {
                TagLookup::Untagged
            }
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "describe unavailable");
                TagLookup::Unavailable(err.to_string())
            }
        }
    }

    async fn merge_in_progress(&self, dir: &Path) -> bool {
        match self.git.run(dir, &["rev-parse", "--absolute-git-dir"]).await {
            Ok(out) => match out.stdout.trim() {
                "" => false,
                git_dir => Path::new(git_dir).join(MERGE_MARKER).is_file(),
            },
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "cannot locate git dir");
                false
            }
        }
    }

    fn check_remote(&self, project: &Project, dir: &Path) -> Vec<String> {
        let warning = match renault_detector::remote_url(dir) {
            Ok(Some(url)) if url == project.url => return Vec::new(),
            Ok(Some(url)) => format!(
                "local remote url {url} does not match the manifest url {}",
                project.url
            ),
            Ok(None) => "no remote url configured in .git/config".to_string(),
            Err(err) => format!("cannot read local remote url: {err}"),
        };
        tracing::warn!(project = %project.name, "{warning}");
        vec![warning]
    }
}
