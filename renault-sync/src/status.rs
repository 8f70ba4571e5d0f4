//! Parsed repository state and the pull/push predicates derived from it.

/// Per-area change counts, one bucket per porcelain change code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeTally {
    pub modified: u32,
    pub added: u32,
    pub deleted: u32,
    pub renamed: u32,
    pub copied: u32,
}

impl ChangeTally {
    pub fn has_changes(&self) -> bool {
        *self != ChangeTally::default()
    }

    /// Count one file under `code`. Codes outside `MADRC` are ignored.
    pub(crate) fn record(&mut self, code: char) {
        match code {
            'M' => self.modified += 1,
            'A' => self.added += 1,
            'D' => self.deleted += 1,
            'R' => self.renamed += 1,
            'C' => self.copied += 1,
            _ => {}
        }
    }
}

/// Result of the best-effort `git describe --tags` step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagLookup {
    /// Most recent reachable tag.
    Tagged(String),
    /// Describe ran and found no tag (or has not run yet).
    #[default]
    Untagged,
    /// Describe itself failed; the reason is kept for inspection.
    Unavailable(String),
}

impl TagLookup {
    pub fn name(&self) -> Option<&str> {
        match self {
            TagLookup::Tagged(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Why a non-forced pull was refused while the branch is behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullBlocker {
    Ahead,
    Staged,
    Untracked,
    Unstaged,
}

impl std::fmt::Display for PullBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            PullBlocker::Ahead => "local commits not on upstream",
            PullBlocker::Staged => "staged changes",
            PullBlocker::Untracked => "untracked files",
            PullBlocker::Unstaged => "unstaged changes",
        };
        f.write_str(reason)
    }
}

/// State of one checkout, built fresh by every status query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch: String,
    pub commit: String,
    pub upstream: String,
    pub ahead: u32,
    pub behind: u32,
    pub untracked: u32,
    pub unmerged: u32,
    pub staged: ChangeTally,
    pub unstaged: ChangeTally,
    pub tag: TagLookup,
    /// Set only on the status taken right after a successful pull.
    pub new_pull: bool,
    /// `MERGE_HEAD` was present in the git dir when status was taken.
    pub merge_in_progress: bool,
}

impl RepoStatus {
    /// The index holds changes that are not committed.
    pub fn is_dirty(&self) -> bool {
        self.staged.has_changes()
    }

    pub fn has_unstaged_changes(&self) -> bool {
        self.unstaged.has_changes()
    }

    pub fn has_unmerged_conflicts(&self) -> bool {
        self.unmerged > 0 || self.merge_in_progress
    }

    /// First reason a non-forced pull is refused, checked in a fixed order.
    pub fn pull_blocker(&self) -> Option<PullBlocker> {
        if self.ahead > 0 {
            Some(PullBlocker::Ahead)
        } else if self.is_dirty() {
            Some(PullBlocker::Staged)
        } else if self.untracked > 0 {
            Some(PullBlocker::Untracked)
        } else if self.has_unstaged_changes() {
            Some(PullBlocker::Unstaged)
        } else {
            None
        }
    }

    /// Behind upstream, and either forced or a clean fast-forward.
    pub fn can_pull(&self, force: bool) -> bool {
        if self.behind == 0 {
            return false;
        }
        force || self.pull_blocker().is_none()
    }

    /// Ahead of upstream, and either forced or not behind with a clean index.
    pub fn can_push(&self, force: bool) -> bool {
        if self.ahead == 0 {
            return false;
        }
        force || (self.behind == 0 && !self.is_dirty())
    }
}
