//! # renault-sync
//!
//! Git status model and the concurrent workspace sync engine.
//!
//! [`parse_porcelain_v2`] turns `git status --porcelain=v2 --branch` output
//! into a [`RepoStatus`]. [`RepoSyncWorker`] clones or pulls a single
//! project, and [`WorkspaceSync`] runs one worker per project on a bounded
//! pool, then saves the manifest once if new checkouts were found.

pub mod error;
pub mod git;
pub mod orchestrator;
pub mod parser;
pub mod status;
pub mod worker;

pub use error::{GitError, StatusParseError, SyncError};
pub use git::{GitOutput, GitRunner, ProcessGit};
pub use orchestrator::{
    ManifestWrite, SilentReporter, SyncOptions, SyncReport, SyncReporter, WorkspaceSync,
};
pub use parser::parse_porcelain_v2;
pub use status::{ChangeTally, PullBlocker, RepoStatus, TagLookup};
pub use worker::{OutcomeKind, RepoSyncWorker, SyncOutcome};
