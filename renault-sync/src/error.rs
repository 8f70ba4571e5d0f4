//! Error types for renault-sync.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use renault_core::ManifestError;
use renault_detector::DetectError;

/// Failure of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started or its output could not be read.
    #[error("could not run `git {command}` in {cwd}: {source}")]
    Spawn {
        command: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// git ran and exited unsuccessfully; `output` is the combined stdout/stderr.
    #[error("`git {command}` failed ({status}): {output}")]
    Failed {
        command: String,
        status: String,
        output: String,
    },

    /// git did not finish in time and was killed.
    #[error("`git {command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Porcelain v2 text that cannot be turned into a [`RepoStatus`](crate::RepoStatus).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("malformed branch.ab token '{token}' on line {line}")]
    AheadBehind { line: usize, token: String },
}

/// Errors surfaced by the sync engine.
///
/// Per-project failures never show up here; they are reported as
/// [`OutcomeKind`](crate::OutcomeKind) values instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("git error: {0}")]
    Git(#[from] GitError),

    #[error("status parse error: {0}")]
    Parse(#[from] StatusParseError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("discovery error: {0}")]
    Detect(#[from] DetectError),

    #[error("sync concurrency must be at least 1")]
    ZeroConcurrency,
}
