//! Process boundary to the `git` executable.
//!
//! Everything above this module talks to git through [`GitRunner`], so the
//! worker and orchestrator can be driven by a scripted fake in tests.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::GitError;

/// Captured output of a successful git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stdout: text.into(),
            stderr: String::new(),
        }
    }

    /// stdout followed by stderr, the way a terminal would show them.
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` with `cwd` as the working directory.
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, GitError>;
}

/// Runs the real git binary with a per-invocation time limit.
#[derive(Debug, Clone)]
pub struct ProcessGit {
    program: PathBuf,
    timeout: Duration,
}

impl ProcessGit {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("git", timeout)
    }

    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl GitRunner for ProcessGit {
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
        let command = args.join(" ");
        tracing::debug!(cwd = %cwd.display(), command = %command, "running git");

        // kill_on_drop: when the timeout drops the wait future, the child dies with it.
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own group, so remote helpers and ssh die with git on timeout.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|source| GitError::Spawn {
            command: command.clone(),
            cwd: cwd.to_path_buf(),
            source,
        })?;
        let pid = child.id();

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| GitError::Spawn {
                command: command.clone(),
                cwd: cwd.to_path_buf(),
                source,
            })?,
            Err(_) => {
                if let Some(pid) = pid {
                    kill_group(pid);
                }
                tracing::warn!(cwd = %cwd.display(), command = %command, "git timed out, killed");
                return Err(GitError::Timeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        let captured = GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if output.status.success() {
            Ok(captured)
        } else {
            Err(GitError::Failed {
                command,
                status: output.status.to_string(),
                output: captured.combined(),
            })
        }
    }
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: killpg takes no pointers; a stale group id only yields ESRCH.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(pgid, error = %std::io::Error::last_os_error(), "killpg failed");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}
