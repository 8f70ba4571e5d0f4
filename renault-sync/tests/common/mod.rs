//! Scripted git runner and in-memory manifest store shared by the sync tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use renault_core::{ManifestError, ManifestStore, Project};
use renault_sync::{GitError, GitOutput, GitRunner};

type Reply = Result<String, String>;

/// Answers `git <args>` per (directory name, args) from a script.
/// Unscripted calls succeed with empty stdout.
#[derive(Default)]
pub struct FakeGit {
    replies: HashMap<(String, String), Reply>,
    calls: Mutex<Vec<(String, String)>>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, dir: &str, args: &str, stdout: &str) -> Self {
        self.replies
            .insert((dir.to_string(), args.to_string()), Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, dir: &str, args: &str, output: &str) -> Self {
        self.replies
            .insert((dir.to_string(), args.to_string()), Err(output.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, dir: &str, args: &str) -> bool {
        self.calls()
            .iter()
            .any(|(d, a)| d == dir && a == args)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitRunner for FakeGit {
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
        let dir = cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let command = args.join(" ");
        self.calls.lock().unwrap().push((dir.clone(), command.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(&(dir, command.clone())) {
            Some(Ok(stdout)) => Ok(GitOutput::stdout(stdout.clone())),
            Some(Err(output)) => Err(GitError::Failed {
                command,
                status: "exit status: 1".to_string(),
                output: output.clone(),
            }),
            None => Ok(GitOutput::default()),
        }
    }
}

/// Manifest store that keeps the last saved list and counts saves.
#[derive(Default)]
pub struct CountingStore {
    saved: Mutex<Option<Vec<Project>>>,
    saves: AtomicUsize,
    fail: bool,
}

impl CountingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Option<Vec<Project>> {
        self.saved.lock().unwrap().clone()
    }
}

impl ManifestStore for CountingStore {
    fn load(&self) -> Result<Vec<Project>, ManifestError> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, projects: &[Project]) -> Result<(), ManifestError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ManifestError::InvalidConfig("disk full".to_string()));
        }
        *self.saved.lock().unwrap() = Some(projects.to_vec());
        Ok(())
    }
}

/// `<root>/<dir>/.git/config` with an origin remote.
pub fn make_checkout(root: &Path, dir: &str, url: &str) {
    let git = root.join(dir).join(".git");
    fs::create_dir_all(&git).expect("mkdir .git");
    fs::write(
        git.join("config"),
        format!("[remote \"origin\"]\n\turl = {url}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n"),
    )
    .expect("write config");
}

pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub const STATUS: &str = "status --porcelain=v2 --branch";
