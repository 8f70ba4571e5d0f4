//! Workspace discovery tests for `renault-detector`.
//!
//! Each test gets an isolated `TempDir`: no shared state, no git binary.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use renault_core::ProjectName;
use renault_detector::{discover, remote_url};
use rstest::rstest;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_checkout(root: &Path, dir: &str, url: &str) {
    let git = root.join(dir).join(".git");
    fs::create_dir_all(&git).expect("mkdir .git");
    fs::write(
        git.join("config"),
        format!(
            "[core]\n\trepositoryformatversion = 0\n[remote \"origin\"]\n\turl = {url}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n"
        ),
    )
    .expect("write config");
}

fn names(known: &[&str]) -> HashSet<ProjectName> {
    known.iter().map(|n| ProjectName::from(*n)).collect()
}

// ---------------------------------------------------------------------------
// remote_url
// ---------------------------------------------------------------------------

#[rstest]
#[case("https://github.com/acme/api.git")]
#[case("git@github.com:acme/api.git")]
fn remote_url_reads_origin(#[case] url: &str) {
    let root = TempDir::new().expect("tempdir");
    make_checkout(root.path(), "api", url);
    assert_eq!(remote_url(&root.path().join("api")).expect("read").as_deref(), Some(url));
}

#[test]
fn remote_url_none_without_git_dir() {
    let root = TempDir::new().expect("tempdir");
    fs::create_dir(root.path().join("plain")).expect("mkdir");
    assert_eq!(remote_url(&root.path().join("plain")).expect("read"), None);
}

#[test]
fn remote_url_none_without_remote() {
    let root = TempDir::new().expect("tempdir");
    let git = root.path().join("local").join(".git");
    fs::create_dir_all(&git).expect("mkdir");
    fs::write(git.join("config"), "[core]\n\tbare = false\n").expect("write");
    assert_eq!(remote_url(&root.path().join("local")).expect("read"), None);
}

// ---------------------------------------------------------------------------
// discover
// ---------------------------------------------------------------------------

#[test]
fn discovers_unregistered_checkouts_named_after_their_remote() {
    let root = TempDir::new().expect("tempdir");
    make_checkout(root.path(), "api-checkout", "https://github.com/acme/api.git");
    make_checkout(root.path(), "web", "git@github.com:acme/web");

    let found = discover(root.path(), &HashSet::new()).expect("discover");
    let got: Vec<(&str, &str)> = found
        .iter()
        .map(|p| (p.name.as_str(), p.url.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("api", "https://github.com/acme/api.git"),
            ("web", "git@github.com:acme/web"),
        ]
    );
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn renamed_checkout_is_discovered_with_a_warning() {
    let root = TempDir::new().expect("tempdir");
    make_checkout(root.path(), "api-local", "https://github.com/acme/api.git");
    make_checkout(root.path(), "web", "https://github.com/acme/web.git");

    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let found = tracing::subscriber::with_default(subscriber, || {
        discover(root.path(), &HashSet::new()).expect("discover")
    });

    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["api", "web"]);

    let log = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    let warnings: Vec<&str> = log.lines().filter(|l| l.contains("WARN")).collect();
    assert_eq!(warnings.len(), 1, "log: {log}");
    assert!(warnings[0].contains("api-local"), "log: {log}");
    assert!(warnings[0].contains("second copy"), "log: {log}");
}

#[test]
fn skips_registered_hidden_and_non_repo_entries() {
    let root = TempDir::new().expect("tempdir");
    make_checkout(root.path(), "api", "https://github.com/acme/api.git");
    make_checkout(root.path(), ".renault", "https://github.com/acme/hidden.git");
    fs::create_dir(root.path().join("notes")).expect("mkdir");
    fs::write(root.path().join("README.md"), "hi").expect("write");

    let found = discover(root.path(), &names(&["api"])).expect("discover");
    assert!(found.is_empty(), "got: {found:?}");
}

#[test]
fn derived_name_collisions_are_skipped() {
    let root = TempDir::new().expect("tempdir");
    make_checkout(root.path(), "a", "https://github.com/one/tools.git");
    make_checkout(root.path(), "b", "https://github.com/two/tools.git");
    make_checkout(root.path(), "c", "https://github.com/three/api.git");

    let found = discover(root.path(), &names(&["api"])).expect("discover");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.as_str(), "tools");
    assert_eq!(found[0].url, "https://github.com/one/tools.git");
}

#[test]
fn missing_root_is_an_error() {
    let root = TempDir::new().expect("tempdir");
    let err = discover(&root.path().join("nope"), &HashSet::new()).unwrap_err();
    assert!(err.to_string().contains("nope"), "got: {err}");
}
