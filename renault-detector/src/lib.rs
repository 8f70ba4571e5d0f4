//! Local repository discovery for `renault-detector`.
//!
//! [`remote_url`] reads the origin URL straight out of `<dir>/.git/config`
//! without spawning git. [`discover`] walks the direct children of a
//! workspace root and turns every checkout that is not yet in the manifest
//! into a [`Project`] whose name is derived from its remote URL.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use renault_core::manifest::derive_project_name;
use renault_core::{Project, ProjectName};
use thiserror::Error;

pub const GIT_CONFIG_PATH: &str = ".git/config";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors from repository discovery.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DetectError {
    DetectError::Io {
        path: path.into(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Remote URL
// ---------------------------------------------------------------------------

fn section_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^\s*\[\s*([^\s\]]+)(?:\s+"([^"]*)")?\s*\]"#).expect("static regex"))
}

fn url_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*url\s*=\s*(\S.*?)\s*$").expect("static regex"))
}

/// Remote URL configured for the checkout at `dir`.
///
/// Returns `Ok(None)` when `dir` has no `.git/config` or the config names no
/// remote URL. The `origin` remote wins; otherwise the first remote listed.
pub fn remote_url(dir: &Path) -> Result<Option<String>, DetectError> {
    let config_path = dir.join(GIT_CONFIG_PATH);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path).map_err(|e| io_err(&config_path, e))?;
    Ok(parse_remote_url(&content))
}

/// Pick the remote URL out of git config text.
pub fn parse_remote_url(config: &str) -> Option<String> {
    let mut in_remote: Option<String> = None;
    let mut first = None;

    for line in config.lines() {
        if let Some(caps) = section_header().captures(line) {
            in_remote = match (caps.get(1), caps.get(2)) {
                (Some(kind), Some(name)) if kind.as_str() == "remote" => {
                    Some(name.as_str().to_string())
                }
                _ => None,
            };
            continue;
        }
        let Some(remote) = in_remote.as_deref() else { continue };
        if let Some(caps) = url_entry().captures(line) {
            let url = caps[1].to_string();
            if remote == "origin" {
                return Some(url);
            }
            first.get_or_insert(url);
        }
    }
    first
}

// ---------------------------------------------------------------------------
// Workspace scan
// ---------------------------------------------------------------------------

/// Scan the direct children of `root` for checkouts missing from `known`.
///
/// Hidden entries and plain files are skipped, as are directories whose
/// name is already registered. Each remaining directory with a remote URL
/// becomes a `Project` named after the URL's last segment; a derived name
/// that collides with a registered or already-discovered one is skipped.
/// Results are ordered by directory name.
pub fn discover(root: &Path, known: &HashSet<ProjectName>) -> Result<Vec<Project>, DetectError> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .map_err(|e| io_err(root, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut taken: HashSet<ProjectName> = known.clone();
    let mut found = Vec::new();
    for entry in entries {
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        if dir_name.starts_with('.') || known.contains(&ProjectName::from(dir_name.as_str())) {
            continue;
        }

        let url = match remote_url(&entry.path()) {
            Ok(Some(url)) => url,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(dir = %dir_name, error = %err, "skipping unreadable checkout");
                continue;
            }
        };
        let Some(name) = derive_project_name(&url) else {
            tracing::warn!(dir = %dir_name, url = %url, "cannot derive project name from remote url");
            continue;
        };
        let name = ProjectName::from(name);
        if !taken.insert(name.clone()) {
            tracing::warn!(dir = %dir_name, project = %name, "derived project name already in use");
            continue;
        }
        if name.as_str() != dir_name {
            tracing::warn!(
                dir = %dir_name,
                project = %name,
                "checkout directory differs from project name; sync will clone a second copy"
            );
        }
        tracing::debug!(dir = %dir_name, project = %name, "discovered local repository");
        found.push(Project { name, url });
    }
    Ok(found)
}
