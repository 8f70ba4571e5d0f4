//! Workspace manifest: the persisted list of known projects.
//!
//! # Storage layout
//!
//! ```text
//! <root>/.renault/project.yaml
//! - name: api
//!   url: git@github.com:acme/api.git
//! - name: web
//!   url: https://github.com/acme/web.git
//! ```
//!
//! The file is loaded wholesale and written wholesale (full replace). Writes
//! go through a `.tmp` sibling and a rename so a crash never leaves a
//! half-written manifest behind.
//!
//! Persistence is reached through the [`ManifestStore`] trait so the sync
//! orchestrator can be exercised against an in-memory store in tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{io_err, ManifestError};
use crate::types::{Project, ProjectName};
use crate::workspace::Workspace;

// ---------------------------------------------------------------------------
// 1. Store abstraction
// ---------------------------------------------------------------------------

/// Load/save pair for the project list.
pub trait ManifestStore: Send + Sync {
    fn load(&self) -> Result<Vec<Project>, ManifestError>;
    fn save(&self, projects: &[Project]) -> Result<(), ManifestError>;
}

/// YAML file-backed [`ManifestStore`].
#[derive(Debug, Clone)]
pub struct YamlManifest {
    path: PathBuf,
}

impl YamlManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at `<root>/.renault/project.yaml`.
    pub fn for_workspace(workspace: &Workspace) -> Self {
        Self::new(workspace.manifest_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestStore for YamlManifest {
    fn load(&self) -> Result<Vec<Project>, ManifestError> {
        load_at(&self.path)
    }

    fn save(&self, projects: &[Project]) -> Result<(), ManifestError> {
        save_at(&self.path, projects)
    }
}

// ---------------------------------------------------------------------------
// 2. Load / save
// ---------------------------------------------------------------------------

/// Read and parse the manifest at `path`.
///
/// An empty file is an empty project list. A missing file is an I/O error.
/// Every entry must pass [`check_projects`]; a hand-edited manifest with a
/// repeated or path-like name is rejected whole.
pub fn load_at(path: &Path) -> Result<Vec<Project>, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    let projects: Vec<Project> =
        serde_yaml::from_str(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    check_projects(&projects)?;
    Ok(projects)
}

/// Every name must be a valid directory name and appear once.
pub fn check_projects(projects: &[Project]) -> Result<(), ManifestError> {
    let mut seen = HashSet::new();
    for project in projects {
        validate_name(project.name.as_str())?;
        if !seen.insert(&project.name) {
            return Err(ManifestError::DuplicateProject {
                name: project.name.to_string(),
            });
        }
    }
    Ok(())
}

/// Atomically write `projects` to `path`.
///
/// Write flow: serialize → `project.yaml.tmp` sibling → `rename`.
pub fn save_at(path: &Path, projects: &[Project]) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let yaml = serde_yaml::to_string(projects)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// 3. Init / add
// ---------------------------------------------------------------------------

/// Fail with [`ManifestError::NotInitialized`] unless the control directory exists.
pub fn require_initialized(workspace: &Workspace) -> Result<(), ManifestError> {
    if workspace.is_initialized() {
        Ok(())
    } else {
        Err(ManifestError::NotInitialized {
            root: workspace.root().to_path_buf(),
        })
    }
}

/// Create the control directory and write the initial manifest.
///
/// Projects sharing a name with an earlier entry are dropped so the saved
/// manifest upholds the unique-name invariant. Returns what was saved.
pub fn init(workspace: &Workspace, projects: Vec<Project>) -> Result<Vec<Project>, ManifestError> {
    let dir = workspace.control_dir();
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;

    let mut seen = HashSet::new();
    let projects: Vec<Project> = projects
        .into_iter()
        .filter(|p| seen.insert(p.name.clone()))
        .collect();

    YamlManifest::for_workspace(workspace).save(&projects)?;
    Ok(projects)
}

/// Register a new project in an initialized workspace.
///
/// `name` defaults to the name derived from `url`. Nothing is cloned here;
/// the next sync picks the project up.
pub fn add(
    workspace: &Workspace,
    url: &str,
    name: Option<&str>,
) -> Result<Project, ManifestError> {
    require_initialized(workspace)?;
    validate_url(url)?;

    let name = match name {
        Some(n) => n.to_string(),
        None => derive_project_name(url).ok_or_else(|| ManifestError::InvalidUrl {
            url: url.to_string(),
            reason: "cannot derive a project name from it",
        })?,
    };
    validate_name(&name)?;

    let store = YamlManifest::for_workspace(workspace);
    let mut projects = store.load()?;
    let name = ProjectName::from(name);
    if projects.iter().any(|p| p.name == name) {
        return Err(ManifestError::DuplicateProject { name: name.0 });
    }

    let project = Project::new(name, url);
    projects.push(project.clone());
    store.save(&projects)?;
    Ok(project)
}

// ---------------------------------------------------------------------------
// 4. Names and URLs
// ---------------------------------------------------------------------------

/// Last path segment of a remote URL with any `.git` suffix stripped.
///
/// `https://github.com/acme/api.git` → `api`, `git@host:acme/web` → `web`.
pub fn derive_project_name(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn scheme_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+://\S+$").expect("static regex"))
}

fn scp_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.-]+@[\w.-]+:\S+$").expect("static regex"))
}

/// Accept `scheme://…` and scp-like `user@host:path` remotes.
pub fn validate_url(url: &str) -> Result<(), ManifestError> {
    let invalid = |reason| ManifestError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    if url.is_empty() {
        return Err(invalid("url is empty"));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(invalid("url contains whitespace"));
    }
    if scheme_url().is_match(url) || scp_url().is_match(url) {
        Ok(())
    } else {
        Err(invalid("expected scheme://host/path or user@host:path"))
    }
}

/// Project names double as directory names under the workspace root.
pub fn validate_name(name: &str) -> Result<(), ManifestError> {
    let invalid = |reason| ManifestError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
