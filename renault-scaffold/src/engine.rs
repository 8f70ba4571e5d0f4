//! Static [`Node`] trees and the tera-backed [`Scaffolder`].
//!
//! # Go service skeleton
//!
//! ```text
//! <project_name>/
//!   api/{models,pb,sql,swagger}/README.md
//!   cmd/<project_name>/main.go
//!   configs/README.md
//!   internal/README.md
//!   pkg/README.md
//!   scripts/README.md
//!   scripts/lint.sh            (0755)
//!   README.md  .gitignore  .golangci.yml  Makefile  go.mod
//! ```
//!
//! Node names are tera templates too, so `{{ project_name }}` works in paths.

use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::ScaffoldContext;
use crate::error::{io_err, ScaffoldError};

// ---------------------------------------------------------------------------
// Embedded templates, baked in via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("go/readme.md", include_str!("templates/go_service/readme.md.tera")),
    ("go/api_models_readme.md", include_str!("templates/go_service/api_models_readme.md.tera")),
    ("go/api_pb_readme.md", include_str!("templates/go_service/api_pb_readme.md.tera")),
    ("go/api_sql_readme.md", include_str!("templates/go_service/api_sql_readme.md.tera")),
    (
        "go/api_swagger_readme.md",
        include_str!("templates/go_service/api_swagger_readme.md.tera"),
    ),
    ("go/main.go", include_str!("templates/go_service/main.go.tera")),
    ("go/configs_readme.md", include_str!("templates/go_service/configs_readme.md.tera")),
    ("go/internal_readme.md", include_str!("templates/go_service/internal_readme.md.tera")),
    ("go/pkg_readme.md", include_str!("templates/go_service/pkg_readme.md.tera")),
    ("go/scripts_readme.md", include_str!("templates/go_service/scripts_readme.md.tera")),
    ("go/lint.sh", include_str!("templates/go_service/lint.sh.tera")),
    ("go/gitignore", include_str!("templates/go_service/gitignore.tera")),
    ("go/golangci.yml", include_str!("templates/go_service/golangci.yml.tera")),
    ("go/makefile", include_str!("templates/go_service/Makefile.tera")),
    ("go/go.mod", include_str!("templates/go_service/go.mod.tera")),
];

fn build_tera() -> Result<Tera, ScaffoldError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Node tree
// ---------------------------------------------------------------------------

/// One entry in a static scaffold tree.
#[derive(Debug, Clone, Copy)]
pub enum Node {
    Dir {
        name: &'static str,
        children: &'static [Node],
    },
    File {
        name: &'static str,
        template: &'static str,
        executable: bool,
    },
}

const fn dir(name: &'static str, children: &'static [Node]) -> Node {
    Node::Dir { name, children }
}

const fn file(name: &'static str, template: &'static str) -> Node {
    Node::File {
        name,
        template,
        executable: false,
    }
}

const fn script(name: &'static str, template: &'static str) -> Node {
    Node::File {
        name,
        template,
        executable: true,
    }
}

/// Go service layout.
pub const GO_SERVICE: Node = dir(
    "{{ project_name }}",
    &[
        dir(
            "api",
            &[
                dir("models", &[file("README.md", "go/api_models_readme.md")]),
                dir("pb", &[file("README.md", "go/api_pb_readme.md")]),
                dir("sql", &[file("README.md", "go/api_sql_readme.md")]),
                dir("swagger", &[file("README.md", "go/api_swagger_readme.md")]),
            ],
        ),
        dir("cmd", &[dir("{{ project_name }}", &[file("main.go", "go/main.go")])]),
        dir("configs", &[file("README.md", "go/configs_readme.md")]),
        dir("internal", &[file("README.md", "go/internal_readme.md")]),
        dir("pkg", &[file("README.md", "go/pkg_readme.md")]),
        dir(
            "scripts",
            &[
                file("README.md", "go/scripts_readme.md"),
                script("lint.sh", "go/lint.sh"),
            ],
        ),
        file("README.md", "go/readme.md"),
        file(".gitignore", "go/gitignore"),
        file(".golangci.yml", "go/golangci.yml"),
        file("Makefile", "go/makefile"),
        file("go.mod", "go/go.mod"),
    ],
);

/// A rendered entry, path relative to the directory the tree is applied in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir { path: PathBuf },
    File { path: PathBuf, content: String, executable: bool },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::Dir { path } | Entry::File { path, .. } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// Scaffolder
// ---------------------------------------------------------------------------

/// Renders a [`Node`] tree with tera and writes it to disk.
///
/// Create once with [`Scaffolder::new`] and reuse.
pub struct Scaffolder {
    tera: Tera,
    tree: Node,
}

impl Scaffolder {
    /// Scaffolder for the embedded Go service layout.
    pub fn new() -> Result<Self, ScaffoldError> {
        Self::with_tree(GO_SERVICE)
    }

    pub fn with_tree(tree: Node) -> Result<Self, ScaffoldError> {
        Ok(Scaffolder {
            tera: build_tera()?,
            tree,
        })
    }

    /// Render every directory and file in tree order, parents before children.
    ///
    /// Nothing touches the filesystem, so a template error leaves no partial tree.
    pub fn render(&self, ctx: &ScaffoldContext) -> Result<Vec<Entry>, ScaffoldError> {
        ctx.validate()?;
        let tera_ctx = ctx.to_tera_context()?;
        let mut entries = Vec::new();
        self.render_node(&self.tree, Path::new(""), &tera_ctx, &mut entries)?;
        Ok(entries)
    }

    fn render_node(
        &self,
        node: &Node,
        parent: &Path,
        tera_ctx: &tera::Context,
        out: &mut Vec<Entry>,
    ) -> Result<(), ScaffoldError> {
        match node {
            Node::Dir { name, children } => {
                let path = parent.join(Tera::one_off(name, tera_ctx, false)?);
                out.push(Entry::Dir { path: path.clone() });
                for child in children.iter() {
                    self.render_node(child, &path, tera_ctx, out)?;
                }
            }
            Node::File {
                name,
                template,
                executable,
            } => {
                let path = parent.join(Tera::one_off(name, tera_ctx, false)?);
                let content = self.tera.render(template, tera_ctx)?.replace("\r\n", "\n");
                out.push(Entry::File {
                    path,
                    content,
                    executable: *executable,
                });
            }
        }
        Ok(())
    }

    /// Render and write the tree under `parent`. Returns the created root.
    ///
    /// Fails with [`ScaffoldError::RootExists`] before writing anything if the
    /// rendered root is already present.
    pub fn apply(&self, parent: &Path, ctx: &ScaffoldContext) -> Result<PathBuf, ScaffoldError> {
        let entries = self.render(ctx)?;
        let root = match entries.first() {
            Some(entry) => parent.join(entry.path()),
            None => return Ok(parent.to_path_buf()),
        };
        if root.exists() {
            return Err(ScaffoldError::RootExists { path: root });
        }

        for entry in &entries {
            let path = parent.join(entry.path());
            match entry {
                Entry::Dir { .. } => {
                    std::fs::create_dir(&path).map_err(|e| io_err(&path, e))?;
                }
                Entry::File {
                    content,
                    executable,
                    ..
                } => {
                    std::fs::write(&path, content).map_err(|e| io_err(&path, e))?;
                    if *executable {
                        set_executable(&path)?;
                    }
                }
            }
        }
        Ok(root)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), ScaffoldError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), ScaffoldError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ScaffoldContext {
        ScaffoldContext::from_module("github.com/acme/payments")
    }

    fn find<'a>(entries: &'a [Entry], rel: &str) -> &'a Entry {
        entries
            .iter()
            .find(|e| e.path() == Path::new(rel))
            .unwrap_or_else(|| panic!("missing entry {rel}"))
    }

    #[test]
    fn scaffolder_new_succeeds() {
        Scaffolder::new().expect("Scaffolder::new should succeed with embedded templates");
    }

    #[test]
    fn every_file_node_names_a_known_template() {
        fn walk(node: &Node, known: &[&str]) {
            match node {
                Node::Dir { children, .. } => children.iter().for_each(|c| walk(c, known)),
                Node::File { template, .. } => {
                    assert!(known.contains(template), "unknown template {template}")
                }
            }
        }
        let known: Vec<&str> = TPLS.iter().map(|(n, _)| *n).collect();
        walk(&GO_SERVICE, &known);
    }

    #[test]
    fn root_is_first_and_named_after_project() {
        let entries = Scaffolder::new().unwrap().render(&ctx()).unwrap();
        assert_eq!(entries[0], Entry::Dir { path: PathBuf::from("payments") });
    }

    #[test]
    fn placeholders_substituted_in_paths() {
        let entries = Scaffolder::new().unwrap().render(&ctx()).unwrap();
        find(&entries, "payments/cmd/payments/main.go");
        assert!(entries
            .iter()
            .all(|e| !e.path().to_string_lossy().contains("{{")));
    }

    #[test]
    fn go_mod_carries_full_module_path() {
        let entries = Scaffolder::new().unwrap().render(&ctx()).unwrap();
        match find(&entries, "payments/go.mod") {
            Entry::File { content, .. } => {
                assert!(content.starts_with("module github.com/acme/payments\n"), "got:\n{content}")
            }
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn only_lint_script_is_executable() {
        let entries = Scaffolder::new().unwrap().render(&ctx()).unwrap();
        let executables: Vec<_> = entries
            .iter()
            .filter(|e| matches!(e, Entry::File { executable: true, .. }))
            .map(|e| e.path().to_path_buf())
            .collect();
        assert_eq!(executables, vec![PathBuf::from("payments/scripts/lint.sh")]);
    }

    #[test]
    fn no_crlf_in_any_rendered_output() {
        let entries = Scaffolder::new().unwrap().render(&ctx()).unwrap();
        for entry in &entries {
            if let Entry::File { path, content, .. } = entry {
                assert!(!content.contains('\r'), "{} contains CR", path.display());
            }
        }
    }
}
