//! # renault-scaffold
//!
//! Tera-based project scaffolding. A fixed tree of directories and templated
//! files is rendered in memory, then written under a fresh project root.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use renault_scaffold::{ScaffoldContext, Scaffolder};
//!
//! fn scaffold(parent: &Path) {
//!     let ctx = ScaffoldContext::from_module("github.com/acme/payments");
//!     if let Ok(scaffolder) = Scaffolder::new() {
//!         if let Ok(root) = scaffolder.apply(parent, &ctx) {
//!             println!("created {}", root.display());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::ScaffoldContext;
pub use engine::{Entry, Node, Scaffolder, GO_SERVICE};
pub use error::ScaffoldError;
