//! # rescopy
//!
//! Resource copying for build pipelines: glob-selected files are mirrored
//! into a destination tree, optionally renamed and minified on the way.
//!
//! ## Core Features
//!
//! - **Glob selection**: ordered patterns with `**`, negation and dotfile control
//! - **Expanded mappings**: one destination per match, with literal, regex or custom renames
//! - **Minification**: JavaScript, JSON, XML, CSS and SQL by file extension
//! - **Deterministic writes**: resolved entries are written in sorted order, so destination collisions resolve the same way every run
//! - **Parallel preparation**: reads and minification can fan out to a rayon pool
//! - **Atomic writes**: temp file + rename, so a destination never holds a partial file
//! - **Cross-platform paths**: Windows separators are normalized to `/`
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use rescopy::CopyBuilder;
//!
//! let totals = CopyBuilder::new("assets/", "dist").src("*").run()?;
//! if let Some(line) = totals.summary() {
//!     println!("{line}");
//! }
//! # Ok::<(), rescopy::Error>(())
//! ```
//!
//! ## Engine API
//!
//! For several rules, or a custom matcher or file system, use [`CopyEngine`]:
//!
//! ```no_run
//! use rescopy::{CopyEngine, CopyOptions, MappingRule, Rename};
//!
//! let rules = [
//!     MappingRule::new("assets", ["**/*.js", "*.html"], "dist/debug")
//!         .expanded()
//!         .with_rename(Rename::regex(r"(\.js|\.html)", "-dbg$1")?),
//!     MappingRule::new("assets", ["**/*.js"], "dist/min")
//!         .expanded()
//!         .with_compression(),
//! ];
//!
//! let engine = CopyEngine::new(CopyOptions::default().with_parallel(4));
//! let totals = engine.run(&rules)?;
//! println!("Copied {} files, skipped {}", totals.files_copied, totals.files_skipped);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Task Files
//!
//! Named targets can be kept in a JSON file, see [`CopyConfig`]:
//!
//! ```no_run
//! use rescopy::{CopyConfig, CopyEngine};
//!
//! let config = CopyConfig::from_path("rescopy.json")?;
//! let engine = CopyEngine::default();
//! for name in config.target_names() {
//!     engine.run_task(&config, name)?;
//! }
//! # Ok::<(), rescopy::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Route warnings and copy lines through the tracing crate |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod config;
mod engine;
mod error;
mod fs;
mod matcher;
mod minify;
mod options;
mod resolve;
mod rule;
mod utils;

pub use builder::CopyBuilder;
pub use config::{CopyConfig, CopyTask, FileMapping, Patterns, RenameConfig, TargetConfig};
pub use engine::{CopyEngine, PlanItem, RunTotals};
pub use error::{Error, Result, Warning};
pub use fs::{FileSystem, LocalFileSystem};
pub use matcher::{FileMatcher, GlobMatcher};
pub use minify::{ContentKind, MinifyError, minify};
pub use options::CopyOptions;
pub use resolve::{ResolveContext, ResourceEntry, resolve};
pub use rule::{MappingRule, Rename, RenameFn};
pub use utils::path::{Platform, to_portable_path, trim_trailing_separator};
