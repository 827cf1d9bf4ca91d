//! JSON task files.
//!
//! A task file lists named targets, each with its own mapping rules and
//! options. Task-level `options` apply to every target and are overridden
//! key by key by a target's own `options`.
//!
//! ```json
//! {
//!   "options": { "compression": false },
//!   "targets": {
//!     "all": {
//!       "files": [{ "cwd": "fixtures/", "src": "*", "dest": "tmp/all" }]
//!     },
//!     "debug": {
//!       "files": [{
//!         "expand": true, "cwd": "fixtures", "src": ["**/*.js", "*.html"],
//!         "dest": "tmp/debug",
//!         "rename": { "regex": "(\\.js|\\.html)", "replace": "-dbg$1" }
//!       }]
//!     },
//!     "compress": {
//!       "options": { "compression": true },
//!       "files": [{ "expand": true, "cwd": "fixtures", "src": ["**/*.js"], "dest": "tmp/min" }]
//!     }
//!   }
//! }
//! ```

use crate::error::{Error, Result};
use crate::rule::{MappingRule, Rename};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A parsed task file.
#[derive(Debug, Clone, Default)]
pub struct CopyConfig {
    /// Options shared by every target
    pub options: Map<String, Value>,
    /// Targets in file order
    pub targets: Vec<(String, TargetConfig)>,
}

/// One named target.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    /// Options overriding the task-level ones
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Mapping rules, processed in order
    #[serde(default)]
    pub files: Vec<FileMapping>,
}

/// One mapping rule as written in the task file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileMapping {
    /// Directory the patterns are matched in
    #[serde(default)]
    pub cwd: String,
    /// One pattern or a list of them
    pub src: Patterns,
    /// Destination root
    pub dest: String,
    /// Map every match to its own destination
    #[serde(default)]
    pub expand: bool,
    /// Destination rename for expanded rules
    #[serde(default)]
    pub rename: Option<RenameConfig>,
}

/// `"src": "*"` or `"src": ["*.js", "*.css"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    /// A single pattern
    One(String),
    /// An ordered list of patterns
    Many(Vec<String>),
}

impl Patterns {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        }
    }
}

/// Declarative rename: first regex match or first literal occurrence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RenameConfig {
    /// `{ "regex": "...", "replace": "..." }`
    Regex {
        /// Pattern searched in the relative source path
        regex: String,
        /// Replacement template (`$1`, `${name}`)
        replace: String,
    },
    /// `{ "find": "...", "replace": "..." }`
    Literal {
        /// Text searched in the relative source path
        find: String,
        /// Replacement text
        replace: String,
    },
}

impl RenameConfig {
    fn build(&self, target: &str) -> Result<Rename> {
        match self {
            Self::Regex { regex, replace } => {
                Rename::regex(regex, replace.as_str()).map_err(|source| Error::InvalidRename {
                    target: target.to_owned(),
                    pattern: regex.clone(),
                    source,
                })
            }
            Self::Literal { find, replace } => Ok(Rename::literal(find.as_str(), replace.as_str())),
        }
    }
}

/// A target ready to run: merged options applied to its rules.
#[derive(Debug, Clone)]
pub struct CopyTask {
    /// Target name
    pub name: String,
    /// Whether rules minify content
    pub compression: bool,
    /// Rules in file order
    pub rules: Vec<MappingRule>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    options: Map<String, Value>,
    #[serde(default)]
    targets: Map<String, Value>,
}

impl CopyConfig {
    /// Read and parse a task file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a task file from a string.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let raw: RawConfig = serde_json::from_str(text)?;
        let targets = raw
            .targets
            .into_iter()
            .map(|(name, value)| serde_json::from_value(value).map(|target| (name, target)))
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self {
            options: raw.options,
            targets,
        })
    }

    /// Target names in file order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|(name, _)| name.as_str())
    }

    /// Build the runnable task for `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTarget`] if no such target exists
    /// - [`Error::InvalidOption`] if `compression` is present but not a boolean
    /// - [`Error::InvalidRename`] if a rename regex does not compile
    pub fn task(&self, name: &str) -> Result<CopyTask> {
        let (_, target) = self
            .targets
            .iter()
            .find(|(target_name, _)| target_name == name)
            .ok_or_else(|| Error::UnknownTarget(name.to_owned()))?;

        let mut options = self.options.clone();
        for (key, value) in &target.options {
            options.insert(key.clone(), value.clone());
        }

        let compression = match options.get("compression") {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(Error::InvalidOption {
                    target: name.to_owned(),
                    option: "compression".to_owned(),
                    expected: "Boolean",
                });
            }
        };

        let rules = target
            .files
            .iter()
            .map(|mapping| {
                let rename = mapping
                    .rename
                    .as_ref()
                    .map(|r| r.build(name))
                    .transpose()?;
                Ok(MappingRule {
                    cwd: mapping.cwd.clone(),
                    src: mapping.src.clone().into_vec(),
                    dest: mapping.dest.clone(),
                    expand: mapping.expand,
                    rename,
                    compression,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CopyTask {
            name: name.to_owned(),
            compression,
            rules,
        })
    }
}
