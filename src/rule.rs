//! Mapping rules and destination renaming.

use crate::utils::path::join;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Signature of a custom rename: `(dest_root, relative_source) -> dest_path`.
pub type RenameFn = dyn Fn(&str, &str) -> String + Send + Sync;

/// Strategy that computes a destination path for an expanded source.
///
/// It receives the rule's destination root and the source path relative to
/// the rule's `cwd`. Only the file name of the returned path is used: the
/// directory always mirrors the source tree under the destination root.
///
/// # Example
///
/// ```
/// use rescopy::Rename;
///
/// let rename = Rename::regex(r"(\.js|\.xml|\.html)", "-dbg$1").unwrap();
/// assert_eq!(rename.apply("out", "foo.html"), "out/foo-dbg.html");
///
/// let rename = Rename::custom(|dest, src| format!("{dest}/{}", src.to_uppercase()));
/// assert_eq!(rename.apply("out", "a.js"), "out/A.JS");
/// ```
#[derive(Clone)]
pub enum Rename {
    /// Replace the first occurrence of `find` in the source path.
    Literal {
        /// Text to look for
        find: String,
        /// Replacement text
        replace: String,
    },
    /// Replace the first match of `regex` in the source path.
    ///
    /// `replace` may reference capture groups as `$1` or `${name}`.
    Pattern {
        /// Compiled pattern
        regex: Regex,
        /// Replacement template
        replace: String,
    },
    /// Arbitrary function.
    Custom(Arc<RenameFn>),
}

impl Rename {
    /// Literal first-occurrence replacement.
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self::Literal {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Regex first-match replacement.
    pub fn regex(pattern: &str, replace: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            regex: Regex::new(pattern)?,
            replace: replace.into(),
        })
    }

    /// Wrap a closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Compute the destination for `src` under `dest`.
    #[must_use]
    pub fn apply(&self, dest: &str, src: &str) -> String {
        match self {
            Self::Literal { find, replace } => join(dest, &src.replacen(find.as_str(), replace, 1)),
            Self::Pattern { regex, replace } => {
                join(dest, &regex.replace(src, replace.as_str()))
            }
            Self::Custom(f) => f(dest, src),
        }
    }
}

impl fmt::Debug for Rename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { find, replace } => f
                .debug_struct("Literal")
                .field("find", find)
                .field("replace", replace)
                .finish(),
            Self::Pattern { regex, replace } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("replace", replace)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One source-patterns-to-destination unit.
///
/// # Example
///
/// ```
/// use rescopy::{MappingRule, Rename};
///
/// let rule = MappingRule::new("assets/", ["**/*.js"], "dist/js")
///     .expanded()
///     .with_compression()
///     .with_rename(Rename::literal(".js", ".min.js"));
/// assert!(rule.expand);
/// ```
#[derive(Debug, Clone)]
pub struct MappingRule {
    /// Directory the patterns are matched in
    pub cwd: String,
    /// Glob patterns, applied in order
    pub src: Vec<String>,
    /// Destination root
    pub dest: String,
    /// Whether each match becomes its own source/destination pair
    pub expand: bool,
    /// Optional destination rename, only used when `expand` is set
    pub rename: Option<Rename>,
    /// Whether to minify content before writing
    pub compression: bool,
}

impl MappingRule {
    /// Create a non-expanded rule without compression or renaming.
    pub fn new<I, S>(cwd: impl Into<String>, src: I, dest: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cwd: cwd.into(),
            src: src.into_iter().map(Into::into).collect(),
            dest: dest.into(),
            expand: false,
            rename: None,
            compression: false,
        }
    }

    /// Map every match to its own destination.
    #[must_use]
    pub fn expanded(mut self) -> Self {
        self.expand = true;
        self
    }

    /// Minify content on the way through.
    #[must_use]
    pub fn with_compression(mut self) -> Self {
        self.compression = true;
        self
    }

    /// Rename destinations of an expanded rule.
    #[must_use]
    pub fn with_rename(mut self, rename: Rename) -> Self {
        self.rename = Some(rename);
        self
    }

    /// Split the matches of this rule into groups that share a destination.
    ///
    /// Without `expand` there is a single group holding the raw relative
    /// matches. With `expand`, each match becomes its own group: its source
    /// is joined onto `cwd` and its destination is the rename result (or
    /// `dest/<match>`).
    pub(crate) fn groups(&self, matches: Vec<String>) -> Vec<FileGroup> {
        if !self.expand {
            return vec![FileGroup {
                src: matches,
                dest: self.dest.clone(),
            }];
        }

        matches
            .into_iter()
            .map(|rel| {
                let dest = match &self.rename {
                    Some(rename) => rename.apply(&self.dest, &rel),
                    None => join(&self.dest, &rel),
                };
                FileGroup {
                    src: vec![join(&self.cwd, &rel)],
                    dest,
                }
            })
            .collect()
    }
}

/// Sources that share one configured destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileGroup {
    pub src: Vec<String>,
    pub dest: String,
}
