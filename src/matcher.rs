//! Glob expansion of source patterns.
//!
//! A [`FileMatcher`] turns a working directory plus an ordered list of
//! patterns into relative paths. [`GlobMatcher`] follows the usual build-tool
//! conventions:
//!
//! - patterns are applied in order, `!pattern` removes earlier matches
//! - `*` stays within one path segment, `**/` spans any number of them
//! - directories match as well as files
//! - names starting with `.` only match when asked for

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher as CompiledGlob};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Expands source patterns relative to a working directory.
pub trait FileMatcher: Send + Sync {
    /// Return the matches of `patterns` under `cwd` as forward-slash relative
    /// paths, deduplicated, in pattern order.
    fn matches(&self, cwd: &str, patterns: &[String]) -> Result<Vec<String>>;
}

/// [`FileMatcher`] backed by `globset` over a `walkdir` listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher {
    dot: bool,
}

impl GlobMatcher {
    /// Create a matcher; `dot` lets wildcards match dot-prefixed names.
    #[must_use]
    pub fn new(dot: bool) -> Self {
        Self { dot }
    }
}

struct Pattern {
    glob: CompiledGlob,
    negated: bool,
    allow_dot: bool,
}

impl Pattern {
    fn compile(raw: &str, dot: bool) -> Result<Self> {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let body = body.strip_prefix("./").unwrap_or(body);
        let glob = GlobBuilder::new(body)
            .literal_separator(true)
            .build()
            .map_err(|source| Error::Pattern {
                pattern: raw.to_owned(),
                source,
            })?
            .compile_matcher();
        Ok(Self {
            glob,
            negated,
            allow_dot: dot || body.starts_with('.') || body.contains("/."),
        })
    }

    fn is_match(&self, candidate: &str) -> bool {
        if !self.allow_dot && candidate.split('/').any(|seg| seg.starts_with('.')) {
            return false;
        }
        self.glob.is_match(candidate)
    }
}

impl FileMatcher for GlobMatcher {
    fn matches(&self, cwd: &str, patterns: &[String]) -> Result<Vec<String>> {
        let compiled = patterns
            .iter()
            .map(|p| Pattern::compile(p, self.dot))
            .collect::<Result<Vec<_>>>()?;

        let root = if cwd.is_empty() { "." } else { cwd };
        if !Path::new(root).is_dir() {
            return Ok(Vec::new());
        }
        let candidates = list_relative(root);

        let mut matched: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for pattern in &compiled {
            if pattern.negated {
                matched.retain(|m| !pattern.is_match(m));
                seen.retain(|m| !pattern.is_match(m));
                continue;
            }
            let mut fresh: Vec<&String> = candidates
                .iter()
                .filter(|c| !seen.contains(*c) && pattern.is_match(c))
                .collect();
            fresh.sort();
            for candidate in fresh {
                seen.insert(candidate.clone());
                matched.push(candidate.clone());
            }
        }
        Ok(matched)
    }
}

/// Every entry below `root` as a forward-slash path relative to it.
///
/// Unreadable entries are left out, the same way a shell glob skips them.
fn list_relative(root: &str) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry.path().strip_prefix(root).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect()
}
