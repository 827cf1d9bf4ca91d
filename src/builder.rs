//! Builder API for one-rule copy runs.
//!
//! The builder pattern provides a fluent interface for the common case of a
//! single mapping rule. It is often more convenient than constructing a
//! [`MappingRule`] and [`CopyOptions`] by hand.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use rescopy::CopyBuilder;
//!
//! // Mirror every match of `*` under `assets/` into `dist/`
//! let totals = CopyBuilder::new("assets/", "dist").src("*").run()?;
//! println!("Copied {} files", totals.files_copied);
//! # Ok::<(), rescopy::Error>(())
//! ```
//!
//! ## Debug Builds
//!
//! ```no_run
//! use rescopy::{CopyBuilder, Rename};
//!
//! let totals = CopyBuilder::new("assets", "dist/debug")
//!     .src("**/*.js")
//!     .src("*.html")
//!     .expand()
//!     .rename(Rename::regex(r"(\.js|\.html)", "-dbg$1")?)
//!     .run()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Minified Output
//!
//! ```no_run
//! use rescopy::CopyBuilder;
//!
//! let totals = CopyBuilder::new("assets", "dist/min")
//!     .src("**/*.js")
//!     .src("**/*.css")
//!     .expand()
//!     .compress()
//!     .parallel(8)
//!     .run()?;
//!
//! if totals.files_skipped > 0 {
//!     println!("{} files failed to minify", totals.files_skipped);
//! }
//! # Ok::<(), rescopy::Error>(())
//! ```

use crate::engine::{CopyEngine, PlanItem, RunTotals};
use crate::error::Result;
use crate::options::CopyOptions;
use crate::rule::{MappingRule, Rename};
use crate::utils::path::Platform;

/// A builder for a single mapping rule and the options to run it with.
///
/// # Example
///
/// ```no_run
/// use rescopy::CopyBuilder;
///
/// let totals = CopyBuilder::new("fixtures", "tmp/xml")
///     .src("**/*.xml")
///     .expand()
///     .on_copy(|line| println!("{line}"))
///     .run()?;
/// # Ok::<(), rescopy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    rule: MappingRule,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a builder for patterns under `cwd` copied to `dest`.
    ///
    /// With no [`src`](Self::src) call, the rule matches nothing.
    pub fn new(cwd: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            rule: MappingRule::new(cwd, std::iter::empty::<String>(), dest),
            options: CopyOptions::default(),
        }
    }

    /// Add a source pattern. Patterns apply in the order they are added.
    #[must_use]
    pub fn src(mut self, pattern: impl Into<String>) -> Self {
        self.rule.src.push(pattern.into());
        self
    }

    /// Give every match its own destination under `dest`.
    #[must_use]
    pub fn expand(mut self) -> Self {
        self.rule.expand = true;
        self
    }

    /// Minify content by extension before writing.
    ///
    /// Files with an unsupported extension or malformed content are skipped
    /// with a warning.
    #[must_use]
    pub fn compress(mut self) -> Self {
        self.rule.compression = true;
        self
    }

    /// Rename destinations. Only takes effect together with [`expand`](Self::expand).
    #[must_use]
    pub fn rename(mut self, rename: Rename) -> Self {
        self.rule.rename = Some(rename);
        self
    }

    /// Set the number of read/minify workers.
    ///
    /// Default is 1. Writes stay on the calling thread either way.
    #[must_use]
    pub fn parallel(mut self, threads: usize) -> Self {
        self.options = self.options.with_parallel(threads);
        self
    }

    /// Disable fsync after each write.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Let wildcards match dotfiles.
    #[must_use]
    pub fn dot(mut self) -> Self {
        self.options = self.options.with_dot();
        self
    }

    /// Normalize paths as on `platform` instead of the host.
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.options = self.options.with_platform(platform);
        self
    }

    /// Set a handler for warning messages.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rescopy::CopyBuilder;
    ///
    /// let totals = CopyBuilder::new("src", "dst")
    ///     .src("*")
    ///     .on_warning(|msg| eprintln!("Warning: {}", msg))
    ///     .run()?;
    /// # Ok::<(), rescopy::Error>(())
    /// ```
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Set a handler for the per-file `copying: a => b` lines.
    #[must_use]
    pub fn on_copy(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_log_handler(handler);
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Get a reference to the rule being built.
    pub fn rule(&self) -> &MappingRule {
        &self.rule
    }

    /// Execute the copy.
    ///
    /// # Errors
    ///
    /// Returns an error if a matched file cannot be read or a destination
    /// cannot be written.
    pub fn run(self) -> Result<RunTotals> {
        CopyEngine::new(self.options).run_rule(&self.rule)
    }

    /// List what [`run`](Self::run) would write, without touching the disk.
    pub fn plan(self) -> Result<Vec<PlanItem>> {
        CopyEngine::new(self.options).plan(std::slice::from_ref(&self.rule))
    }
}
