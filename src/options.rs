//! Configuration options for copy runs.
//!
//! # Example
//!
//! ```
//! use rescopy::{CopyOptions, Platform};
//!
//! let options = CopyOptions::default()
//!     .with_parallel(4)
//!     .with_platform(Platform::Windows)
//!     .without_fsync();
//! ```

use crate::utils::path::Platform;

/// Options for a [`CopyEngine`](crate::CopyEngine).
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `parallel` | 1 | Workers for read/minify (1 = strictly sequential) |
/// | `fsync` | `true` | Sync to disk after write |
/// | `dot` | `false` | Let `*` match dotfiles |
/// | `platform` | host | Separator convention for path normalization |
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Number of workers that read and minify resolved files (default: 1)
    ///
    /// Writes always happen on the calling thread in sorted order, whatever
    /// this is set to.
    pub parallel: usize,

    /// Whether to sync files to disk after writing (default: true)
    pub fsync: bool,

    /// Whether glob wildcards match names starting with `.` (default: false)
    pub dot: bool,

    /// Separator convention used when normalizing paths (default: host)
    pub platform: Platform,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    pub warn_handler: Option<fn(&str)>,

    /// Callback for per-file copy lines (optional)
    ///
    /// If not set and `tracing` feature is enabled, lines are logged at info level.
    pub log_handler: Option<fn(&str)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            parallel: 1,
            fsync: true,
            dot: false,
            platform: Platform::host(),
            warn_handler: None,
            log_handler: None,
        }
    }
}

impl CopyOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Create options with a handler for `copying: a => b` lines
    #[must_use]
    pub fn with_log_handler(mut self, handler: fn(&str)) -> Self {
        self.log_handler = Some(handler);
        self
    }

    /// Set the number of read/minify workers
    ///
    /// Value is clamped to at least 1 to prevent panics.
    #[must_use]
    pub fn with_parallel(mut self, n: usize) -> Self {
        self.parallel = n.max(1);
        self
    }

    /// Disable fsync for faster (but less durable) writes
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Let wildcards match dotfiles
    #[must_use]
    pub fn with_dot(mut self) -> Self {
        self.dot = true;
        self
    }

    /// Force a separator convention instead of the host's
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }

    pub(crate) fn log(&self, msg: &str) {
        if let Some(handler) = self.log_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::info!("{}", msg);
        }
    }
}
