//! Path utilities for cross-platform compatibility.
//!
//! Resolution works on string paths rather than [`std::path::Path`] because
//! destinations are computed by substring rewriting: the configured source
//! root is swapped for the destination root, then the terminal file name is
//! swapped for the renamed one. Everything here is pure.

use std::borrow::Cow;

/// Path separator convention of the host the engine runs on.
///
/// Resolution never asks the OS directly; it consults the [`Platform`]
/// carried by [`CopyOptions`](crate::CopyOptions) so tests can force either
/// branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Forward-slash separators only.
    #[default]
    Posix,
    /// Backslash separators are rewritten to forward slashes.
    Windows,
}

impl Platform {
    /// The platform of the running process.
    #[must_use]
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }
}

/// Convert a path to forward-slash form.
///
/// On [`Platform::Windows`] every backslash becomes a forward slash. On
/// [`Platform::Posix`] the path is returned unchanged (a backslash is a
/// legal file name character there).
///
/// # Example
///
/// ```
/// use rescopy::{Platform, to_portable_path};
///
/// assert_eq!(to_portable_path(r"a\b\c.js", Platform::Windows), "a/b/c.js");
/// assert_eq!(to_portable_path(r"a\b\c.js", Platform::Posix), r"a\b\c.js");
/// ```
pub fn to_portable_path(path: &str, platform: Platform) -> Cow<'_, str> {
    match platform {
        Platform::Windows if path.contains('\\') => Cow::Owned(path.replace('\\', "/")),
        _ => Cow::Borrowed(path),
    }
}

/// Strip every trailing forward slash, one character at a time.
///
/// `"a/b///"` becomes `"a/b"` and `"/"` becomes `""`.
pub fn trim_trailing_separator(path: &str) -> &str {
    let mut trimmed = path;
    while let Some(rest) = trimmed.strip_suffix('/') {
        trimmed = rest;
    }
    trimmed
}

/// Join two string paths with a single forward slash.
///
/// An empty base yields `rel` unchanged.
pub(crate) fn join(base: &str, rel: &str) -> String {
    if base.is_empty() {
        return rel.to_owned();
    }
    let rel = rel.trim_start_matches('/');
    format!("{}/{}", trim_trailing_separator(base), rel)
}

/// Last component of a path, accepting either separator.
pub(crate) fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Extension of the last component including its leading dot.
///
/// Dotfiles have no extension: `".eslintrc"` yields `""`, while
/// `"app.min.js"` yields `".js"`.
pub(crate) fn extension(file_name: &str) -> &str {
    let name = basename(file_name);
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx..],
    }
}

/// Replace the `from` root of `path` with `to`.
///
/// A path starting with `from` has that prefix swapped; an empty `from` puts
/// `to` in front; anything else has its first occurrence of `from` replaced.
pub(crate) fn rebase(path: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return join(to, path);
    }
    match path.strip_prefix(from) {
        Some(rest) => format!("{to}{rest}"),
        None => path.replacen(from, to, 1),
    }
}

/// Swap the trailing `file_name` of `path` for `replacement`.
///
/// Only the terminal occurrence is touched, so a directory that happens to
/// share the file's name keeps it.
pub(crate) fn replace_file_name(path: &str, file_name: &str, replacement: &str) -> String {
    match path.strip_suffix(file_name) {
        Some(dir) => format!("{dir}{replacement}"),
        None => path.to_owned(),
    }
}
