//! Expansion of one source path into source/destination pairs.
//!
//! A source is either a file (one entry) or a directory (one entry per file
//! below it). Each entry's destination is computed by swapping the rule's
//! source root for its destination root inside the source path, then
//! swapping the file name for the destination file name. Entries come back
//! sorted by source path, which is the order they are written in.

use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::utils::path::{
    Platform, basename, join, rebase, replace_file_name, to_portable_path, trim_trailing_separator,
};
use std::collections::BTreeMap;

/// A resolved source file and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Source path as it will be read
    pub source: String,
    /// File name of the source
    pub file_name: String,
    /// File name the destination should carry
    pub file_name_dest: String,
    /// Source path rebased onto the destination root (still ends in `file_name`)
    pub dir_name_dest: String,
}

impl ResourceEntry {
    /// The final destination: `dir_name_dest` with its trailing file name
    /// swapped for `file_name_dest`.
    #[must_use]
    pub fn destination(&self) -> String {
        replace_file_name(&self.dir_name_dest, &self.file_name, &self.file_name_dest)
    }
}

/// Rule-level inputs shared by every source of one file group.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// The rule's source root
    pub cwd: &'a str,
    /// The rule's destination root
    pub dest_root: &'a str,
    /// The group's destination (the per-file destination when expanded)
    pub dest: &'a str,
    /// Whether sources already include `cwd`
    pub expanded: bool,
    /// Separator convention
    pub platform: Platform,
}

/// Resolve one source into its entries, sorted by source path.
///
/// A source that is neither a file nor a directory yields no entries; the
/// caller decides how to report that. A directory that cannot be enumerated
/// yields [`Error::Walk`] and nothing else, even if some files were seen.
pub fn resolve<F>(fs: &F, ctx: &ResolveContext<'_>, src: &str) -> Result<Vec<ResourceEntry>>
where
    F: FileSystem + ?Sized,
{
    let platform = ctx.platform;
    let src = if ctx.expanded {
        to_portable_path(src, platform).into_owned()
    } else {
        to_portable_path(&join(ctx.cwd, src), platform).into_owned()
    };
    let cwd = trim_trailing_separator(ctx.cwd);

    // Fresh per source; re-insertion of a key overwrites.
    let mut resources: BTreeMap<String, ResourceEntry> = BTreeMap::new();

    if fs.is_dir(&src) {
        let dest_is_file = fs.is_file(ctx.dest);
        let mut visit = |file: String| {
            if !fs.exists(&file) {
                return;
            }
            let file_name = basename(&file).to_owned();
            let file_name_dest = if dest_is_file {
                basename(ctx.dest).to_owned()
            } else {
                file_name.clone()
            };
            let dir_name_dest =
                to_portable_path(&rebase(&file, cwd, ctx.dest_root), platform).into_owned();
            resources.insert(
                file.clone(),
                ResourceEntry {
                    source: file,
                    file_name,
                    file_name_dest,
                    dir_name_dest,
                },
            );
        };
        fs.recurse(&src, &mut visit).map_err(|e| Error::Walk {
            path: src.clone(),
            message: e.to_string(),
        })?;
    } else if fs.is_file(&src) {
        let dest_path = if ctx.expanded {
            to_portable_path(ctx.dest, platform).into_owned()
        } else {
            to_portable_path(&join(ctx.dest, &src), platform).into_owned()
        };
        let entry = ResourceEntry {
            source: src.clone(),
            file_name: basename(&src).to_owned(),
            file_name_dest: basename(&dest_path).to_owned(),
            dir_name_dest: to_portable_path(&rebase(&src, cwd, ctx.dest_root), platform)
                .into_owned(),
        };
        resources.insert(src, entry);
    }

    Ok(resources.into_values().collect())
}
