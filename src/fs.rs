//! File-system primitives used by resolution and the copy engine.
//!
//! [`FileSystem`] is the seam between the engine and storage. The engine
//! only ever asks these six questions, so tests can substitute an
//! in-memory implementation and force platform-specific path shapes.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Storage operations the engine depends on.
///
/// Paths are strings in whatever form the matcher and resolver produced;
/// implementations interpret them relative to the process working directory.
pub trait FileSystem: Send + Sync {
    /// Whether anything exists at `path` (following symlinks).
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Whether `path` is a regular file.
    fn is_file(&self, path: &str) -> bool;

    /// Call `visitor` with every file below `dir`, recursively.
    ///
    /// Paths passed to the visitor start with `dir`.
    fn recurse(&self, dir: &str, visitor: &mut dyn FnMut(String)) -> io::Result<()>;

    /// Read a whole file.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Write a whole file, creating parent directories as needed.
    fn write(&self, path: &str, content: &[u8]) -> io::Result<()>;
}

/// The local disk.
///
/// Writes go to a temporary file in the destination directory which is then
/// renamed over the target, so a destination never holds a partial file.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    fsync: bool,
}

impl LocalFileSystem {
    /// Create a local file system, syncing each write to disk if `fsync`.
    #[must_use]
    pub fn new(fsync: bool) -> Self {
        Self { fsync }
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn is_file(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn recurse(&self, dir: &str, visitor: &mut dyn FnMut(String)) -> io::Result<()> {
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                visitor(entry.path().to_string_lossy().into_owned());
            }
        }
        Ok(())
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &str, content: &[u8]) -> io::Result<()> {
        use std::io::Write;

        let dst = Path::new(path);
        let dst_parent = match dst.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dst_parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(dst_parent)?;
        temp_file.write_all(content)?;

        // Ensure data is on disk before rename
        if self.fsync {
            temp_file.as_file().sync_all()?;
        }

        temp_file.persist(dst).map_err(|e| e.error)?;
        Ok(())
    }
}
