//! Filesystem port for project discovery and file I/O.

use std::path::Path;

use crate::error::FsError;

/// Provides filesystem access for scanning a project and writing test drafts.
///
/// Abstracting the filesystem allows deterministic replay and testing
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Checks that `path` exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] when nothing exists at `path` and
    /// [`FsError::NotADirectory`] when something other than a directory does.
    fn check_dir(&self, path: &Path) -> Result<(), FsError>;

    /// Recursively lists files under `root/subdir` whose extension is one of
    /// `extensions`.
    ///
    /// Returned paths are relative to `root` and `/`-separated, in walk order
    /// with entries sorted by file name. Directories named `node_modules` are
    /// never entered and symlinks are not followed.
    ///
    /// # Errors
    ///
    /// Returns an error if `root/subdir` is missing or cannot be walked.
    fn find_files(
        &self,
        root: &Path,
        subdir: &str,
        extensions: &[&str],
    ) -> Result<Vec<String>, FsError>;

    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is not
    /// valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, FsError>;

    /// Writes the given contents to a file, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;
}
