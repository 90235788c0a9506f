//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::path::Path;

use log::{trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::FsError;
use crate::ports::filesystem::FileSystem;

/// Directory names that are never descended into during discovery.
const VENDOR_DIRS: &[&str] = &["node_modules"];

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn check_dir(&self, path: &Path) -> Result<(), FsError> {
        let meta = std::fs::metadata(path).map_err(|e| FsError::from_io(path, &e))?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(FsError::NotADirectory { path: path.display().to_string() })
        }
    }

    fn find_files(
        &self,
        root: &Path,
        subdir: &str,
        extensions: &[&str],
    ) -> Result<Vec<String>, FsError> {
        let base = root.join(subdir);
        self.check_dir(&base)?;

        let mut files = Vec::new();
        let walker = WalkDir::new(&base)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && e.file_name().to_str().is_some_and(|name| VENDOR_DIRS.contains(&name)))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&base).display().to_string();
                    warn!("skipping {path} during discovery: {e}");
                    continue;
                }
            };
            if !is_source_file(&entry) {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)));
            if !matches {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            trace!("found source file {relative}");
            files.push(relative);
        }
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        std::fs::read_to_string(path).map_err(|e| FsError::from_io(path, &e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FsError::from_io(parent, &e))?;
        }
        std::fs::write(path, contents).map_err(|e| FsError::from_io(path, &e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Regular files and links to regular files count; directory links are not
/// descended into.
fn is_source_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match std::fs::metadata(entry.path()) {
        Ok(meta) if meta.is_file() => true,
        Ok(meta) if meta.is_dir() => {
            warn!("not following directory link {}", entry.path().display());
            false
        }
        Ok(_) => false,
        Err(e) => {
            warn!("skipping broken link {}: {e}", entry.path().display());
            false
        }
    }
}
