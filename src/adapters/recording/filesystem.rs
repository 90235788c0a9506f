//! Recording adapter for the `FileSystem` port.

use std::path::Path;

use serde::Serialize;

use super::{record_result, record_value, SharedRecorder};
use crate::error::FsError;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: SharedRecorder,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }

    fn record<T: Serialize, I: Serialize>(
        &self,
        method: &str,
        input: &I,
        result: &Result<T, FsError>,
    ) {
        record_result(&self.recorder, "fs", method, input, result, |e| {
            serde_json::to_value(e).unwrap_or(serde_json::Value::Null)
        });
    }
}

#[derive(Serialize)]
struct PathInput {
    path: String,
}

impl PathInput {
    fn new(path: &Path) -> Self {
        Self { path: path.display().to_string() }
    }
}

#[derive(Serialize)]
struct FindInput<'a> {
    root: String,
    subdir: &'a str,
    extensions: &'a [&'a str],
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: String,
    contents: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn check_dir(&self, path: &Path) -> Result<(), FsError> {
        let result = self.inner.check_dir(path);
        self.record("check_dir", &PathInput::new(path), &result);
        result
    }

    fn find_files(
        &self,
        root: &Path,
        subdir: &str,
        extensions: &[&str],
    ) -> Result<Vec<String>, FsError> {
        let result = self.inner.find_files(root, subdir, extensions);
        let input = FindInput { root: root.display().to_string(), subdir, extensions };
        self.record("find_files", &input, &result);
        result
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        let result = self.inner.read_to_string(path);
        self.record("read_to_string", &PathInput::new(path), &result);
        result
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: path.display().to_string(), contents };
        self.record("write", &input, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        record_value(&self.recorder, "fs", "exists", &PathInput::new(path), &result);
        result
    }
}
