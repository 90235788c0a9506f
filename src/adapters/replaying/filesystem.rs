//! Replaying adapter for the `FileSystem` port.

use std::path::Path;

use serde_json::Value;

use super::{next_value, replay_result, SharedReplayer};
use crate::error::FsError;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: SharedReplayer,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a shared cassette replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }

    fn replay<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, FsError> {
        let output = next_value(&self.replayer, "fs", method);
        replay_result(output, method, decode_fs_error)
    }
}

/// Recorded errors are serialized [`FsError`]s; a plain string becomes
/// [`FsError::Io`].
fn decode_fs_error(value: Value) -> FsError {
    match value {
        Value::String(message) => FsError::Io { path: String::new(), message },
        other => serde_json::from_value(other.clone()).unwrap_or_else(|_| FsError::Io {
            path: String::new(),
            message: other.to_string(),
        }),
    }
}

impl FileSystem for ReplayingFileSystem {
    fn check_dir(&self, _path: &Path) -> Result<(), FsError> {
        self.replay("check_dir")
    }

    fn find_files(
        &self,
        _root: &Path,
        _subdir: &str,
        _extensions: &[&str],
    ) -> Result<Vec<String>, FsError> {
        self.replay("find_files")
    }

    fn read_to_string(&self, _path: &Path) -> Result<String, FsError> {
        self.replay("read_to_string")
    }

    fn write(&self, _path: &Path, _contents: &str) -> Result<(), FsError> {
        self.replay("write")
    }

    fn exists(&self, _path: &Path) -> bool {
        let output = next_value(&self.replayer, "fs", "exists");
        output.as_bool().expect("fs::exists: expected boolean output")
    }
}
