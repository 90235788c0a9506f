//! Recording session shared by every recording adapter of one run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::warn;

use super::recorder::CassetteRecorder;

/// File name of the cassette written by a session.
pub const SESSION_CASSETTE: &str = "session.cassette.yaml";

/// Owns the recorder that all recording adapters append to.
///
/// Cassettes land in a timestamped directory under the base directory given
/// to [`RecordingSession::new`], so a later run can replay them with
/// [`ServiceContext::replaying`](crate::context::ServiceContext::replaying).
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing to `<base>/<timestamp>/session.cassette.yaml`.
    ///
    /// `project_root` is only used to stamp the cassette with its git commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamped directory already exists or cannot
    /// be created.
    pub fn new(base: &Path, project_root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = base.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("failed to create cassette directory: {e}"))?;

        let recorder = CassetteRecorder::new(
            output_dir.join(SESSION_CASSETTE),
            format!("{timestamp}-session"),
            commit_hash(project_root),
        );
        Ok(Self { recorder: Arc::new(Mutex::new(recorder)), output_dir })
    }

    /// Handle for recording adapters.
    #[must_use]
    pub fn recorder(&self) -> Arc<Mutex<CassetteRecorder>> {
        Arc::clone(&self.recorder)
    }

    /// Directory the cassette is written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the cassette to disk.
    ///
    /// Every adapter holding a recorder handle must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds the recorder or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "recording adapters still hold the session recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("failed to write cassette: {e}"))?;
        Ok(self.output_dir)
    }
}

/// Git commit of the project, or `"unknown"` with a warning if unavailable.
fn commit_hash(project_root: &Path) -> String {
    let hash = std::process::Command::new("git")
        .arg("-C")
        .arg(project_root)
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!("could not read git commit of {}, using 'unknown'", project_root.display());
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_writes_one_cassette_for_all_ports() {
        let base = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(base.path(), base.path()).unwrap();

        {
            let recorder = session.recorder();
            let mut guard = recorder.lock().unwrap();
            guard.record("fs", "exists", json!({"path": "/p"}), json!(true));
            guard.record("shell", "run", json!({"command": "true"}), json!({"ok": {}}));
        }

        let dir = session.finish().unwrap();
        let cassette = crate::cassette::Cassette::load(&dir.join(SESSION_CASSETTE)).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert!(!cassette.commit.is_empty());
    }

    #[test]
    fn finish_fails_while_adapter_holds_recorder() {
        let base = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(base.path(), base.path()).unwrap();
        let _held = session.recorder();

        assert!(session.finish().is_err());
    }
}
