//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{LiveFileSystem, LiveLlmClient, LiveShellExecutor};
use crate::adapters::recording::{RecordingFileSystem, RecordingLlmClient, RecordingShellExecutor};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingLlmClient, ReplayingShellExecutor};
use crate::cassette::{Cassette, CassetteReplayer, RecordingSession};
use crate::ports::{FileSystem, LlmClient, ShellExecutor};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Filesystem for discovery and file I/O.
    pub fs: Box<dyn FileSystem>,
    /// LLM client for drafting tests.
    pub llm: Box<dyn LlmClient>,
    /// Shell executor for the coverage runner.
    pub shell: Box<dyn ShellExecutor>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            llm: Box::new(LiveLlmClient::new()),
            shell: Box::new(LiveShellExecutor),
        }
    }

    /// Creates a recording context: live adapters whose interactions are
    /// captured into a session cassette under `base`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(base: &Path, project_root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base, project_root)?;
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(Box::new(LiveFileSystem), session.recorder())),
            llm: Box::new(RecordingLlmClient::new(
                Box::new(LiveLlmClient::new()),
                session.recorder(),
            )),
            shell: Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor),
                session.recorder(),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// All ports share one replayer; each port/method pair keeps its own
    /// cursor, so interleaving between ports does not matter.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an in-memory cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(cassette)));
        Self {
            fs: Box::new(ReplayingFileSystem::new(Arc::clone(&replayer))),
            llm: Box::new(ReplayingLlmClient::new(Arc::clone(&replayer))),
            shell: Box::new(ReplayingShellExecutor::new(replayer)),
        }
    }
}
