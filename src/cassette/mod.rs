//! Cassette format for recording and replaying port interactions.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::{CassetteReplayer, ReplayError};
pub use session::RecordingSession;
