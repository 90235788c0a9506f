//! Port implementations: live systems, cassette recording, cassette replay.

pub mod live;
pub mod recording;
pub mod replaying;
