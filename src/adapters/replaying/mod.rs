//! Replaying adapters that serve recorded interactions from a cassette.

pub mod filesystem;
pub mod llm;
pub mod shell;

pub use filesystem::ReplayingFileSystem;
pub use llm::ReplayingLlmClient;
pub use shell::ReplayingShellExecutor;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;

/// Shared handle to the cassette replayer.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Pull the next recorded output for `port`/`method`.
///
/// # Panics
///
/// Panics when the cassette does not hold the interaction. A replayed run
/// that diverges from its recording is a broken fixture, not a runtime
/// condition to recover from.
pub(crate) fn next_value(replayer: &SharedReplayer, port: &str, method: &str) -> Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_output(port, method).unwrap_or_else(|e| panic!("{e}"))
}

/// Decode a `{"ok": ..}` / `{"err": ..}` output recorded by
/// `recording::record_result`.
///
/// A bare value without either key is treated as `ok`, which keeps
/// hand-written cassettes short.
pub(crate) fn replay_result<T, E>(
    output: Value,
    context: &str,
    decode_err: impl FnOnce(Value) -> E,
) -> Result<T, E>
where
    T: DeserializeOwned,
{
    if let Value::Object(mut map) = output {
        if let Some(err) = map.remove("err") {
            return Err(decode_err(err));
        }
        let value = map.remove("ok").unwrap_or(Value::Object(map));
        return Ok(decode(value, context));
    }
    Ok(decode(output, context))
}

fn decode<T: DeserializeOwned>(value: Value, context: &str) -> T {
    serde_json::from_value(value)
        .unwrap_or_else(|e| panic!("{context}: cassette output has the wrong shape: {e}"))
}
