//! Recording adapters that capture interactions to a cassette while
//! delegating to an inner implementation.

pub mod filesystem;
pub mod llm;
pub mod shell;

pub use filesystem::RecordingFileSystem;
pub use llm::RecordingLlmClient;
pub use shell::RecordingShellExecutor;

use std::sync::{Arc, Mutex};

use log::warn;
use serde::Serialize;
use serde_json::{json, Value};

use crate::cassette::recorder::CassetteRecorder;

/// Shared handle to the session recorder.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Record an interaction with an infallible return value.
///
/// Mirror of `replaying::next_value`.
pub(crate) fn record_value<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    push(recorder, port, method, to_json(input), to_json(output));
}

/// Record a fallible interaction as `{"ok": value}` or `{"err": error}`.
///
/// `encode_err` decides how the error is stored; the replaying side decodes
/// it with the matching convention.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
    encode_err: impl FnOnce(&E) -> Value,
) where
    T: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => json!({ "ok": to_json(v) }),
        Err(e) => json!({ "err": encode_err(e) }),
    };
    push(recorder, port, method, to_json(input), output);
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!("failed to serialize cassette value: {e}");
        Value::Null
    })
}

fn push(recorder: &SharedRecorder, port: &str, method: &str, input: Value, output: Value) {
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(e) => warn!("cassette recorder lock poisoned, dropping {port}::{method}: {e}"),
    }
}
