//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Raised when code asks a cassette for an interaction it does not hold.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// Nothing was ever recorded for this port/method pair.
    #[error(
        "cassette has no interactions for {port}::{method}; recorded pairs: [{available}]"
    )]
    Unrecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Comma-separated `port::method` pairs present in the cassette.
        available: String,
    },
    /// Every recorded interaction for the pair has already been served.
    #[error("cassette exhausted: all {count} {port}::{method} interactions consumed")]
    Exhausted {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// How many were recorded.
        count: usize,
    },
}

/// Serves interactions from a loaded cassette, in recording order, per
/// port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), Vec<Interaction>>,
    cursors: HashMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push(interaction.clone());
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Returns the output of the next interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReplayError`] naming what was requested when the cassette
    /// has no (more) interactions for the pair.
    pub fn next_output(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<serde_json::Value, ReplayError> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(ReplayError::Unrecorded {
                port: port.to_string(),
                method: method.to_string(),
                available: available.join(", "),
            });
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(ReplayError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
                count: queue.len(),
            });
        };
        *cursor += 1;
        Ok(interaction.output.clone())
    }
}
