//! Cassette data structures.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number across the whole cassette.
    pub seq: u64,
    /// Port name (`"fs"`, `"llm"`, `"shell"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port, `{"ok": ..}` or `{"err": ..}` for
    /// fallible methods.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit of the scanned project at recording time, or `"unknown"`.
    pub commit: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Loads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read cassette {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("failed to parse cassette {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_reads_yaml_written_by_serde() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.cassette.yaml");
        let cassette = Cassette {
            name: "scan".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "fs".into(),
                method: "check_dir".into(),
                input: json!({"path": "/project/app"}),
                output: json!({"ok": null}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        assert_eq!(Cassette::load(&path).unwrap(), cassette);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.contains("failed to read cassette"));
    }
}
