//! `testforge.yaml` loading.
//!
//! Every field is optional. A missing default config file yields
//! [`Config::default`]; a config named explicitly with `--config` must exist.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analyze::ScanOptions;
use crate::error::ConfigError;
use crate::ports::FileSystem;

/// Config file looked up in the project root when `--config` is absent.
pub const CONFIG_FILE: &str = "testforge.yaml";

/// Overrides `llm.model` when set.
pub const MODEL_VAR: &str = "TESTFORGE_MODEL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language-model settings for `generate`.
    pub llm: LlmConfig,
    /// Scanner tunables.
    pub scan: ScanOptions,
    /// Test generation settings.
    pub generate: GenerateConfig,
    /// Coverage gate settings.
    pub coverage: CoverageConfig,
}

/// `llm` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Upper bound on completion length.
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self { model: "claude-sonnet-4-20250514".to_string(), max_tokens: 4096 }
    }
}

/// `generate` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory, relative to the project root, that mirrors source paths.
    pub test_dir: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self { test_dir: "__tests__".to_string() }
    }
}

/// `coverage` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Command run inside the project root to produce the summary.
    pub command: String,
    /// Summary path relative to the project root.
    pub summary_path: String,
    /// Minimum percentage for every metric.
    pub threshold: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            command: "npx jest --coverage --coverageReporters=json-summary".to_string(),
            summary_path: "coverage/coverage-summary.json".to_string(),
            threshold: 80.0,
        }
    }
}

impl Config {
    /// Loads the config for the project at `root`.
    ///
    /// `explicit` is the `--config` argument, resolved against `root` when
    /// relative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if an explicit file is missing or any
    /// config file cannot be read, and [`ConfigError::Parse`] if it is not
    /// valid YAML for this schema.
    pub fn load(
        fs: &dyn FileSystem,
        root: &Path,
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => root.join(path),
            None => {
                let path = root.join(CONFIG_FILE);
                if !fs.exists(&path) {
                    debug!("no {CONFIG_FILE} in {}, using defaults", root.display());
                    return Ok(Self::default());
                }
                path
            }
        };
        Self::read(fs, &path)
    }

    fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs
            .read_to_string(path)
            .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(&text)
            .map_err(|e| ConfigError::Parse { path: display.clone(), message: e.to_string() })?;
        debug!("loaded config from {display}");
        Ok(config)
    }

    /// Applies the `TESTFORGE_MODEL` override from the environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_model_override(std::env::var(MODEL_VAR).ok())
    }

    /// Replaces the model when `model` is a non-empty string.
    #[must_use]
    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::LiveFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&LiveFileSystem, dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.scan.reexports_as_dependencies);
        assert_eq!(config.generate.test_dir, "__tests__");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "scan:\n  reexports_as_dependencies: false\ncoverage:\n  threshold: 65\n",
        )
        .unwrap();

        let config = Config::load(&LiveFileSystem, dir.path(), None).unwrap();

        assert!(!config.scan.reexports_as_dependencies);
        assert!((config.coverage.threshold - 65.0).abs() < f64::EPSILON);
        assert_eq!(config.coverage.summary_path, "coverage/coverage-summary.json");
        assert_eq!(config.llm, LlmConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "llm: [not, a, map]\n").unwrap();

        let err = Config::load(&LiveFileSystem, dir.path(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn explicit_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            Config::load(&LiveFileSystem, dir.path(), Some(Path::new("ci.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "{err}");
    }

    #[test]
    fn model_override_ignores_blank_values() {
        let config = Config::default().with_model_override(Some("  ".into()));
        assert_eq!(config.llm.model, LlmConfig::default().model);

        let config = Config::default().with_model_override(Some("claude-haiku".into()));
        assert_eq!(config.llm.model, "claude-haiku");
    }
}
