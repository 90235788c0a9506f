//! Coverage gate: run the test runner, then hold its summary to a threshold.

use std::fmt;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CoverageConfig;
use crate::context::ServiceContext;
use crate::error::CoverageError;

/// A coverage dimension reported in the `total` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Line coverage.
    Lines,
    /// Statement coverage.
    Statements,
    /// Function coverage.
    Functions,
    /// Branch coverage.
    Branches,
}

impl Metric {
    /// Every metric, in report order.
    pub const ALL: [Self; 4] = [Self::Lines, Self::Statements, Self::Functions, Self::Branches];

    /// Key used in the summary file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Statements => "statements",
            Self::Functions => "functions",
            Self::Branches => "branches",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured percentage for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricResult {
    /// Which metric.
    pub metric: Metric,
    /// Covered percentage, 0 to 100.
    pub pct: f64,
}

/// Pass/fail outcome of a coverage check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageVerdict {
    /// True when every metric meets the threshold.
    pub pass: bool,
    /// Threshold the metrics were held to.
    pub threshold: f64,
    /// All measured metrics.
    pub metrics: Vec<MetricResult>,
    /// Metrics below the threshold.
    pub failing: Vec<Metric>,
}

/// How to run a coverage check.
#[derive(Debug, Clone)]
pub struct CoverageOptions {
    /// Runner command and summary location.
    pub config: CoverageConfig,
    /// Read an existing summary without running the command.
    pub skip_run: bool,
}

#[derive(Deserialize)]
struct SummaryFile {
    total: Totals,
}

#[derive(Deserialize)]
struct Totals {
    lines: Counter,
    statements: Counter,
    functions: Counter,
    branches: Counter,
}

#[derive(Deserialize)]
struct Counter {
    #[serde(default)]
    total: u64,
    pct: Value,
}

impl Totals {
    fn counter(&self, metric: Metric) -> &Counter {
        match metric {
            Metric::Lines => &self.lines,
            Metric::Statements => &self.statements,
            Metric::Functions => &self.functions,
            Metric::Branches => &self.branches,
        }
    }
}

/// Parses the `total` block of a `json-summary` report.
///
/// A metric with nothing to cover (`"pct": "Unknown"`, `total: 0`) counts as
/// fully covered.
///
/// # Errors
///
/// Returns [`CoverageError::MalformedSummary`] if the text is not a summary
/// or a percentage is neither a number nor the empty-metric marker.
pub fn parse_summary(text: &str, path: &str) -> Result<Vec<MetricResult>, CoverageError> {
    let malformed = |message: String| CoverageError::MalformedSummary {
        path: path.to_string(),
        message,
    };
    let summary: SummaryFile = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;

    Metric::ALL
        .iter()
        .map(|&metric| {
            let counter = summary.total.counter(metric);
            let pct = match &counter.pct {
                Value::Number(n) => n.as_f64(),
                Value::String(_) if counter.total == 0 => Some(100.0),
                _ => None,
            }
            .ok_or_else(|| malformed(format!("invalid pct for {metric}: {}", counter.pct)))?;
            Ok(MetricResult { metric, pct })
        })
        .collect()
}

/// Holds `metrics` to `threshold`.
#[must_use]
pub fn verdict(metrics: Vec<MetricResult>, threshold: f64) -> CoverageVerdict {
    let failing: Vec<Metric> =
        metrics.iter().filter(|m| m.pct < threshold).map(|m| m.metric).collect();
    CoverageVerdict { pass: failing.is_empty(), threshold, metrics, failing }
}

/// Runs the coverage command in `root` and evaluates the summary it leaves.
///
/// A non-zero exit from the runner is only a warning; failing tests still
/// produce a usable summary.
///
/// # Errors
///
/// Returns [`CoverageError::Command`] if the command cannot be executed,
/// [`CoverageError::MissingSummary`] if no summary can be read, and
/// [`CoverageError::MalformedSummary`] if it cannot be parsed.
pub fn check(
    ctx: &ServiceContext,
    root: &Path,
    options: &CoverageOptions,
) -> Result<CoverageVerdict, CoverageError> {
    let config = &options.config;
    if options.skip_run {
        debug!("skipping coverage run, reading existing summary");
    } else {
        let command = format!("cd {} && {}", shell_quote(&root.display().to_string()), config.command);
        info!("running {}", config.command);
        let output = ctx.shell.run(&command).map_err(|e| CoverageError::Command {
            command: config.command.clone(),
            message: e.to_string(),
        })?;
        if !output.success() {
            warn!(
                "coverage command exited with {}: {}",
                output.exit_code,
                output.stderr.lines().last().unwrap_or_default()
            );
        }
    }

    let summary_path = root.join(&config.summary_path);
    let display = summary_path.display().to_string();
    let text = ctx
        .fs
        .read_to_string(&summary_path)
        .map_err(|source| CoverageError::MissingSummary { path: display.clone(), source })?;
    let metrics = parse_summary(&text, &display)?;
    Ok(verdict(metrics, config.threshold))
}

/// Single-quotes `s` for `sh`.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
