//! `testforge coverage` command.

use std::path::Path;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::coverage::{self, CoverageOptions, CoverageVerdict};

/// Execute the `coverage` command.
///
/// `threshold` overrides `coverage.threshold` from the config.
///
/// # Errors
///
/// Returns an error string if the check cannot run or any metric is below
/// the threshold.
pub fn run(
    ctx: &ServiceContext,
    root: &Path,
    config: &Config,
    threshold: Option<f64>,
    skip_run: bool,
) -> Result<(), String> {
    let mut coverage_config = config.coverage.clone();
    if let Some(threshold) = threshold {
        coverage_config.threshold = threshold;
    }
    let options = CoverageOptions { config: coverage_config, skip_run };

    let verdict = coverage::check(ctx, root, &options).map_err(|e| e.to_string())?;
    println!("{}", format_verdict(&verdict));

    if verdict.pass {
        Ok(())
    } else {
        let failing: Vec<&str> = verdict.failing.iter().map(|m| m.as_str()).collect();
        Err(format!(
            "coverage below {}% for: {}",
            verdict.threshold,
            failing.join(", ")
        ))
    }
}

fn format_verdict(verdict: &CoverageVerdict) -> String {
    let mut lines: Vec<String> = verdict
        .metrics
        .iter()
        .map(|m| {
            let mark = if verdict.failing.contains(&m.metric) { "FAIL" } else { "ok" };
            format!("  {:<10} {:>6.2}%  {mark}", m.metric.as_str(), m.pct)
        })
        .collect();
    let status = if verdict.pass { "passed" } else { "failed" };
    lines.insert(0, format!("Coverage {status} (threshold {}%):", verdict.threshold));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    const SUMMARY: &str = r#"{"total": {
        "lines": {"total": 10, "covered": 9, "pct": 90},
        "statements": {"total": 10, "covered": 9, "pct": 90},
        "functions": {"total": 4, "covered": 3, "pct": 75},
        "branches": {"total": 8, "covered": 8, "pct": 100}
    }}"#;

    fn summary_only() -> ServiceContext {
        ServiceContext::from_cassette(&Cassette {
            name: "cli-coverage".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "fs".into(),
                method: "read_to_string".into(),
                input: json!({"path": "/project/coverage/coverage-summary.json"}),
                output: json!({"ok": SUMMARY}),
            }],
        })
    }

    #[test]
    fn fails_naming_the_low_metric() {
        let err = run(&summary_only(), Path::new("/project"), &Config::default(), None, true)
            .unwrap_err();
        assert_eq!(err, "coverage below 80% for: functions");
    }

    #[test]
    fn threshold_flag_overrides_config() {
        let result = run(&summary_only(), Path::new("/project"), &Config::default(), Some(70.0), true);
        assert!(result.is_ok());
    }

    #[test]
    fn verdict_table_marks_failures() {
        let verdict = coverage::verdict(
            coverage::parse_summary(SUMMARY, "s.json").unwrap(),
            80.0,
        );
        let text = format_verdict(&verdict);
        assert!(text.starts_with("Coverage failed (threshold 80%):"), "{text}");
        assert!(text.contains("functions   75.00%  FAIL"), "{text}");
        assert!(text.contains("lines       90.00%  ok"), "{text}");
    }
}
