//! `testforge scan` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::analyze::{self, ScanReport};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::context::ServiceContext;

/// Execute the `scan` command.
///
/// The result goes to stdout in the requested format; the skipped-file
/// summary goes to stderr so JSON and YAML output stay parseable.
///
/// # Errors
///
/// Returns an error string if the project layout is unsupported, discovery
/// fails, or the result cannot be serialized.
pub fn run(
    ctx: &ServiceContext,
    root: &Path,
    config: &Config,
    format: OutputFormat,
) -> Result<(), String> {
    let report = analyze::scan(ctx.fs.as_ref(), root, &config.scan).map_err(|e| e.to_string())?;
    print!("{}", render(&report, format)?);
    eprint!("{}", format_skipped(&report));
    Ok(())
}

/// Renders the scan result in `format`.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render(report: &ScanReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => Ok(format_text(report)),
        OutputFormat::Json => serde_json::to_string_pretty(&report.result)
            .map(|json| json + "\n")
            .map_err(|e| format!("failed to serialize scan result: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(&report.result)
            .map_err(|e| format!("failed to serialize scan result: {e}")),
    }
}

fn format_text(report: &ScanReport) -> String {
    let result = &report.result;
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", result.root);

    let _ = writeln!(out, "\nRoutes ({}):", result.routes.len());
    for route in &result.routes {
        let _ = writeln!(out, "  {route}");
    }

    let _ = writeln!(out, "\nFiles ({}):", result.components.len());
    let width = result.components.iter().map(|c| c.file_path.len()).max().unwrap_or(0);
    for record in &result.components {
        let _ = write!(
            out,
            "  {:<width$}  {:<13}  {:<6}",
            record.file_path,
            record.role.as_str(),
            record.render_mode.to_string()
        );
        if !record.exports.is_empty() {
            let _ = write!(out, "  exports: {}", record.exports.join(", "));
        }
        if !record.dependencies.is_empty() {
            let _ = write!(out, "  imports: {}", record.dependencies.join(", "));
        }
        out.push('\n');
    }
    out
}

/// `N file(s) skipped` followed by one line per skipped file.
#[must_use]
pub fn format_skipped(report: &ScanReport) -> String {
    let mut out = format!("{} file(s) skipped\n", report.skipped.len());
    for skipped in &report.skipped {
        let kind = match skipped.kind {
            analyze::SkipKind::Unreadable => "unreadable",
            analyze::SkipKind::Unparsable => "unparsable",
        };
        let _ = writeln!(out, "  {} ({kind}): {}", skipped.path, skipped.reason);
    }
    out
}
