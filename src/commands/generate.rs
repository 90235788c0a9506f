//! `testforge generate` command.

use std::path::Path;

use crate::analyze::{self, Role};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::generate::{self, GenerateOptions, GenerationSummary};

/// Execute the `generate` command.
///
/// Scans the project, then drafts a test for every selected file on a
/// current-thread runtime, one request at a time.
///
/// # Errors
///
/// Returns an error string if the scan fails, the runtime cannot start, or
/// any test could not be drafted.
pub fn run(
    ctx: &ServiceContext,
    root: &Path,
    config: &Config,
    roles: &[Role],
    dry_run: bool,
    overwrite: bool,
) -> Result<(), String> {
    let report = analyze::scan(ctx.fs.as_ref(), root, &config.scan).map_err(|e| e.to_string())?;
    if !report.skipped.is_empty() {
        eprint!("{}", super::scan::format_skipped(&report));
    }

    let options = GenerateOptions {
        roles: roles.to_vec(),
        dry_run,
        overwrite,
        test_dir: config.generate.test_dir.clone(),
        llm: config.llm.clone(),
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    let summary = runtime.block_on(generate::generate(ctx, root, &report.result, &options));

    println!("{}", format_summary(&summary, dry_run));
    if summary.failed > 0 {
        return Err(format!("{} test file(s) could not be generated", summary.failed));
    }
    Ok(())
}

fn format_summary(summary: &GenerationSummary, dry_run: bool) -> String {
    let mut lines = Vec::new();
    if dry_run {
        lines.push(format!("Dry run, would write {} test file(s):", summary.paths.len()));
    } else {
        lines.push(format!(
            "Generated {} test file(s), {} already present, {} failed",
            summary.written, summary.skipped_existing, summary.failed
        ));
    }
    lines.extend(summary.paths.iter().map(|path| format!("  {path}")));
    lines.join("\n")
}
