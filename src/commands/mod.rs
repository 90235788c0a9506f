//! Command dispatch and handlers.

pub mod coverage;
pub mod generate;
pub mod scan;

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::cassette::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;

/// Records every port interaction of a run into a cassette under this directory.
pub const RECORD_VAR: &str = "TESTFORGE_RECORD";

/// Dispatch a parsed command line to its handler.
///
/// When `TESTFORGE_RECORD` is set to a directory path, all port interactions
/// are recorded to a session cassette in that directory.
///
/// # Errors
///
/// Returns an error string if the config cannot be loaded or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let (ctx, session) = if let Ok(path) = env::var(RECORD_VAR) {
        let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path), &cli.root)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(cli, &ctx);

    // Finish recording after the command completes, even on error.
    if let Some(session) = session {
        // Drop the context first to release the recorder references.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command line with the given service context.
///
/// # Errors
///
/// Returns an error string if the config cannot be loaded or the command fails.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<(), String> {
    let config = load_config(ctx, &cli.root, cli.config.as_deref())?;
    match &cli.command {
        Command::Scan { format } => scan::run(ctx, &cli.root, &config, *format),
        Command::Generate { roles, dry_run, overwrite } => {
            generate::run(ctx, &cli.root, &config, roles, *dry_run, *overwrite)
        }
        Command::Coverage { threshold, skip_run } => {
            coverage::run(ctx, &cli.root, &config, *threshold, *skip_run)
        }
    }
}

fn load_config(
    ctx: &ServiceContext,
    root: &Path,
    explicit: Option<&Path>,
) -> Result<Config, String> {
    let config = Config::load(ctx.fs.as_ref(), root, explicit)
        .map_err(|e| e.to_string())?
        .with_env();
    debug!("using model {}", config.llm.model);
    Ok(config)
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
