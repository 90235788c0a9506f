//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::analyze::Role;

/// Top-level CLI parser for `testforge`.
#[derive(Debug, Parser)]
#[command(
    name = "testforge",
    version,
    about = "Classify app-router projects, draft tests, and gate on coverage"
)]
pub struct Cli {
    /// Project root to operate on.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,
    /// Config file (defaults to `<root>/testforge.yaml` when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every source file and list the routes.
    Scan {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Draft test files with a language model.
    Generate {
        /// Only generate for this role (repeatable).
        #[arg(long = "role", value_parser = parse_role)]
        roles: Vec<Role>,
        /// Print the planned test paths without writing anything.
        #[arg(long)]
        dry_run: bool,
        /// Replace existing test files.
        #[arg(long)]
        overwrite: bool,
    },
    /// Run the test suite with coverage and check the totals.
    Coverage {
        /// Minimum percentage for every metric.
        #[arg(long)]
        threshold: Option<f64>,
        /// Evaluate an existing summary without running the tests.
        #[arg(long)]
        skip_run: bool,
    },
}

/// Rendering of `scan` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    Text,
    /// The scan result as pretty JSON.
    Json,
    /// The scan result as YAML.
    Yaml,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}
