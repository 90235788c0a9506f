//! Test drafting: one LLM-written test file per classified source file.
//!
//! Test files mirror the source tree under a test directory, e.g.
//! `app/dashboard/page.tsx` becomes `__tests__/app/dashboard/page.test.tsx`.

use std::path::Path;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analyze::{ComponentRecord, Role, ScanResult};
use crate::config::LlmConfig;
use crate::context::ServiceContext;
use crate::ports::CompletionRequest;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n(.*?)```").expect("fence pattern is valid")
});

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Only records with one of these roles; empty means all.
    pub roles: Vec<Role>,
    /// List planned test paths without calling the model or writing.
    pub dry_run: bool,
    /// Replace test files that already exist.
    pub overwrite: bool,
    /// Test directory relative to the project root.
    pub test_dir: String,
    /// Model settings.
    pub llm: LlmConfig,
}

/// Outcome counts of one `generate` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    /// Test files written.
    pub written: usize,
    /// Records skipped because their test file exists.
    pub skipped_existing: usize,
    /// Records whose read, completion, or write failed.
    pub failed: usize,
    /// Written test paths, or planned ones on a dry run.
    pub paths: Vec<String>,
}

/// Test file path for a project-relative source path.
///
/// `.tsx` and `.jsx` sources get a `.test.tsx` file; everything else gets
/// `.test.ts`.
#[must_use]
pub fn test_path_for(file_path: &str, test_dir: &str) -> String {
    let (dir, file_name) = file_path.rsplit_once('/').unwrap_or(("", file_path));
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (file_name, ""),
    };
    let test_ext = if ext.eq_ignore_ascii_case("tsx") || ext.eq_ignore_ascii_case("jsx") {
        "tsx"
    } else {
        "ts"
    };
    let test_dir = test_dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("{test_dir}/{stem}.test.{test_ext}")
    } else {
        format!("{test_dir}/{dir}/{stem}.test.{test_ext}")
    }
}

/// Body of the first fenced code block in `reply`, or the trimmed reply
/// when there is none. Always ends with a newline.
#[must_use]
pub fn extract_code(reply: &str) -> String {
    let body = FENCED_BLOCK
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map_or(reply, |m| m.as_str());
    let mut code = body.trim().to_string();
    code.push('\n');
    code
}

fn build_prompt(record: &ComponentRecord, source: &str) -> String {
    let list = |items: &[String]| {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        r"Write a Jest test file using React Testing Library for the following Next.js source file.

Path: {path}
Role: {role}
Rendering: {mode}
Exports: {exports}
Imports: {deps}

Source:
```
{source}
```

Import the module under test with the `@/` alias. Mock network and Next.js router
dependencies. Respond with a single fenced code block containing the whole test file.",
        path = record.file_path,
        role = record.role,
        mode = record.render_mode,
        exports = list(&record.exports),
        deps = list(&record.dependencies),
    )
}

/// Drafts a test file for each selected record in `result`.
///
/// Per-record failures are logged and counted in
/// [`GenerationSummary::failed`]; they never abort the run.
pub async fn generate(
    ctx: &ServiceContext,
    root: &Path,
    result: &ScanResult,
    options: &GenerateOptions,
) -> GenerationSummary {
    let mut summary = GenerationSummary::default();
    let selected = result
        .components
        .iter()
        .filter(|record| options.roles.is_empty() || options.roles.contains(&record.role));

    for record in selected {
        let test_path = test_path_for(&record.file_path, &options.test_dir);
        let target = root.join(&test_path);
        if !options.overwrite && ctx.fs.exists(&target) {
            debug!("{test_path} exists, skipping");
            summary.skipped_existing += 1;
            continue;
        }
        if options.dry_run {
            summary.paths.push(test_path);
            continue;
        }

        match draft(ctx, root, record, options).await {
            Ok(code) => match ctx.fs.write(&target, &code) {
                Ok(()) => {
                    info!("wrote {test_path}");
                    summary.written += 1;
                    summary.paths.push(test_path);
                }
                Err(err) => {
                    warn!("failed to write {test_path}: {err}");
                    summary.failed += 1;
                }
            },
            Err(err) => {
                warn!("failed to draft a test for {}: {err}", record.file_path);
                summary.failed += 1;
            }
        }
    }
    summary
}

async fn draft(
    ctx: &ServiceContext,
    root: &Path,
    record: &ComponentRecord,
    options: &GenerateOptions,
) -> Result<String, String> {
    let source = ctx
        .fs
        .read_to_string(&root.join(&record.file_path))
        .map_err(|e| e.to_string())?;
    let request = CompletionRequest {
        model: options.llm.model.clone(),
        prompt: build_prompt(record, &source),
        max_tokens: options.llm.max_tokens,
    };
    let response = ctx.llm.complete(&request).await.map_err(|e| e.to_string())?;
    debug!(
        "completion for {}: {} prompt token(s), {} completion token(s)",
        record.file_path, response.prompt_tokens, response.completion_tokens
    );
    Ok(extract_code(&response.text))
}
