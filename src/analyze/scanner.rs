//! The `scan` operation: discovery, reading, parsing, classification.

use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;

use super::classify;
use super::routes::{self, APP_DIR};
use super::syntax::{SourceKind, SyntaxParser};
use super::{
    ComponentRecord, ScanOptions, ScanReport, ScanResult, SkippedFile, SourceFile,
    SOURCE_EXTENSIONS,
};
use crate::error::{FsError, ScanError};
use crate::ports::FileSystem;

/// Source subtrees, in discovery order. Only `app/` is required.
const SOURCE_DIRS: [&str; 3] = [APP_DIR, "components", "lib"];

/// Scans the project at `root`.
///
/// Reads through `fs` only; never writes. Files that cannot be read or
/// parsed are left out of the result and listed in
/// [`ScanReport::skipped`].
///
/// # Errors
///
/// Returns [`ScanError::UnsupportedLayout`] when `root/app` is not a
/// directory, and [`ScanError::Discovery`] when a source subtree cannot be
/// walked. No partial result is produced in either case.
pub fn scan(
    fs: &dyn FileSystem,
    root: &Path,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    check_layout(fs, root)?;

    let paths = discover(fs, root)?;
    let routes = routes::discover_routes(&paths);

    let mut skipped = Vec::new();
    let mut sources = Vec::with_capacity(paths.len());
    for (index, path) in paths.into_iter().enumerate() {
        match fs.read_to_string(&root.join(&path)) {
            Ok(text) => sources.push((index, SourceFile { name: base_name(&path), path, text })),
            Err(source) => skip(&mut skipped, index, &ScanError::UnreadableFile { path, source }),
        }
    }

    let reexports = options.reexports_as_dependencies;
    let classified: Vec<(usize, Result<ComponentRecord, ScanError>)> = sources
        .into_par_iter()
        .map_init(
            || SyntaxParser::new().map_err(|e| e.to_string()),
            |parser, (index, file)| (index, classify_file(parser, file, reexports)),
        )
        .collect();

    let mut components = Vec::with_capacity(classified.len());
    for (index, outcome) in classified {
        match outcome {
            Ok(record) => components.push(record),
            Err(err) => skip(&mut skipped, index, &err),
        }
    }
    // Read failures are collected before parse failures.
    skipped.sort_by_key(|(index, _)| *index);
    let skipped: Vec<SkippedFile> = skipped.into_iter().map(|(_, entry)| entry).collect();

    info!(
        "scanned {}: {} file(s) classified, {} skipped, {} route(s)",
        root.display(),
        components.len(),
        skipped.len(),
        routes.len()
    );

    Ok(ScanReport {
        result: ScanResult {
            root: root.display().to_string(),
            app_router: true,
            components,
            routes,
        },
        skipped,
    })
}

fn check_layout(fs: &dyn FileSystem, root: &Path) -> Result<(), ScanError> {
    fs.check_dir(&root.join(APP_DIR)).map_err(|err| {
        let reason = match err {
            FsError::NotFound { .. } => format!("no `{APP_DIR}/` directory"),
            FsError::NotADirectory { .. } => format!("`{APP_DIR}` is not a directory"),
            other => other.to_string(),
        };
        ScanError::UnsupportedLayout { root: root.display().to_string(), reason }
    })
}

/// All source paths: `app/` first, then `components/`, then `lib/`.
fn discover(fs: &dyn FileSystem, root: &Path) -> Result<Vec<String>, ScanError> {
    let mut paths = Vec::new();
    for dir in SOURCE_DIRS {
        match fs.find_files(root, dir, SOURCE_EXTENSIONS) {
            Ok(found) => {
                debug!("discovered {} source file(s) under {dir}/", found.len());
                paths.extend(found);
            }
            Err(FsError::NotFound { .. } | FsError::NotADirectory { .. }) if dir != APP_DIR => {
                debug!("no {dir}/ directory, skipping");
            }
            Err(source) => return Err(ScanError::Discovery { source }),
        }
    }
    Ok(paths)
}

fn classify_file(
    parser: &mut Result<SyntaxParser, String>,
    file: SourceFile,
    reexports: bool,
) -> Result<ComponentRecord, ScanError> {
    let parser = parser
        .as_mut()
        .map_err(|e| ScanError::UnparsableFile { path: file.path.clone(), reason: e.clone() })?;
    let edges = parser
        .module_edges(&file.text, SourceKind::for_path(&file.path), reexports)
        .map_err(|reason| ScanError::UnparsableFile { path: file.path.clone(), reason })?;

    Ok(ComponentRecord {
        role: classify::role(&file.path),
        render_mode: classify::render_mode(&file.text),
        file_path: file.path,
        name: file.name,
        dependencies: edges.dependencies,
        exports: edges.exports,
    })
}

fn skip(skipped: &mut Vec<(usize, SkippedFile)>, index: usize, err: &ScanError) {
    warn!("skipping {err}");
    if let Some(entry) = SkippedFile::from_error(err) {
        skipped.push((index, entry));
    }
}

/// File name without its final extension.
fn base_name(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}
