//! Project classifier: walks an `app/`-router project and tags every source
//! file with a role, a render mode, and its module edges.

pub mod classify;
pub mod routes;
pub mod scanner;
pub mod syntax;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

pub use scanner::scan;

/// Extensions of files the classifier reads.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Where a component executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rendered on the server (no `"use client"` directive).
    Server,
    /// Shipped to and rendered in the browser.
    Client,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Server => "server",
            Self::Client => "client",
        })
    }
}

/// Semantic role of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// `page.*` route entry.
    Page,
    /// `layout.*` route wrapper.
    Layout,
    /// UI component.
    Component,
    /// `use*` hook.
    Hook,
    /// Library or helper module.
    Utility,
    /// Server action module.
    ServerAction,
    /// `route.*` request handler.
    RouteHandler,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 7] = [
        Role::Page,
        Role::Layout,
        Role::Component,
        Role::Hook,
        Role::Utility,
        Role::ServerAction,
        Role::RouteHandler,
    ];

    /// Kebab-case name used in output and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Layout => "layout",
            Self::Component => "component",
            Self::Hook => "hook",
            Self::Utility => "utility",
            Self::ServerAction => "server-action",
            Self::RouteHandler => "route-handler",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL.into_iter().find(|role| role.as_str() == s).ok_or_else(|| {
            let names: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
            format!("unknown role `{s}` (expected one of: {})", names.join(", "))
        })
    }
}

/// One source file read during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Project-relative, `/`-separated path.
    pub path: String,
    /// File name without its final extension.
    pub name: String,
    /// Raw file text.
    pub text: String,
}

/// Classification of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Project-relative path; unique within a scan.
    pub file_path: String,
    /// File name without extension.
    pub name: String,
    /// Server or client rendering.
    pub render_mode: RenderMode,
    /// Semantic role.
    pub role: Role,
    /// Import (and, by default, re-export) specifiers in source order.
    pub dependencies: Vec<String>,
    /// Exported names in source order; `"default"` marks a default export.
    pub exports: Vec<String>,
}

/// Everything one scan learned about a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Project root as given to the scan.
    pub root: String,
    /// Whether the root uses the `app/` routing layout.
    pub app_router: bool,
    /// Classified files in discovery order.
    pub components: Vec<ComponentRecord>,
    /// Route paths derived from `app/**/page.*`, in discovery order.
    pub routes: Vec<String>,
}

/// Why a file was left out of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    /// Reading the file failed.
    Unreadable,
    /// The file did not parse.
    Unparsable,
}

/// A file excluded from the result, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Project-relative path.
    pub path: String,
    /// Failure category.
    pub kind: SkipKind,
    /// Human-readable cause.
    pub reason: String,
}

impl SkippedFile {
    /// Converts a per-file scan error; fatal errors yield `None`.
    #[must_use]
    pub fn from_error(err: &ScanError) -> Option<Self> {
        match err {
            ScanError::UnreadableFile { path, source } => Some(Self {
                path: path.clone(),
                kind: SkipKind::Unreadable,
                reason: source.to_string(),
            }),
            ScanError::UnparsableFile { path, reason } => Some(Self {
                path: path.clone(),
                kind: SkipKind::Unparsable,
                reason: reason.clone(),
            }),
            ScanError::UnsupportedLayout { .. } | ScanError::Discovery { .. } => None,
        }
    }
}

/// A scan result together with the files it had to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// The reproducible scan output.
    pub result: ScanResult,
    /// Per-file failures, in discovery order.
    pub skipped: Vec<SkippedFile>,
}

/// Tunables for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Count `export ... from "x"` as a dependency on `x`.
    pub reexports_as_dependencies: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { reexports_as_dependencies: true }
    }
}
