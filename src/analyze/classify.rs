//! Path and text rules that assign roles and render modes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{RenderMode, Role};

/// A `"use client"` or `'use client'` directive opening a line.
///
/// Same-line block comments may precede it, and a `;` or comment may follow.
static USE_CLIENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^(?:[ \t]|/\*.*?\*/)*(?:"use client"|'use client')[ \t]*(?:;|//|/\*|\r?$)"#,
    )
    .expect("directive pattern is valid")
});

/// Render mode from the raw file text.
///
/// This is a textual scan rather than a syntax-tree check so the directive is
/// found even when the file fails to parse or the directive is not first.
#[must_use]
pub fn render_mode(text: &str) -> RenderMode {
    if USE_CLIENT.is_match(text) {
        RenderMode::Client
    } else {
        RenderMode::Server
    }
}

/// Role of the file at `path` (project-relative, `/`-separated).
///
/// Rules are tried in order and the first match wins.
#[must_use]
pub fn role(path: &str) -> Role {
    let (dirs, file_name) = match path.rsplit_once('/') {
        Some((dirs, name)) => (dirs, name),
        None => ("", path),
    };
    let in_dir = |segment: &str| dirs.split('/').any(|d| d == segment);

    if file_name.starts_with("page.") {
        Role::Page
    } else if file_name.starts_with("layout.") {
        Role::Layout
    } else if file_name.starts_with("route.") {
        Role::RouteHandler
    } else if in_dir("components") {
        Role::Component
    } else if in_dir("hooks") || file_name.starts_with("use") {
        Role::Hook
    } else if in_dir("lib") || in_dir("utils") {
        Role::Utility
    } else if file_name.contains("actions") || in_dir("actions") {
        Role::ServerAction
    } else {
        Role::Component
    }
}
