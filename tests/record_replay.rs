//! Record-replay round-trip integration test.
//!
//! Records a live scan of a fixture project, replays the cassette twice,
//! and asserts that every run yields the same report.

use std::path::Path;

use pretty_assertions::assert_eq;

use testforge::analyze::{scan, ScanOptions, SkipKind};
use testforge::cassette::session::SESSION_CASSETTE;
use testforge::context::ServiceContext;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn fixture(root: &Path) {
    write(root, "app/page.tsx", "import { Card } from '@/components/Card';\nexport default function Home() { return <Card />; }\n");
    write(root, "app/settings/layout.tsx", "export default function L({ children }) { return children; }\n");
    write(root, "app/settings/page.tsx", "'use client';\nexport default function Settings() { return null; }\n");
    write(root, "app/actions/save.ts", "'use server';\nexport async function save(data: FormData) {}\n");
    write(root, "components/Card.tsx", "export { Badge } from './Badge';\nexport function Card() { return <div />; }\n");
    write(root, "components/Badge.tsx", "export const Badge = () => <span />;\n");
    write(root, "lib/hooks/useCart.ts", "import { useState } from 'react';\nexport function useCart() { return useState(0); }\n");
    write(root, "lib/broken.ts", "export const = ;\n");
}

#[test]
fn record_then_replay_produces_identical_reports() {
    let project = tempfile::tempdir().unwrap();
    fixture(project.path());
    let cassettes = tempfile::tempdir().unwrap();
    let options = ScanOptions::default();

    // --- Phase 1: record a live scan ---
    let (ctx, session) = ServiceContext::recording_at(cassettes.path(), project.path()).unwrap();
    let recorded = scan(ctx.fs.as_ref(), project.path(), &options).unwrap();
    drop(ctx);
    let cassette_path = session.finish().unwrap().join(SESSION_CASSETTE);

    assert_eq!(recorded.result.routes, vec!["/", "/settings"]);
    assert_eq!(recorded.skipped.len(), 1);
    assert_eq!(recorded.skipped[0].path, "lib/broken.ts");
    assert_eq!(recorded.skipped[0].kind, SkipKind::Unparsable);

    // --- Phase 2: replay and compare ---
    let replay1 = scan(
        ServiceContext::replaying(&cassette_path).unwrap().fs.as_ref(),
        project.path(),
        &options,
    )
    .unwrap();
    assert_eq!(replay1, recorded);

    // --- Phase 3: replay again for determinism ---
    let replay2 = scan(
        ServiceContext::replaying(&cassette_path).unwrap().fs.as_ref(),
        project.path(),
        &options,
    )
    .unwrap();
    assert_eq!(replay2, replay1);
}

#[test]
fn live_scans_are_idempotent() {
    let project = tempfile::tempdir().unwrap();
    fixture(project.path());
    let ctx = ServiceContext::live();
    let options = ScanOptions::default();

    let first = scan(ctx.fs.as_ref(), project.path(), &options).unwrap();
    let second = scan(ctx.fs.as_ref(), project.path(), &options).unwrap();

    assert_eq!(first, second);
    let serialized = |r: &testforge::analyze::ScanReport| serde_json::to_string(&r.result).unwrap();
    assert_eq!(serialized(&first), serialized(&second));
}

#[test]
fn one_corrupt_file_leaves_the_rest_intact() {
    let project = tempfile::tempdir().unwrap();
    fixture(project.path());
    let ctx = ServiceContext::live();

    let report = scan(ctx.fs.as_ref(), project.path(), &ScanOptions::default()).unwrap();

    let paths: Vec<&str> =
        report.result.components.iter().map(|c| c.file_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "app/actions/save.ts",
            "app/page.tsx",
            "app/settings/layout.tsx",
            "app/settings/page.tsx",
            "components/Badge.tsx",
            "components/Card.tsx",
            "lib/hooks/useCart.ts",
        ]
    );
    let card = &report.result.components[5];
    assert_eq!(card.dependencies, vec!["./Badge"]);
    assert_eq!(card.exports, vec!["Card"]);
}

#[test]
fn reexports_can_be_excluded_from_dependencies() {
    let project = tempfile::tempdir().unwrap();
    fixture(project.path());
    let ctx = ServiceContext::live();
    let options = ScanOptions { reexports_as_dependencies: false };

    let report = scan(ctx.fs.as_ref(), project.path(), &options).unwrap();

    let card = report
        .result
        .components
        .iter()
        .find(|c| c.file_path == "components/Card.tsx")
        .unwrap();
    assert!(card.dependencies.is_empty());
}
