//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

fn run_testforge(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_testforge");
    Command::new(bin)
        .args(args)
        .env_remove("TESTFORGE_RECORD")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run testforge binary")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn fixture_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "app/layout.tsx", "export default function RootLayout({ children }) {\n  return <html><body>{children}</body></html>;\n}\n");
    write(root, "app/page.tsx", "import { Nav } from '@/components/Nav';\nexport default function Home() {\n  return <Nav />;\n}\n");
    write(root, "app/blog/[slug]/page.tsx", "export default async function Post() { return null; }\n");
    write(root, "app/api/health/route.ts", "export async function GET() { return Response.json({ ok: true }); }\n");
    write(root, "components/Nav.tsx", "'use client';\nimport Link from 'next/link';\nexport function Nav() { return <Link href=\"/\">Home</Link>; }\n");
    write(root, "lib/format.ts", "export const formatPrice = (n: number) => `$${n.toFixed(2)}`;\n");
    write(root, "lib/broken.ts", "export function (\n");
    write(root, "node_modules/pkg/index.js", "module.exports = {};\n");
    dir
}

#[test]
fn scan_prints_routes_and_classified_files() {
    let project = fixture_project();
    let root = project.path().to_str().unwrap();

    let output = run_testforge(&["--root", root, "scan"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "{stderr}");
    assert!(stdout.contains("Routes (2):"), "{stdout}");
    assert!(stdout.contains("  /blog/[slug]"), "{stdout}");
    assert!(stdout.contains("app/api/health/route.ts"), "{stdout}");
    assert!(!stdout.contains("node_modules"), "{stdout}");
    assert!(stderr.contains("1 file(s) skipped"), "{stderr}");
    assert!(stderr.contains("lib/broken.ts (unparsable)"), "{stderr}");
}

#[test]
fn scan_json_is_machine_readable() {
    let project = fixture_project();
    let root = project.path().to_str().unwrap();

    let output = run_testforge(&["scan", "--format", "json", "--root", root]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["appRouter"], true);
    assert_eq!(value["routes"], serde_json::json!(["/blog/[slug]", "/"]));
    let roles: Vec<(&str, &str)> = value["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["filePath"].as_str().unwrap(), c["role"].as_str().unwrap()))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("app/api/health/route.ts", "route-handler"),
            ("app/blog/[slug]/page.tsx", "page"),
            ("app/layout.tsx", "layout"),
            ("app/page.tsx", "page"),
            ("components/Nav.tsx", "component"),
            ("lib/format.ts", "utility"),
        ]
    );
}

#[test]
fn scan_without_app_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "pages/index.tsx", "export default function I() {}\n");

    let output = run_testforge(&["--root", dir.path().to_str().unwrap(), "scan"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("unsupported project layout"), "{stderr}");
}

#[test]
fn malformed_config_fails_before_scanning() {
    let project = fixture_project();
    write(project.path(), "testforge.yaml", "scan: [1, 2]\n");

    let output = run_testforge(&["--root", project.path().to_str().unwrap(), "scan"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("failed to parse config"), "{stderr}");
}

#[test]
fn generate_dry_run_lists_planned_tests() {
    let project = fixture_project();
    let root = project.path().to_str().unwrap();

    let output = run_testforge(&["--root", root, "generate", "--dry-run", "--role", "page"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("would write 2 test file(s)"), "{stdout}");
    assert!(stdout.contains("__tests__/app/blog/[slug]/page.test.tsx"), "{stdout}");
    assert!(stdout.contains("__tests__/app/page.test.tsx"), "{stdout}");
    assert!(!project.path().join("__tests__").exists());
}

#[test]
fn coverage_reads_existing_summary() {
    let project = fixture_project();
    write(
        project.path(),
        "coverage/coverage-summary.json",
        r#"{"total": {"lines": {"total": 4, "covered": 2, "pct": 50}, "statements": {"total": 4, "covered": 4, "pct": 100}, "functions": {"total": 1, "covered": 1, "pct": 100}, "branches": {"total": 0, "covered": 0, "pct": "Unknown"}}}"#,
    );
    let root = project.path().to_str().unwrap();

    let failing = run_testforge(&["--root", root, "coverage", "--skip-run"]);
    assert!(!failing.status.success());
    assert!(String::from_utf8_lossy(&failing.stderr).contains("coverage below 80% for: lines"));

    let passing = run_testforge(&["--root", root, "coverage", "--skip-run", "--threshold", "50"]);
    assert!(passing.status.success());
    assert!(String::from_utf8_lossy(&passing.stdout).contains("Coverage passed"));
}

#[test]
fn help_lists_subcommands() {
    let output = run_testforge(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for name in ["scan", "generate", "coverage"] {
        assert!(stdout.contains(name), "{stdout}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_testforge(&["unknown"]);
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}
