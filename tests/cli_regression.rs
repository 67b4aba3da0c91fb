// CLI regression tests: lowering, summaries, banners, and miette diagnostics.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const POSITION: &str = r#""position": {"line": 1, "column": 1, "end_line": 1, "end_column": 6}"#;

fn tree(statement: &str) -> String {
    format!(r#"{{"type": "rule", "rule": "file_input", {POSITION}, "children": [{statement}]}}"#)
}

fn rule(name: &str, children: &[String]) -> String {
    format!(
        r#"{{"type": "rule", "rule": "{name}", {POSITION}, "children": [{}]}}"#,
        children.join(", ")
    )
}

fn token(kind: &str, text: &str) -> String {
    format!(r#"{{"type": "token", "kind": "{kind}", "text": "{text}"}}"#)
}

fn var(name: &str) -> String {
    rule("var", &[token("NAME", name)])
}

/// `x = 2.5`
fn assignment() -> String {
    tree(&rule(
        "assign_stmt",
        &[var("x"), rule("number", &[token("FLOAT_NUMBER", "2.5")])],
    ))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn lower_prints_materialized_json() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "tree.json", &assignment());

    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("lower").arg(&input).arg("--compact");
    cmd.assert().success().stdout(
        contains(r#""_type":"Module""#)
            .and(contains(r#""ctx":{"_type":"Store"}"#))
            .and(contains(r#""value":2,"#)),
    );
}

#[test]
fn config_file_preserves_floats() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "tree.json", &assignment());
    let config = write(&dir, "serpentes.yaml", "float_literals: preserve\n");

    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("lower").arg(&input).arg("--config").arg(&config).arg("--compact");
    cmd.assert().success().stdout(contains(r#""value":2.5"#));
}

#[test]
fn check_prints_summary() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "tree.json", &assignment());

    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("check").arg(&input);
    cmd.assert()
        .success()
        .stdout(contains("ok: 1 statements, 4 nodes"));
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    let dir = TempDir::new().unwrap();
    let ambiguous = rule(
        "or_test",
        &[
            var("a"),
            rule("or_op", &[token("OR", "or")]),
            var("b"),
            rule("or_op", &[token("OR", "or")]),
            var("c"),
        ],
    );
    let input = write(&dir, "tree.json", &tree(&rule("expr_stmt", &[ambiguous])));

    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("check").arg(&input);
    cmd.assert().failure().stderr(
        contains("or_test")
            .and(contains("serpentes::transform").or(contains("help:"))),
    );
}

#[test]
fn malformed_json_is_an_input_error() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "tree.json", "{ not json");

    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("lower").arg(&input);
    cmd.assert()
        .failure()
        .stderr(contains("malformed parse tree input"));
}

#[test]
fn banners() {
    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(contains(format!("Serpentes {}", env!("CARGO_PKG_VERSION"))));

    let mut cmd = Command::cargo_bin("serpentes").unwrap();
    cmd.arg("-a");
    cmd.assert().success().stdout(contains("Serpentes"));
}
