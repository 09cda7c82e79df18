//! CLI contract tests for `docqa`.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn docqa(cwd: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("docqa");
    cmd.current_dir(cwd).env_remove("RUST_ENV").env("RUST_LOG", "warn");
    cmd
}

fn workspace() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(
        root.join("config.toml"),
        "[engine.chunking]\nwindow_size = 8\noverlap = 2\n\n[data]\ndocs_dir = \"docs\"\n",
    )
    .unwrap();
    fs::write(
        root.join("docs/garden.txt"),
        "Tomatoes need full sun and regular watering during summer. Compost improves soil \
         structure and feeds earthworms. Prune roses in early spring before new growth appears.",
    )
    .unwrap();
    fs::write(
        root.join("docs/kitchen.txt"),
        "Roasted tomatoes make a rich sauce for pasta. Sharpen knives on a whetstone held \
         at a steady angle. Bread dough rises faster in a warm kitchen.",
    )
    .unwrap();
    tmp
}

#[test]
fn chunk_then_query_records() {
    let tmp = workspace();
    let root = tmp.path();

    docqa(root).args(["chunk", "--out", "chunks.jsonl"]).assert().success();
    let records = fs::read_to_string(root.join("chunks.jsonl")).unwrap();
    assert!(records.lines().count() > 2);
    assert!(records.contains("\"doc_name\":\"garden.txt\""));

    docqa(root)
        .args(["query", "tomatoes in summer", "--records", "chunks.jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source 1").and(predicate::str::contains("garden.txt")));
}

#[test]
fn query_directory_as_json_and_prompt() {
    let tmp = workspace();
    let root = tmp.path();

    docqa(root)
        .args(["query", "sharpen knives", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"confidence\"").and(predicate::str::contains("kitchen.txt")));

    docqa(root)
        .args(["query", "sharpen knives", "--prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"instructions\"").and(predicate::str::contains("Source 1:")));
}

#[test]
fn unrelated_question_reports_nothing_found() {
    let tmp = workspace();
    docqa(tmp.path())
        .args(["query", "quantum chromodynamics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No relevant information found."));
}

#[test]
fn non_advancing_chunk_window_fails() {
    let tmp = workspace();
    docqa(tmp.path())
        .env("APP_ENGINE__CHUNKING__OVERLAP", "8")
        .args(["chunk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
