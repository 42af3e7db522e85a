use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn wordcount() -> Command {
    let mut cmd = Command::cargo_bin("wordcount").expect("binary exists");
    cmd.env_remove("WORDCOUNT_NOUN")
        .env_remove("WORDCOUNT_RECHECK_DELAY_MS");
    cmd
}

#[test]
fn help_displays_usage() {
    wordcount()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn counts_stdin() {
    wordcount()
        .arg("count")
        .write_stdin("123 !!! abc\n")
        .assert()
        .success()
        .stdout("2 words, 12 characters\n");
}

#[test]
fn counts_file_with_env_noun() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "café naïve").unwrap();

    wordcount()
        .env("WORDCOUNT_NOUN", "term")
        .arg("count")
        .arg(&path)
        .assert()
        .success()
        .stdout("2 terms, 10 characters\n");
}

#[test]
fn missing_file_fails() {
    wordcount()
        .args(["count", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn replays_script_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(
        &path,
        r#"{
            "nodes": [{ "kind": "text", "text": "one two" }],
            "steps": [
                { "select": { "anchor": [0, 0], "focus": [0, 7] } },
                { "message": { "active": true } },
                { "message": { "active": false } }
            ]
        }"#,
    )
    .unwrap();

    wordcount()
        .args(["replay", "--json"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            "{\"step\":1,\"label\":{\"state\":\"visible\",\"message\":\"2 words\"}}\n\
             {\"step\":2,\"label\":{\"state\":\"hidden\"}}\n",
        );
}

#[test]
fn generates_completions() {
    wordcount()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wordcount"));
}
