#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use travelboard_cli::{run_cli_for_test, CommandOutput, FilesystemBackend};

const KYOTO: &str = r#"{"id":"k1","src":"https://img/k1.jpg","thumb":"https://img/k1-s.jpg","alt":"Torii gates","author":"Aiko","authorLink":"https://img/@aiko","location":"Kyoto, Japan"}"#;
const OSAKA: &str = r#"{"id":"o1","src":"https://img/o1.jpg","alt":"Dotonbori at night","location":null}"#;

fn write_config(dir: &Path) -> String {
    let path = dir.join("config.yaml");
    let yaml = format!(
        "favorites:\n  namespace: clitest\n  data_dir: {}\nlogging:\n  level: warn\n",
        dir.join("data").display()
    );
    std::fs::write(&path, yaml).unwrap();
    path.display().to_string()
}

fn run(config: &str, args: &[&str]) -> CommandOutput {
    let mut full = vec!["--config", config];
    full.extend_from_slice(args);
    run_cli_for_test(&full, &FilesystemBackend)
}

#[test]
fn favorites_persist_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let out = run(&config, &["favorites", "add", KYOTO]);
    assert_eq!(out, CommandOutput::ok("saved k1\n"));
    let out = run(&config, &["favorites", "toggle", OSAKA]);
    assert_eq!(out.stdout, "saved o1\n");

    let out = run(&config, &["favorites", "count"]);
    assert_eq!(out.stdout, "2\n");

    let stored = dir.path().join("data").join("clitest_favorites_v1.json");
    assert!(stored.exists(), "missing {}", stored.display());

    let out = run(&config, &["favorites", "list", "--json"]);
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    let listed: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["k1", "o1"]);
    assert_eq!(listed[0]["authorLink"], "https://img/@aiko");
    assert!(listed[1]["location"].is_null());
}

#[test]
fn toggle_twice_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    assert_eq!(run(&config, &["favorites", "toggle", KYOTO]).stdout, "saved k1\n");
    assert_eq!(run(&config, &["favorites", "toggle", KYOTO]).stdout, "removed k1\n");
    assert_eq!(run(&config, &["favorites", "count"]).stdout, "0\n");

    let out = run(&config, &["favorites", "remove", "k1"]);
    assert_eq!(out, CommandOutput::ok("not a favorite: k1\n"));
    assert_eq!(run(&config, &["favorites", "count"]).stdout, "0\n");
}

#[test]
fn invalid_photo_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let out = run(&config, &["favorites", "add", "{\"id\": 5}"]);
    assert_eq!(out.exit_code, 2);
    assert!(out.stderr.contains("invalid photo JSON"), "stderr: {}", out.stderr);
    assert_eq!(run(&config, &["favorites", "count"]).stdout, "0\n");
}

#[test]
fn corrupted_store_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("clitest_favorites_v1.json"), "{{{").unwrap();

    assert_eq!(run(&config, &["favorites", "count"]).stdout, "0\n");
    assert_eq!(run(&config, &["favorites", "add", KYOTO]).exit_code, 0);
    assert_eq!(run(&config, &["favorites", "count"]).stdout, "1\n");
}
