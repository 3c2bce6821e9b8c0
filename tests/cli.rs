mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

use common::{TestWorkspace, fixture_path};

fn proclog() -> Command {
    Command::cargo_bin("proclog").expect("binary present")
}

#[test]
fn convert_writes_decoded_csv() {
    let workspace = TestWorkspace::new();
    let output = workspace.path().join("run-out.csv");
    proclog()
        .args([
            "convert",
            "-l",
            fixture_path("process_run.csv").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    assert_eq!(
        contents.lines().collect::<Vec<_>>(),
        vec![
            "timestamp,day,cpu,status",
            "2024-05-06 10:00:00,2024-05-06,0.5,ok",
            "2024-05-06 10:00:05,2024-05-06,0.7,fail",
            "2024-05-06 10:00:10,2024-05-07,,ok",
        ]
    );
}

#[test]
fn convert_selects_named_log_as_json() {
    let output = proclog()
        .args([
            "convert",
            "-l",
            &format!("run={}", fixture_path("process_run.csv").display()),
            "-l",
            &format!("learner={}", fixture_path("learner_log.tsv").display()),
            "--log-name",
            "learner",
            "--format",
            "json",
        ])
        .output()
        .expect("run proclog");
    assert!(output.status.success());

    let document: Value = serde_json::from_slice(&output.stdout).expect("json output");
    let types = document["attributes"]
        .as_array()
        .expect("attributes")
        .iter()
        .map(|a| a["type"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(types, vec!["real", "real", "nominal"]);
    assert_eq!(document["attributes"][2]["labels"], serde_json::json!(["tree", "forest"]));
    assert_eq!(document["rows"][2][2], 0.0);
}

#[test]
fn convert_without_logs_reports_configuration_error() {
    proclog()
        .args(["convert"])
        .assert()
        .failure()
        .stderr(contains("No log is available to convert"));
}

#[test]
fn convert_with_unknown_log_name_fails() {
    proclog()
        .args([
            "convert",
            "-l",
            fixture_path("process_run.csv").to_str().unwrap(),
            "-n",
            "missing",
        ])
        .assert()
        .failure()
        .stderr(contains("No log named 'missing'"));
}

#[test]
fn convert_preview_prints_typed_headers() {
    proclog()
        .args([
            "convert",
            "-l",
            fixture_path("process_run.csv").to_str().unwrap(),
            "--preview",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("timestamp (date_time)"))
        .stdout(contains("status (nominal)"))
        .stdout(contains("fail"));
}

#[test]
fn schema_lists_attributes_and_category_counts() {
    let assert = proclog()
        .args([
            "schema",
            "-l",
            fixture_path("process_run.csv").to_str().unwrap(),
            "--kinds",
            fixture_path("process_run.kinds.yml").to_str().unwrap(),
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "#  name       type       categories");
    assert_eq!(lines[5], "4  status     nominal    2");
}

#[test]
fn kinds_command_writes_yaml() {
    let workspace = TestWorkspace::new();
    let output = workspace.path().join("run.kinds.yml");
    proclog()
        .args([
            "kinds",
            "-i",
            fixture_path("process_run.csv").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    let yaml = fs::read_to_string(&output).expect("read kinds");
    assert!(yaml.contains("kind: datetime"));
    assert!(yaml.contains("kind: categorical"));
}
