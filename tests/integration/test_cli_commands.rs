use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const KIND: &str = r#"
job-defaults:
    require-signed-extensions: false
    test-platform: linux64-shippable/opt
jobs:
    browsertime-tp6-amazon:
        description: Browsertime tp6 amazon
        treeherder-symbol: Btime(amazon)
        raptor-test: amazon
        apps: ["firefox", "chrome"]
        pageload: both
"#;

fn workspace(kind: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("raptor.yml"), kind).expect("write kind");
    dir
}

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("raptor-taskgen"));
    cmd.env_remove("RUST_LOG")
        .env_remove("RAPTOR_TASKGEN_PROJECT")
        .env_remove("RAPTOR_TASKGEN_TRY_MODE")
        .env_remove("RAPTOR_TASKGEN_LOG_DIR")
        .env_remove("RAPTOR_TASKGEN_LOG_LEVEL");
    cmd
}

#[test]
fn expand_writes_json_to_stdout() {
    let dir = workspace(KIND);
    let output = bin()
        .arg("expand")
        .arg(dir.path().join("raptor.yml"))
        .output()
        .expect("run");
    assert!(output.status.success());

    let jobs: Vec<Value> = serde_json::from_slice(&output.stdout).expect("json output");
    let names: Vec<&str> = jobs
        .iter()
        .filter_map(|job| job["test-name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "browsertime-tp6-amazon-firefox",
            "browsertime-tp6-amazon-firefox-cold",
            "browsertime-tp6-amazon-chrome",
            "browsertime-tp6-amazon-chrome-cold",
        ]
    );
    assert_eq!(jobs[3]["treeherder-symbol"], "Btime-ChR(amazon-c)");
    assert_eq!(
        jobs[3]["mozharness"]["extra-options"],
        serde_json::json!(["--app=chrome", "--cold", "--test=amazon"])
    );
}

#[test]
fn expand_yaml_to_output_file() {
    let dir = workspace(KIND);
    let out = dir.path().join("out").join("jobs.yml");
    bin()
        .arg("expand")
        .arg(dir.path().join("raptor.yml"))
        .args(["--format", "yaml", "--project", "try"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&out).expect("output file");
    assert!(content.starts_with("- require-signed-extensions: false\n"));
    assert!(content.contains("test-name: browsertime-tp6-amazon-chrome-cold"));
}

#[test]
fn expand_reads_parameters_file() {
    let dir = workspace(
        r#"
- test-name: raptor-youtube-playback
  test-platform: android-hw-g5-7-0-arm7-api-16/opt
  require-signed-extensions: false
  treeherder-symbol: Rap(ytp)
  description: Raptor youtube playback
"#,
    );
    fs::write(dir.path().join("parameters.yml"), "project: try\nlevel: \"1\"\n")
        .expect("write parameters");
    bin()
        .arg("expand")
        .arg(dir.path().join("raptor.yml"))
        .arg("--parameters")
        .arg(dir.path().join("parameters.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("--test-url-params=exclude=1,2,9,10"));
}

#[test]
fn invalid_parameters_exit_with_code_one() {
    let dir = workspace(KIND);
    fs::write(dir.path().join("parameters.yml"), "project: \"mozilla central\"\n")
        .expect("write parameters");
    bin()
        .arg("expand")
        .arg(dir.path().join("raptor.yml"))
        .arg("--parameters")
        .arg(dir.path().join("parameters.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("RAPTOR-CONFIG-001"));
}

#[test]
fn validate_reports_job_count() {
    let dir = workspace(KIND);
    bin()
        .arg("validate")
        .arg(dir.path().join("raptor.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 job definition(s) valid"));
}

#[test]
fn schema_error_exits_with_code_one() {
    let dir = workspace("- test-name: raptor-tp6-1\n  test-platform: linux64/opt\n");
    bin()
        .arg("expand")
        .arg(dir.path().join("raptor.yml"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[ERROR] RAPTOR-SCHEMA-001"))
        .stderr(predicate::str::contains("require-signed-extensions"));
}

#[test]
fn missing_kind_file_exits_with_code_one() {
    let dir = TempDir::new().expect("temp dir");
    bin()
        .arg("validate")
        .arg(dir.path().join("missing.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("RAPTOR-LOAD-001"));
}

#[test]
fn stages_lists_pipeline_in_order() {
    bin()
        .arg("stages")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. ValidateSchemaTransform"))
        .stdout(predicate::str::contains(" 8. ExtraOptionsTransform"));
}

#[test]
fn help_lists_commands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS:"))
        .stdout(predicate::str::contains("expand"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("stages"));
}

#[test]
fn expand_long_help_documents_environment_variables() {
    bin()
        .args(["expand", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment variables:"))
        .stdout(predicate::str::contains("RAPTOR_TASKGEN_PROJECT"))
        .stdout(predicate::str::contains("RAPTOR_TASKGEN_LOG_DIR"));

    bin()
        .args(["expand", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RAPTOR_TASKGEN_PROJECT").not());
}

#[test]
fn file_sink_writes_log_under_workspace() {
    let dir = workspace(KIND);
    let state = dir.path().join(".raptor-taskgen");
    fs::create_dir_all(&state).expect("state dir");
    fs::write(
        state.join("logging.toml"),
        "[logging]\nenable_file = true\ndefault_level = \"debug\"\nconsole_output = \"none\"\n",
    )
    .expect("logging config");

    bin()
        .arg("expand")
        .arg(dir.path().join("raptor.yml"))
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let log = fs::read_to_string(state.join("logs").join("raptor-taskgen.log")).expect("log file");
    assert!(log.contains("applied transform"));
    assert!(log.contains("expanded job descriptions"));
}
