#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CONFIG: &str = r#"
packs:
  roboto:
    family: [Roboto, Arial, sans-serif]
    propGroups:
      - weight: [light, 300]
        style: italic
      - weight: [light, 300]
"#;

fn fontpack() -> Command {
    let mut cmd = Command::cargo_bin("fontpack").unwrap();
    cmd.env_remove("FONTPACK_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn run_writes_resolved_css_to_stdout() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);
    let input = write(dir.path(), "a.css", "body{font:light 1rem/1.2 roboto}");

    fontpack()
        .args(["run", "--config", &config, &input])
        .assert()
        .success()
        .stdout("body{font:300 1rem/1.2 Roboto, Arial, sans-serif}");
}

#[test]
fn run_reads_stdin_and_config_from_env() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "packs.yaml", CONFIG);

    fontpack()
        .env("FONTPACK_CONFIG", &config)
        .args(["run", "-"])
        .write_stdin("a{font-family:roboto;font-weight:light}")
        .assert()
        .success()
        .stdout("a{font-family:Roboto, Arial, sans-serif;font-weight:300}");
}

#[test]
fn run_accepts_json_config() {
    let dir = tempdir().unwrap();
    let config = write(
        dir.path(),
        "fontpack.json",
        r#"{"packs":{"roboto":{"family":["Roboto"]}}}"#,
    );

    fontpack()
        .args(["run", "--config", &config, "-"])
        .write_stdin("a{font-family:roboto}")
        .assert()
        .success()
        .stdout("a{font-family:Roboto}");
}

#[test]
fn run_in_place_rewrites_every_input() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);
    let a = write(dir.path(), "a.css", "a{font-family:roboto}");
    let b = write(dir.path(), "b.css", "b{color:red}");

    fontpack()
        .args(["run", "--config", &config, "--in-place", &a, &b])
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        "a{font-family:Roboto, Arial, sans-serif}"
    );
    assert_eq!(fs::read_to_string(&b).unwrap(), "b{color:red}");
}

#[test]
fn run_output_requires_single_input() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);
    let a = write(dir.path(), "a.css", "a{}");
    let out = dir.path().join("out.css");

    fontpack()
        .args(["run", "--config", &config, "--output"])
        .arg(&out)
        .args([&a, &a])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--output requires exactly one input"));

    fontpack()
        .args(["run", "--config", &config, "--output"])
        .arg(&out)
        .arg(&a)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&out).unwrap(), "a{}");
}

#[test]
fn transform_failure_exits_one() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);
    let input = write(dir.path(), "a.css", "a{\n  font-family: lato;\n}");

    fontpack()
        .args(["run", "--config", &config, &input])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "[postcss-font-pack] 2:3: pack not found",
        ));
}

#[test]
fn ambiguous_variants_exit_one() {
    let dir = tempdir().unwrap();
    let config = write(
        dir.path(),
        "fontpack.yaml",
        "packs:\n  roboto:\n    family: [Roboto]\n    propGroups:\n      - weight: [bold, 700]\n      - weight: [bold, 600]\n",
    );

    fontpack()
        .args(["run", "--config", &config, "-"])
        .write_stdin("a{font:bold 0 roboto}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("more than one pack found"));
}

#[test]
fn parse_failure_exits_one() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);

    fontpack()
        .args(["run", "--config", &config, "-"])
        .write_stdin("a{font-family:roboto")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unclosed block"));
}

#[test]
fn require_size_flag_overrides_config() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);

    fontpack()
        .args(["run", "--config", &config, "--require-size", "-"])
        .write_stdin("a{font-family:roboto}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing required font-size"));
}

#[test]
fn missing_config_exits_two() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");

    fontpack()
        .args(["run", "--config"])
        .arg(&missing)
        .arg("-")
        .write_stdin("a{}")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn invalid_catalog_exits_two() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", "packs:\n  a:\n    family: []\n");

    fontpack()
        .args(["validate", "--config", &config])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("pack.family is empty"));
}

#[test]
fn validate_reports_counts() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);

    fontpack()
        .args(["validate", "--config", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 packs, 2 variants)"))
        .stdout(predicate::str::contains("roboto: 2 variants"));
}

#[test]
fn validate_json_exposes_lookup_keys() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "fontpack.yaml", CONFIG);

    let output = fontpack()
        .args(["validate", "--config", &config, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["packs"], 1);
    assert_eq!(report["variants"], 2);
    let first = &report["lookup"]["roboto"][0];
    assert_eq!(first["family:roboto"], "Roboto, Arial, sans-serif");
    assert_eq!(first["weight:light"], "300");
    assert_eq!(first["reverse:light"], "weight");
    assert_eq!(first["style:italic"], "italic");
}

#[test]
fn unknown_config_fields_are_warned_about() {
    let dir = tempdir().unwrap();
    let config = write(
        dir.path(),
        "fontpack.yaml",
        "packs:\n  roboto:\n    family: [Roboto]\n    colour: red\n",
    );

    fontpack()
        .args(["validate", "--config", &config])
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring unknown config field"));
}

#[test]
fn version_prints_crate_version() {
    fontpack()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}
