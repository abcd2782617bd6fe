use predicates::prelude::*;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DEFINITIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5">
  <definitions>
    <definition id="oval:org.test:def:1" version="2" class="compliance">
      <criteria operator="OR">
        <criterion test_ref="oval:org.test:tst:1" negate="true"/>
        <extend_definition definition_ref="oval:org.test:def:2"/>
      </criteria>
    </definition>
    <definition id="oval:org.test:def:2" version="1" class="inventory">
      <criteria>
        <criterion test_ref="oval:org.test:tst:2"/>
      </criteria>
    </definition>
  </definitions>
  <tests>
    <file_test id="oval:org.test:tst:1" version="1"/>
    <file_test id="oval:org.test:tst:2" version="1"/>
  </tests>
</oval_definitions>"#;

const RESULTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<oval_results xmlns="http://oval.mitre.org/XMLSchema/oval-results-5">
  <results>
    <system>
      <definitions>
        <definition definition_id="oval:org.test:def:2" version="1" result="true">
          <criteria operator="AND" result="true">
            <criterion test_ref="oval:org.test:tst:2" version="1" result="true"/>
          </criteria>
        </definition>
      </definitions>
      <tests>
        <test test_id="oval:org.test:tst:2" version="1" result="true"/>
      </tests>
    </system>
  </results>
</oval_results>"#;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Test that the binary runs and shows help
#[test]
fn test_help_command() {
    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OVAL result criteria"));
}

#[test]
fn test_version_command() {
    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oval-criteria"));
}

#[test]
fn test_derive_missing_definitions_file() {
    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["derive", "/nonexistent/definitions.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load definitions"));
}

/// Derive writes a results skeleton with one criteria tree per definition
#[test]
fn test_derive_writes_skeleton() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["derive", definitions.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<definition definition_id="oval:org.test:def:1" version="2" result="not evaluated">"#,
        ))
        .stdout(predicate::str::contains(r#"negate="true""#))
        .stdout(predicate::str::contains(
            r#"<extend_definition definition_ref="oval:org.test:def:2" result="not evaluated"/>"#,
        ));
}

#[test]
fn test_derive_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);
    let output_path = temp_dir.path().join("results.xml");

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args([
            "-o",
            output_path.to_str().unwrap(),
            "derive",
            definitions.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&output_path).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.contains(r#"<test test_id="oval:org.test:tst:2" version="1" result="not evaluated"/>"#));
}

/// A derived skeleton passes its own check
#[test]
fn test_check_derived_results() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);
    let results = temp_dir.path().join("results.xml");

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["-o", results.to_str().unwrap(), "derive", definitions.to_str().unwrap()])
        .assert()
        .success();

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["check", definitions.to_str().unwrap(), results.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 definitions, 2 tests, 0 invalid"));
}

#[test]
fn test_check_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);
    let results = write_fixture(&temp_dir, "results.xml", RESULTS);

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args([
            "-f",
            "json",
            "check",
            definitions.to_str().unwrap(),
            results.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "oval:org.test:def:2""#))
        .stdout(predicate::str::contains(r#""result": "true""#));
}

/// A criterion pointing at a test outside the model makes the tree invalid
#[test]
fn test_check_reports_invalid_tree() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);
    let broken = RESULTS.replace(
        r#"<criterion test_ref="oval:org.test:tst:2""#,
        r#"<criterion test_ref="oval:org.test:tst:99""#,
    );
    let results = write_fixture(&temp_dir, "results.xml", &broken);

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["check", definitions.to_str().unwrap(), results.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID"))
        .stderr(predicate::str::contains("1 invalid definition(s)"));
}

#[test]
fn test_normalize_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);
    let results = write_fixture(&temp_dir, "results.xml", RESULTS);
    let first = temp_dir.path().join("first.xml");
    let second = temp_dir.path().join("second.xml");

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args([
            "-o",
            first.to_str().unwrap(),
            "normalize",
            definitions.to_str().unwrap(),
            results.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args([
            "-o",
            second.to_str().unwrap(),
            "normalize",
            definitions.to_str().unwrap(),
            first.to_str().unwrap(),
        ])
        .assert()
        .success();

    let first = fs::read_to_string(first).unwrap();
    assert!(first.contains(r#"<criterion test_ref="oval:org.test:tst:2" version="1" result="true"/>"#));
    assert_eq!(first, fs::read_to_string(second).unwrap());
}

#[test]
fn test_invalid_indent_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let definitions = write_fixture(&temp_dir, "definitions.xml", DEFINITIONS);

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["--indent", "64", "derive", definitions.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

/// Chains of extends longer than --max-extend-depth are cut, not followed
#[test]
fn test_long_extend_chain_is_cut() {
    let temp_dir = TempDir::new().unwrap();
    let mut definitions = String::from(
        r#"<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5"><definitions>"#,
    );
    for i in 0..500 {
        definitions.push_str(&format!(
            r#"<definition id="def:{}" version="1"><criteria><extend_definition definition_ref="def:{}"/></criteria></definition>"#,
            i,
            i + 1
        ));
    }
    definitions.push_str(r#"</definitions><tests/></oval_definitions>"#);
    let definitions = write_fixture(&temp_dir, "chain.xml", &definitions);
    let results = temp_dir.path().join("results.xml");

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args([
            "--max-extend-depth",
            "16",
            "-o",
            results.to_str().unwrap(),
            "derive",
            definitions.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("extend_definition chain deeper than 16 levels"));

    assert_cmd::cargo_bin_cmd!("oval-criteria")
        .args(["check", definitions.to_str().unwrap(), results.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("500 definitions"));
}
