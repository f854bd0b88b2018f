//! irb-prescreen CLI integration tests
//!
//! ## Exit Codes
//! - 0: Classified
//! - 1: Insufficient information
//! - 2: Input error
//! - 3: Configuration error

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value as JsonValue, json};
use tempfile::TempDir;

/// Command isolated from user configuration and `IRB_PRESCREEN_*` variables.
fn prescreen_command(home: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("irb-prescreen")?;
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("IRB_PRESCREEN_OUTPUT__FORMAT")
        .env_remove("IRB_PRESCREEN_OUTPUT__PRETTY")
        .env_remove("IRB_PRESCREEN_REVIEW__CONFIDENCE_THRESHOLD")
        .env_remove("IRB_PRESCREEN_SCHEMA_VALIDATION");
    Ok(cmd)
}

fn write_snapshot(dir: &Path, name: &str, value: &JsonValue) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

fn benign_survey() -> JsonValue {
    json!({
        "prescreening": { "isResearch": true, "involvesHumanSubjects": true },
        "subjects": { "minAge": 18, "totalParticipants": 150 },
        "procedures": {
            "methodTypes": ["survey"],
            "surveyTopics": "course preferences"
        },
        "risks": { "riskLevel": "minimal" },
        "data": { "collectsIdentifiers": false }
    })
}

// =============================================================================
// CLASSIFY
// =============================================================================

#[test]
fn classify_json_reports_exempt_category() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;

    let output = prescreen_command(home.path())?
        .args(["classify", "--json"])
        .arg(&snapshot)
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let result: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result["type"], "EXEMPT");
    assert_eq!(result["category"], 2);
    assert!(result["disclaimer"].is_string());
    Ok(())
}

#[test]
fn classify_text_shows_headline_and_disclaimer() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;

    prescreen_command(home.path())?
        .arg("classify")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Exempt Review - Category 2"))
        .stdout(predicate::str::contains("45 CFR 46.104(d)(2)"))
        .stdout(predicate::str::contains("advisory only"));
    Ok(())
}

#[test]
fn classify_reads_toml_snapshots() -> Result<()> {
    let home = TempDir::new()?;
    let path = home.path().join("protocol.toml");
    fs::write(
        &path,
        r#"
[prescreening]
isResearch = true
involvesHumanSubjects = true

[risks]
riskLevel = "greater"
"#,
    )?;

    prescreen_command(home.path())?
        .args(["classify", "--json"])
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"FULL_BOARD\""));
    Ok(())
}

#[test]
fn insufficient_information_exits_1() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "empty.json", &json!({}))?;

    prescreen_command(home.path())?
        .args(["classify", "--json"])
        .arg(&snapshot)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("INSUFFICIENT_INFO"));
    Ok(())
}

#[test]
fn missing_snapshot_exits_2() -> Result<()> {
    let home = TempDir::new()?;

    prescreen_command(home.path())?
        .args(["classify", "does-not-exist.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input error"))
        .stderr(predicate::str::contains("unparsable").not());
    Ok(())
}

#[test]
fn malformed_snapshot_exits_2() -> Result<()> {
    let home = TempDir::new()?;
    let path = home.path().join("broken.json");
    fs::write(&path, "{ not json")?;

    prescreen_command(home.path())?
        .arg("classify")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input error (unparsable snapshot)"));
    Ok(())
}

#[test]
fn unsupported_extension_exits_2() -> Result<()> {
    let home = TempDir::new()?;
    let path = home.path().join("protocol.yaml");
    fs::write(&path, "prescreening: {}")?;

    prescreen_command(home.path())?
        .arg("classify")
        .arg(&path)
        .assert()
        .code(2);
    Ok(())
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn missing_config_file_exits_3() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;

    prescreen_command(home.path())?
        .arg("classify")
        .arg(&snapshot)
        .args(["--config", "missing.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration error"));
    Ok(())
}

#[test]
fn invalid_config_exits_3() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;
    fs::write(
        home.path().join("irb-prescreen.toml"),
        "[review]\nconfidence_threshold = 3.0\n",
    )?;

    prescreen_command(home.path())?
        .arg("classify")
        .arg(&snapshot)
        .assert()
        .code(3);
    Ok(())
}

#[test]
fn disabled_schema_validation_is_reported_on_stderr() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;
    fs::write(
        home.path().join("irb-prescreen.toml"),
        "schema_validation = false\n",
    )?;

    prescreen_command(home.path())?
        .arg("classify")
        .arg(&snapshot)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Configuration schema validation is disabled",
        ));
    Ok(())
}

#[test]
fn working_directory_config_selects_json_output() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;
    fs::write(
        home.path().join("irb-prescreen.toml"),
        "[output]\nformat = \"json\"\npretty = false\n",
    )?;

    let output = prescreen_command(home.path())?
        .arg("classify")
        .arg(&snapshot)
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.trim().lines().count(), 1);
    let result: JsonValue = serde_json::from_str(stdout.trim())?;
    assert_eq!(result["type"], "EXEMPT");
    Ok(())
}

#[test]
fn environment_overrides_output_format() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;

    prescreen_command(home.path())?
        .env("IRB_PRESCREEN_OUTPUT__FORMAT", "json")
        .arg("classify")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
    Ok(())
}

// =============================================================================
// DOCUMENTS
// =============================================================================

#[test]
fn documents_json_lists_plan() -> Result<()> {
    let home = TempDir::new()?;
    let mut value = benign_survey();
    value["data"]["collectsIdentifiers"] = json!(true);
    value["data"]["identifierTypes"] = json!(["name"]);
    value["subjects"]["includesMinors"] = json!(true);
    let snapshot = write_snapshot(home.path(), "protocol.json", &value)?;

    let output = prescreen_command(home.path())?
        .args(["documents", "--json"])
        .arg(&snapshot)
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let plan: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(plan["reviewType"], "EXPEDITED");
    assert_eq!(
        plan["documents"],
        json!([
            "protocol_narrative",
            "consent_form",
            "parental_permission_form",
            "child_assent_form"
        ])
    );
    Ok(())
}

#[test]
fn documents_text_for_not_research() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(
        home.path(),
        "protocol.json",
        &json!({ "prescreening": { "isResearch": false, "involvesHumanSubjects": true } }),
    )?;

    prescreen_command(home.path())?
        .arg("documents")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not Research"))
        .stdout(predicate::str::contains("1. Not Human Subjects determination request"));
    Ok(())
}

#[test]
fn not_research_still_reminds_about_citi_training() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(
        home.path(),
        "protocol.json",
        &json!({ "prescreening": { "isResearch": false, "involvesHumanSubjects": true } }),
    )?;

    let output = prescreen_command(home.path())?
        .args(["classify", "--json"])
        .arg(&snapshot)
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let result: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result["type"], "NOT_RESEARCH");
    assert_eq!(result["recommendations"][0]["title"], "Complete CITI training");
    Ok(())
}

#[test]
fn classification_output_is_deterministic() -> Result<()> {
    let home = TempDir::new()?;
    let snapshot = write_snapshot(home.path(), "protocol.json", &benign_survey())?;

    let run = || -> Result<Vec<u8>> {
        Ok(prescreen_command(home.path())?
            .args(["classify", "--json"])
            .arg(&snapshot)
            .output()?
            .stdout)
    };
    assert_eq!(run()?, run()?);
    Ok(())
}
