//! Error handling and exit codes.

#[path = "../common/mod.rs"]
mod common;

use common::Project;
use predicates::prelude::*;

#[test]
fn test_missing_config_file() {
    let project = Project::empty();

    project
        .cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[config]"))
        .stderr(predicate::str::contains("rescopy.json"));
}

#[test]
fn test_malformed_config_file() {
    let project = Project::empty();
    project.config("{ \"targets\": ");

    project
        .cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_unknown_target_lists_available() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "all": { "files": [{ "cwd": "test/fixtures", "src": "*", "dest": "tmp/all" }] } } }"#,
    );

    project
        .cmd()
        .arg("nope")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Target not found: nope"))
        .stderr(predicate::str::contains("available: all"));

    assert!(!project.path("tmp").exists());
}

#[test]
fn test_zero_matches_is_not_an_error() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "none": { "files": [{ "cwd": "test/fixtures", "src": "**/*.nothing", "dest": "tmp/none" }] } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("No such files found"))
        .stdout(predicate::str::contains("files copied").not());
}

#[test]
fn test_missing_cwd_warns() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "gone": { "files": [{ "cwd": "test/missing", "src": "*", "dest": "tmp/gone" }] } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("Check \"cwd\" option!"));
}

#[test]
fn test_invalid_glob_rejects_rule_only() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "mixed": { "files": [
            { "cwd": "test/fixtures", "src": "[", "dest": "tmp/mixed" },
            { "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/mixed" }
        ] } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid pattern"));

    assert!(project.path("tmp/mixed/foo.html").exists());
}

#[cfg(unix)]
#[test]
fn test_unwritable_destination_fails() {
    use std::os::unix::fs::PermissionsExt;

    let project = Project::new();
    project.write("tmp/locked/.keep", "");
    let locked = project.path("tmp/locked");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions.
    if std::fs::write(locked.join("canary"), "x").is_ok() {
        return;
    }

    project.config(
        r#"{ "targets": { "locked": { "files": [{ "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/locked" }] } } }"#,
    );

    project
        .cmd()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[io]"))
        .stderr(predicate::str::contains("Failed to write"));

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_invalid_output_mode_is_usage_error() {
    let project = Project::new();
    project
        .cmd()
        .args(["--output", "xml"])
        .assert()
        .failure()
        .code(2);
}
