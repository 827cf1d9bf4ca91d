//! Plan mode (`-n`) output.

#[path = "../common/mod.rs"]
mod common;

use common::Project;
use predicates::prelude::*;
use serde_json::Value;

const CONFIG: &str = r#"{ "targets": {
    "debug": { "files": [{
        "expand": true, "cwd": "test/fixtures", "src": ["*.html"], "dest": "tmp/debug",
        "rename": { "regex": "(\\.html)", "replace": "-dbg$1" }
    }] },
    "min": {
        "options": { "compression": true },
        "files": [{ "expand": true, "cwd": "test/fixtures", "src": ["**/*.js"], "dest": "tmp/min" }]
    }
} }"#;

#[test]
fn test_plan_human_writes_nothing() {
    let project = Project::new();
    project.config(CONFIG);

    project
        .cmd()
        .arg("--plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan for \"debug\" (1 items):"))
        .stdout(predicate::str::contains(
            "copy test/fixtures/foo.html -> tmp/debug/foo-dbg.html",
        ))
        .stdout(predicate::str::contains(
            "minify test/fixtures/test_js/app.js -> tmp/min/test_js/app.js",
        ));

    assert!(!project.path("tmp").exists());
}

#[test]
fn test_plan_json() {
    let project = Project::new();
    project.config(CONFIG);

    let output = project
        .cmd()
        .args(["-n", "--output", "json", "min"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["schema_version"], "1.0");
    assert_eq!(value["mode"], "plan");

    let targets = value["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["name"], "min");

    let items = targets[0]["items"].as_array().unwrap();
    let destinations: Vec<&str> = items
        .iter()
        .map(|i| i["destination"].as_str().unwrap())
        .collect();
    assert_eq!(
        destinations,
        vec!["tmp/min/test_js/app.js", "tmp/min/test_js/lib/util.js"]
    );
    assert!(items.iter().all(|i| i["action"] == "minify"));
    assert!(!project.path("tmp").exists());
}

#[test]
fn test_dry_run_alias() {
    let project = Project::new();
    project.config(CONFIG);

    project.cmd().arg("--dry-run").assert().success();
    assert!(!project.path("tmp").exists());
}
