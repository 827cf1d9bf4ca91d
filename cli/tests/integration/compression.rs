//! Minification through the `compression` option.

#[path = "../common/mod.rs"]
mod common;

use common::Project;
use predicates::prelude::*;

fn compress_all(project: &Project) {
    project.config(
        r#"{ "targets": { "compress": {
            "options": { "compression": true },
            "files": [{
                "expand": true,
                "cwd": "test/fixtures",
                "src": ["**/*.js", "**/*.json", "**/*.xml", "**/*.css", "**/*.sql"],
                "dest": "tmp/min"
            }]
        } } }"#,
    );
}

#[test]
fn test_every_format_is_minified() {
    let project = Project::new();
    compress_all(&project);

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Total 6 files copied: [6]"));

    assert_eq!(
        project.read("tmp/min/test_json/data.json"),
        r#"{"name":"demo","tags":["a","b"]}"#
    );
    assert_eq!(
        project.read("tmp/min/test_xml/feed.xml"),
        "<feed><entry>one</entry></feed>"
    );
    assert_eq!(
        project.read("tmp/min/test_css/site.css"),
        "body {color: red;}"
    );
    assert_eq!(
        project.read("tmp/min/test_sql/query.sql"),
        "SELECT id FROM users WHERE id IN(1, 2);"
    );
}

#[test]
fn test_javascript_gets_smaller() {
    let project = Project::new();
    compress_all(&project);

    project.cmd().assert().success();

    let original = project.read("test/fixtures/test_js/app.js");
    let minified = project.read("tmp/min/test_js/app.js");
    assert!(!minified.is_empty());
    assert!(minified.len() < original.len());
    assert!(!minified.contains("entry point"));
}

#[test]
fn test_malformed_files_are_skipped_with_warning() {
    let project = Project::new();
    project.write("test/fixtures/test_js/broken.js", "function ( {\n");
    project.write("test/fixtures/test_json/broken.json", "{ \"a\": ");
    compress_all(&project);

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Failed to compress broken.js. Check for syntax errors on the file.",
        ))
        .stderr(predicate::str::contains("Failed to compress broken.json"))
        .stdout(predicate::str::contains("Total 6 files copied: [6]"));

    assert!(!project.path("tmp/min/test_js/broken.js").exists());
    assert!(!project.path("tmp/min/test_json/broken.json").exists());
    assert!(project.path("tmp/min/test_js/app.js").exists());
}

#[test]
fn test_unsupported_extension_is_not_copied() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "html": {
            "options": { "compression": true },
            "files": [{ "expand": true, "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/html" }]
        } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to compress foo.html"))
        .stdout(predicate::str::contains("files copied").not());

    assert!(!project.path("tmp/html/foo.html").exists());
}

#[test]
fn test_task_options_apply_to_targets() {
    let project = Project::new();
    project.config(
        r#"{
            "options": { "compression": true },
            "targets": {
                "inherit": { "files": [{ "expand": true, "cwd": "test/fixtures", "src": "**/*.json", "dest": "tmp/inherit" }] },
                "override": {
                    "options": { "compression": false },
                    "files": [{ "expand": true, "cwd": "test/fixtures", "src": "**/*.json", "dest": "tmp/override" }]
                }
            }
        }"#,
    );

    project.cmd().assert().success();

    assert_eq!(
        project.read("tmp/inherit/test_json/data.json"),
        r#"{"name":"demo","tags":["a","b"]}"#
    );
    assert_eq!(
        project.read("tmp/override/test_json/data.json"),
        project.read("test/fixtures/test_json/data.json")
    );
}

#[test]
fn test_non_boolean_compression_rejects_target() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "bad": {
            "options": { "compression": "true" },
            "files": [{ "expand": true, "cwd": "test/fixtures", "src": "**/*.json", "dest": "tmp/bad" }]
        } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("Unsupported `compression` type"));

    assert!(!project.path("tmp/bad").exists());
}

#[test]
fn test_parallel_compression_matches_sequential() {
    let project = Project::new();
    compress_all(&project);

    project.cmd().assert().success();
    let sequential: Vec<String> = project
        .files_under("tmp/min")
        .iter()
        .map(|f| project.read(&format!("tmp/min/{f}")))
        .collect();

    std::fs::remove_dir_all(project.path("tmp")).unwrap();
    project.cmd().args(["-j", "4"]).assert().success();
    let parallel: Vec<String> = project
        .files_under("tmp/min")
        .iter()
        .map(|f| project.read(&format!("tmp/min/{f}")))
        .collect();

    assert_eq!(sequential, parallel);
}
