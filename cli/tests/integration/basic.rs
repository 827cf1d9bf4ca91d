//! Basic functionality integration tests for the rescopy CLI.

#[path = "../common/mod.rs"]
mod common;

use common::Project;
use predicates::prelude::*;

const ALL: &str = r#"{
    "targets": {
        "all": { "files": [{ "cwd": "test/fixtures/", "src": "*", "dest": "tmp/all" }] }
    }
}"#;

#[test]
fn test_copy_all_mirrors_tree() {
    let project = Project::new();
    project.config(ALL);

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Running \"all\" target"))
        .stdout(predicate::str::contains("Total 7 files copied: [7]"));

    assert_eq!(
        project.files_under("tmp/all"),
        vec![
            "foo.html",
            "test_css/site.css",
            "test_js/app.js",
            "test_js/lib/util.js",
            "test_json/data.json",
            "test_sql/query.sql",
            "test_xml/feed.xml",
        ]
    );
    assert_eq!(
        project.read("tmp/all/test_js/lib/util.js"),
        "var util = { n: 1 };\n"
    );
}

#[test]
fn test_copy_lines_are_logged() {
    let project = Project::new();
    project.config(ALL);

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("copying: foo.html => tmp/all/foo.html"))
        .stdout(predicate::str::contains(
            "copying: util.js => tmp/all/test_js/lib/util.js",
        ));
}

#[test]
fn test_quiet_suppresses_copy_lines() {
    let project = Project::new();
    project.config(ALL);

    project
        .cmd()
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("copying:").not())
        .stdout(predicate::str::contains("Total 7 files copied"));
}

#[test]
fn test_extension_filter_expanded() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "js": { "files": [{
            "expand": true, "cwd": "test/fixtures", "src": ["**/*.js"], "dest": "tmp/js"
        }] } } }"#,
    );

    project.cmd().assert().success();

    assert_eq!(
        project.files_under("tmp/js"),
        vec!["test_js/app.js", "test_js/lib/util.js"]
    );
}

#[test]
fn test_single_file_is_pluralized_correctly() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "one": { "files": [{
            "cwd": "test/fixtures", "src": "foo.html", "dest": "tmp/one"
        }] } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Total 1 file copied: [1]"));
}

#[test]
fn test_targets_run_in_requested_order() {
    let project = Project::new();
    project.config(
        r#"{ "targets": {
            "html": { "files": [{ "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/html" }] },
            "xml": { "files": [{ "cwd": "test/fixtures/test_xml", "src": "*", "dest": "tmp/xml" }] }
        } }"#,
    );

    let output = project.cmd().args(["xml", "html"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let xml = stdout.find("Running \"xml\"").unwrap();
    let html = stdout.find("Running \"html\"").unwrap();
    assert!(xml < html);
}

#[test]
fn test_only_named_target_runs() {
    let project = Project::new();
    project.config(
        r#"{ "targets": {
            "html": { "files": [{ "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/html" }] },
            "xml": { "files": [{ "cwd": "test/fixtures/test_xml", "src": "*", "dest": "tmp/xml" }] }
        } }"#,
    );

    project.cmd().arg("html").assert().success();

    assert!(project.path("tmp/html/foo.html").exists());
    assert!(!project.path("tmp/xml").exists());
}

#[test]
fn test_custom_config_path_and_jobs() {
    let project = Project::new();
    project.write("build/resources.json", ALL);

    project
        .cmd()
        .args(["-c", "build/resources.json", "-j", "4", "--no-sync"])
        .assert()
        .success();

    assert_eq!(project.files_under("tmp/all").len(), 7);
}

#[test]
fn test_dotfiles_need_flag() {
    let project = Project::new();
    project.write("test/fixtures/.env", "SECRET=1\n");
    project.config(
        r#"{ "targets": { "dots": { "files": [{
            "expand": true, "cwd": "test/fixtures", "src": "*", "dest": "tmp/dots"
        }] } } }"#,
    );

    project.cmd().assert().success();
    assert!(!project.path("tmp/dots/.env").exists());

    project.cmd().arg("--dot").assert().success();
    assert!(project.path("tmp/dots/.env").exists());
}

#[test]
fn test_json_output() {
    let project = Project::new();
    project.config(ALL);

    let output = project.cmd().args(["--output", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "execute");
    assert_eq!(value["targets"][0]["name"], "all");
    assert_eq!(value["targets"][0]["files_copied"], 7);
}

#[test]
fn test_help_output() {
    let project = Project::empty();
    project
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Task file"));
}
