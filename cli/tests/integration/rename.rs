//! Destination renaming through the task file.

#[path = "../common/mod.rs"]
mod common;

use common::Project;
use predicates::prelude::*;

#[test]
fn test_literal_rename() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "rename": { "files": [{
            "expand": true,
            "cwd": "test/fixtures/test_js",
            "src": ["**/*.js"],
            "dest": "tmp/rename",
            "rename": { "find": ".js", "replace": "-dbg.js" }
        }] } } }"#,
    );

    project.cmd().assert().success();

    assert_eq!(
        project.files_under("tmp/rename"),
        vec!["app-dbg.js", "lib/util-dbg.js"]
    );
}

#[test]
fn test_regex_rename_with_capture() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "renameWithRegex": { "files": [{
            "expand": true,
            "cwd": "test/fixtures",
            "src": ["**/*.js", "**/*.xml", "*.html"],
            "dest": "tmp/rename_regex",
            "rename": { "regex": "(\\.js|\\.xml|\\.html)", "replace": "-dbg$1" }
        }] } } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "copying: foo.html => tmp/rename_regex/foo-dbg.html",
        ));

    assert_eq!(
        project.files_under("tmp/rename_regex"),
        vec![
            "foo-dbg.html",
            "test_js/app-dbg.js",
            "test_js/lib/util-dbg.js",
            "test_xml/feed-dbg.xml",
        ]
    );
}

#[test]
fn test_rename_ignored_without_expand() {
    let project = Project::new();
    project.config(
        r#"{ "targets": { "flat": { "files": [{
            "cwd": "test/fixtures",
            "src": "*.html",
            "dest": "tmp/flat",
            "rename": { "find": ".html", "replace": ".htm" }
        }] } } }"#,
    );

    project.cmd().assert().success();

    assert_eq!(project.files_under("tmp/flat"), vec!["foo.html"]);
}

#[test]
fn test_bad_rename_regex_rejects_target_only() {
    let project = Project::new();
    project.config(
        r#"{ "targets": {
            "broken": { "files": [{
                "expand": true, "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/broken",
                "rename": { "regex": "(", "replace": "x" }
            }] },
            "fine": { "files": [{ "cwd": "test/fixtures", "src": "*.html", "dest": "tmp/fine" }] }
        } }"#,
    );

    project
        .cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: [broken]"));

    assert!(!project.path("tmp/broken").exists());
    assert!(project.path("tmp/fine/foo.html").exists());
}
