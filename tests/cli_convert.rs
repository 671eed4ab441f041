//! End-to-end tests for `sifter convert`.

#![cfg(unix)]

mod common;

use std::fs;

use common::*;

fn exported(env: &TestEnv, tags: &str) {
    env.write_project_file("tags.txt", tags);
    let result = env.run(&["export", "tags.txt", "archives"]);
    assert!(
        result.exit_code == 0,
        "export failed: {}",
        result.combined_output()
    );
}

fn registry(env: &TestEnv) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(env.registry_path()).unwrap()).unwrap()
}

#[test]
fn one_failed_conversion_of_three() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\nrepo/broken:1\nrepo/b:1\n");

    let result = env.run(&["convert", "archives"]);

    assert_eq!(result.exit_code, 2, "{}", result.combined_output());
    assert!(result.stdout.contains("repo/broken:1"), "{}", result.stdout);
    assert!(result.stdout.contains("fakeroot"), "{}", result.stdout);

    let doc = registry(&env);
    let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["repo/a:1", "repo/b:1"]);
    let locator = doc["repo/a:1"]["locator"].as_str().unwrap();
    assert!(locator.starts_with('/'), "{locator}");
    assert!(locator.ends_with("archives/repo_a_1.sif"), "{locator}");
    assert_eq!(doc["repo/a:1"]["kind"], "local");

    let files = list_files(&env.project_path("archives"));
    assert!(files.contains(&"repo_a_1.sif".to_string()));
    assert!(!files.contains(&"repo_broken_1.sif".to_string()));
    assert!(!files.iter().any(|f| f.ends_with(".partial")), "{files:?}");
}

#[test]
fn second_run_is_idempotent() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\n");

    assert_eq!(env.run(&["convert", "archives"]).exit_code, 0);
    let before = fs::read_to_string(env.registry_path()).unwrap();

    let result = env.run(&["--json", "convert", "archives"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    let summary: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(summary["converted"].as_array().unwrap().len(), 0);
    assert_eq!(summary["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(summary["registry"]["unchanged"][0], "repo/a:1");
    assert_eq!(fs::read_to_string(env.registry_path()).unwrap(), before);
}

#[test]
fn stem_locators_and_rebinding() {
    let env = TestEnv::new();
    exported(&env, "repo/gatk:1\n");
    env.write_project_file(
        "inputs/values/dockers.json",
        r#"{"name": "wgs", "gatk_docker": "repo/gatk:1", "ubuntu_docker": "ubuntu:22.04"}"#,
    );

    let result = env.run(&["convert", "archives", "--locator", "stem"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    let doc = registry(&env);
    assert_eq!(doc["name"], "wgs");
    assert_eq!(doc["repo/gatk:1"]["locator"], "repo_gatk_1");
    assert_eq!(doc["gatk_docker"]["locator"], "repo_gatk_1");
    assert_eq!(doc["ubuntu_docker"]["locator"], "ubuntu:22.04");
}

#[test]
fn corrupted_registry_is_an_integrity_error() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\n");
    env.write_project_file("inputs/values/dockers.json", "{ this is not json");

    let result = env.run(&["convert", "archives"]);

    assert_eq!(result.exit_code, 3, "{}", result.combined_output());
    assert!(result.stderr.contains("registry file corrupted"), "{}", result.stderr);
    assert_eq!(
        fs::read_to_string(env.registry_path()).unwrap(),
        "{ this is not json"
    );
    assert!(!env.project_path("archives/repo_a_1.sif").exists());
}

#[test]
fn archive_without_manifest_entry_is_reported() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\n");
    env.write_project_file("archives/stray.tar", "archive:stray\n");

    let result = env.run(&["convert", "archives"]);

    assert_eq!(result.exit_code, 2, "{}", result.combined_output());
    assert!(result.stdout.contains("stray.tar"), "{}", result.stdout);
    assert!(registry(&env).get("repo/a:1").is_some());
}

#[test]
fn missing_runtime_changes_nothing() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\n");

    let result = env.run_with_env(
        &["convert", "archives"],
        &[("SIFTER_RUNTIME", "sifter-no-such-apptainer")],
    );

    assert_eq!(result.exit_code, 1, "{}", result.combined_output());
    assert!(result.stderr.contains("convert.runtime"), "{}", result.stderr);
    assert!(!env.registry_path().exists());
}

#[test]
fn dry_run_reports_registry_changes() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\nrepo/b:1\n");

    let result = env.run(&["--json", "convert", "archives", "--dry-run"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    let summary: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(summary["dry_run"], true);
    assert_eq!(summary["registry"]["added"].as_array().unwrap().len(), 2);
    assert!(!env.registry_path().exists());
    assert!(!env.project_path("archives/repo_a_1.sif").exists());
}

#[test]
fn images_can_live_elsewhere() {
    let env = TestEnv::new();
    exported(&env, "repo/a:1\n");

    let result = env.run(&["convert", "archives", "--image-dir", "images"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    assert!(env.project_path("images/repo_a_1.sif").is_file());
    let locator = registry(&env)["repo/a:1"]["locator"].as_str().unwrap().to_string();
    assert!(locator.ends_with("images/repo_a_1.sif"), "{locator}");
}
