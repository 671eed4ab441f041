//! End-to-end tests for `sifter pull`.

#![cfg(unix)]

mod common;

use std::fs;

use common::*;

const WORKFLOW_REGISTRY: &str = r#"{
  "name": "wgs",
  "gatk_docker": "repo/gatk:2024-v1-abcd1234",
  "samtools_docker": "biocontainers/samtools:1.19",
  "ubuntu_docker": "ubuntu:22.04",
  "python_docker": "ubuntu:22.04",
  "notes_docker": "see the wiki"
}"#;

fn registry(env: &TestEnv) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(env.registry_path()).unwrap()).unwrap()
}

#[test]
fn pulls_images_no_target_builds() {
    let env = TestEnv::new();
    env.write_project_file("inputs/values/dockers.json", WORKFLOW_REGISTRY);

    let result = env.run(&["pull"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    assert!(result.stdout.contains("notes_docker"), "{}", result.stdout);

    let images = list_files(&env.project_path("docker_images"));
    assert_eq!(images, vec!["ubuntu_22.04.sif"]);

    let doc = registry(&env);
    assert_eq!(doc["name"], "wgs");
    for key in ["ubuntu_docker", "python_docker"] {
        assert_eq!(doc[key]["kind"], "pulled", "{key}");
        let locator = doc[key]["locator"].as_str().unwrap();
        assert!(locator.ends_with("docker_images/ubuntu_22.04.sif"), "{locator}");
    }
    assert_eq!(doc["gatk_docker"]["locator"], "repo/gatk:2024-v1-abcd1234");
    assert_eq!(doc["samtools_docker"]["locator"], "biocontainers/samtools:1.19");
    assert_eq!(doc["notes_docker"]["locator"], "see the wiki");
}

#[test]
fn second_pull_reuses_images() {
    let env = TestEnv::new();
    env.write_project_file("inputs/values/dockers.json", r#"{"ubuntu_docker": "ubuntu:22.04"}"#);

    assert_eq!(env.run(&["pull"]).exit_code, 0);
    let before = fs::read_to_string(env.registry_path()).unwrap();

    let result = env.run(&["--json", "pull"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    let summary: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(summary["pulled"].as_array().unwrap().len(), 0);
    assert_eq!(fs::read_to_string(env.registry_path()).unwrap(), before);
}

#[test]
fn failed_pull_is_a_partial_failure() {
    let env = TestEnv::new();
    env.write_project_file(
        "inputs/values/dockers.json",
        r#"{"ubuntu_docker": "ubuntu:22.04", "bad_docker": "lab/broken:1"}"#,
    );

    let result = env.run(&["pull", "--out-dir", "pulled", "--locator", "stem"]);

    assert_eq!(result.exit_code, 2, "{}", result.combined_output());
    assert!(result.stdout.contains("lab/broken:1"), "{}", result.stdout);
    let doc = registry(&env);
    assert_eq!(doc["ubuntu_docker"]["locator"], "ubuntu_22.04");
    assert_eq!(doc["ubuntu_docker"]["kind"], "pulled");
    assert_eq!(doc["bad_docker"]["locator"], "lab/broken:1");
    assert_eq!(doc["bad_docker"]["kind"], "local");
    assert!(env.project_path("pulled/ubuntu_22.04.sif").is_file());
}

#[test]
fn dry_run_pulls_nothing() {
    let env = TestEnv::new();
    env.write_project_file("inputs/values/dockers.json", r#"{"ubuntu_docker": "ubuntu:22.04"}"#);

    let result = env.run(&["pull", "--dry-run"]);

    assert_eq!(result.exit_code, 0, "{}", result.combined_output());
    assert!(result.stdout.contains("Would pull"), "{}", result.stdout);
    assert!(result.stdout.contains("1 updated"), "{}", result.stdout);
    assert!(!env.project_path("docker_images").exists());
    assert_eq!(
        env.read_project_file("inputs/values/dockers.json"),
        r#"{"ubuntu_docker": "ubuntu:22.04"}"#
    );
}
