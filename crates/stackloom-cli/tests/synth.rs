use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use stackloom_test_util::{has_resource_properties, normalize_nondeterministic, resource_count};

/// Helper to get a Command for the stackloom binary.
#[allow(deprecated)]
fn stackloom_cmd() -> Command {
    Command::cargo_bin("stackloom").unwrap()
}

fn read_json(path: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read json file");
    serde_json::from_str(&text).expect("parse json file")
}

#[test]
fn synth_writes_template_and_manifest() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let out = tmp.path().join("template.json");
    let manifest_out = tmp.path().join("manifest.json");

    stackloom_cmd()
        .current_dir(tmp.path())
        .args([
            "synth",
            "--env",
            "dev",
            "--out",
            out.to_str().expect("utf8 path"),
            "--manifest-out",
            manifest_out.to_str().expect("utf8 path"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("DatabaseEndpoint"));

    let template = read_json(&out);
    assert_eq!(resource_count(&template, "AWS::EC2::VPC"), 1);
    assert_eq!(resource_count(&template, "AWS::EC2::SecurityGroup"), 3);
    assert_eq!(resource_count(&template, "AWS::RDS::DBCluster"), 1);
    assert_eq!(resource_count(&template, "AWS::ECS::Service"), 1);
    assert_eq!(resource_count(&template, "AWS::CloudFront::Distribution"), 1);
    assert!(has_resource_properties(
        &template,
        "AWS::ElasticLoadBalancingV2::TargetGroup",
        &serde_json::json!({
            "HealthCheckPath": "/actuator/health",
            "HealthCheckIntervalSeconds": 30,
        })
    ));

    let manifest = normalize_nondeterministic(read_json(&manifest_out));
    assert_eq!(manifest["schema"], "stackloom.manifest.v1");
    assert_eq!(manifest["tool"]["name"], "stackloom");
    assert_eq!(manifest["tool"]["version"], "__VERSION__");
    assert_eq!(manifest["synthesized_at"], "__TIMESTAMP__");
    assert_eq!(manifest["environment"], "dev");
}

#[test]
fn unknown_environment_fails_without_writing_artifacts() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let out = tmp.path().join("template.json");

    stackloom_cmd()
        .current_dir(tmp.path())
        .args(["synth", "--env", "staging", "--out", out.to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment key"));

    assert!(!out.exists(), "no template may be written on failure");
}

#[test]
fn config_file_overrides_are_honored() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    std::fs::write(
        tmp.path().join("stackloom.toml"),
        "app_name = \"orders\"\n\n[backend]\ncontainer_port = 9090\n",
    )
    .expect("write config");
    let out = tmp.path().join("template.json");

    stackloom_cmd()
        .current_dir(tmp.path())
        .args(["synth", "--env", "dev", "--out", out.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("orders"));

    let template = read_json(&out);
    assert!(has_resource_properties(
        &template,
        "AWS::ECS::TaskDefinition",
        &serde_json::json!({ "Family": "orders-task" })
    ));
    assert!(has_resource_properties(
        &template,
        "AWS::ElasticLoadBalancingV2::TargetGroup",
        &serde_json::json!({ "Port": 9090 })
    ));
}

#[test]
fn ambiguous_scaling_config_is_fatal() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    std::fs::write(
        tmp.path().join("stackloom.toml"),
        "[backend]\ndesired_count = 2\n\n[backend.scaling]\nmin_capacity = 1\nmax_capacity = 5\n",
    )
    .expect("write config");

    stackloom_cmd()
        .current_dir(tmp.path())
        .args(["synth", "--env", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("desired_count and scaling"));
}

#[test]
fn write_summary_produces_markdown() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let summary_out = tmp.path().join("summary.md");

    stackloom_cmd()
        .current_dir(tmp.path())
        .args([
            "synth",
            "--env",
            "prd",
            "--write-summary",
            "--summary-out",
            summary_out.to_str().expect("utf8 path"),
        ])
        .assert()
        .success();

    let summary = std::fs::read_to_string(&summary_out).expect("read summary");
    assert!(summary.contains("# Synthesis summary"));
    assert!(summary.contains("AWS::EC2::VPC"));
}

#[test]
fn explain_prints_rule_documentation() {
    stackloom_cmd()
        .args(["explain", "AwsSolutions-S1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bucket Server Access Logs"));
}

#[test]
fn explain_unknown_rule_exits_nonzero() {
    stackloom_cmd()
        .args(["explain", "AwsSolutions-XYZ"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Available rule ids"));
}
