//! Shared test utilities for the stackloom workspace.
//!
//! Assertion helpers over emitted template JSON (count by provider type,
//! subset property matching) and normalization of non-deterministic manifest
//! fields for golden-file comparison.

use serde_json::Value;

/// Number of resources in a template document with the given provider type.
pub fn resource_count(template: &Value, provider_type: &str) -> usize {
    template["Resources"]
        .as_object()
        .map(|resources| {
            resources
                .values()
                .filter(|r| r["Type"] == provider_type)
                .count()
        })
        .unwrap_or(0)
}

/// True if some resource of the given provider type carries all of
/// `expected` as a subset of its `Properties`.
pub fn has_resource_properties(template: &Value, provider_type: &str, expected: &Value) -> bool {
    template["Resources"]
        .as_object()
        .map(|resources| {
            resources
                .values()
                .filter(|r| r["Type"] == provider_type)
                .any(|r| is_subset(expected, &r["Properties"]))
        })
        .unwrap_or(false)
}

/// Structural subset match: every key/element in `expected` must appear in
/// `actual` with a matching value. Arrays match when every expected element
/// subset-matches some actual element.
pub fn is_subset(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => exp
            .iter()
            .all(|(key, value)| act.get(key).is_some_and(|a| is_subset(value, a))),
        (Value::Array(exp), Value::Array(act)) => exp
            .iter()
            .all(|value| act.iter().any(|a| is_subset(value, a))),
        (exp, act) => exp == act,
    }
}

/// Normalize non-deterministic manifest fields for golden-file comparison:
/// `synthesized_at` becomes a fixed placeholder at any depth, and
/// `tool.version` is replaced only on envelope-shaped roots.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema") && obj.contains_key("tool");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("synthesized_at") {
                map.insert(
                    "synthesized_at".to_string(),
                    Value::String("__TIMESTAMP__".to_string()),
                );
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_template() -> Value {
        json!({
            "Resources": {
                "Network": {
                    "Type": "AWS::EC2::VPC",
                    "Properties": { "CidrBlock": "10.0.0.0/16", "EnableDnsSupport": true }
                },
                "WebBucket": {
                    "Type": "AWS::S3::Bucket",
                    "Properties": {
                        "WebsiteConfiguration": { "IndexDocument": "index.html" }
                    }
                }
            }
        })
    }

    #[test]
    fn counts_by_provider_type() {
        let template = sample_template();
        assert_eq!(resource_count(&template, "AWS::EC2::VPC"), 1);
        assert_eq!(resource_count(&template, "AWS::RDS::DBCluster"), 0);
    }

    #[test]
    fn subset_matching_ignores_extra_keys() {
        let template = sample_template();
        assert!(has_resource_properties(
            &template,
            "AWS::EC2::VPC",
            &json!({ "CidrBlock": "10.0.0.0/16" })
        ));
        assert!(has_resource_properties(
            &template,
            "AWS::S3::Bucket",
            &json!({ "WebsiteConfiguration": { "IndexDocument": "index.html" } })
        ));
        assert!(!has_resource_properties(
            &template,
            "AWS::EC2::VPC",
            &json!({ "CidrBlock": "192.168.0.0/16" })
        ));
    }

    #[test]
    fn normalize_replaces_timestamp_and_envelope_version() {
        let input = json!({
            "schema": "stackloom.manifest.v1",
            "tool": { "name": "stackloom", "version": "0.1.0" },
            "synthesized_at": "2026-01-01T00:00:00Z",
        });
        let normalized = normalize_nondeterministic(input);
        assert_eq!(normalized["tool"]["version"], "__VERSION__");
        assert_eq!(normalized["synthesized_at"], "__TIMESTAMP__");
    }

    #[test]
    fn normalize_leaves_non_envelope_versions_alone() {
        let input = json!({
            "tool": { "name": "other", "version": "9.9.9" },
        });
        let normalized = normalize_nondeterministic(input);
        assert_eq!(normalized["tool"]["version"], "9.9.9");
    }
}
