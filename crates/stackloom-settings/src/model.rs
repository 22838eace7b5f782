use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `stackloom.toml` schema v1.
///
/// This is a *user-facing* override model: every field is optional, the
/// environment preset supplies whatever is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StackConfigV1 {
    /// Optional schema string for tooling (`stackloom.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Additional stack-level tags, merged over the preset's.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_capacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_units: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mib: Option<u32>,

    /// Fixed running-task count. Mutually exclusive with `scaling`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_count: Option<u32>,

    /// Autoscaling bounds. Mutually exclusive with `desired_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ScalingConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScalingConfig {
    pub min_capacity: u32,
    pub max_capacity: u32,

    /// Target CPU utilization, percent. Defaults to 50.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cpu_pct: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_in_cooldown_s: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_out_cooldown_s: Option<u32>,
}
