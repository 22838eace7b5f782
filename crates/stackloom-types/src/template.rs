use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifiers for emitted artifacts.
pub const SCHEMA_TEMPLATE_V1: &str = "stackloom.template.v1";
pub const SCHEMA_MANIFEST_V1: &str = "stackloom.manifest.v1";

/// The synthesized deployment template in the provider's declarative schema.
///
/// The field casing follows the target format, not Rust conventions; this is
/// an emission target, the provider owns the shape.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Template {
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, ResourceDecl>,

    #[serde(rename = "Outputs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, OutputDecl>,
}

impl Template {
    /// Number of declared resources with the given provider type string.
    pub fn count_type(&self, provider_type: &str) -> usize {
        self.resources
            .values()
            .filter(|r| r.r#type == provider_type)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceDecl {
    #[serde(rename = "Type")]
    pub r#type: String,

    #[serde(rename = "Properties")]
    pub properties: JsonValue,

    #[serde(rename = "Metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResourceMetadata>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ResourceMetadata {
    /// Accepted policy-linter exceptions attached by the suppression visitor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lint_suppressions: Vec<SuppressionEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuppressionEntry {
    pub id: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputDecl {
    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Envelope written alongside the template: what was synthesized, by which
/// tool, when.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SynthManifest {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,

    pub app_name: String,
    pub environment: String,
    pub region: String,

    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub synthesized_at: OffsetDateTime,

    pub resource_count: u32,
    pub suppression_count: u32,
}
