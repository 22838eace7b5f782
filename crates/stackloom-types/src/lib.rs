//! Stable DTOs and IDs used across the stackloom workspace.
//!
//! This crate is intentionally boring:
//! - the emitted template/manifest schema
//! - the closed resource-kind and tier enums
//! - canonical hierarchical node path handling
//! - stable lint-rule IDs and the rule explanation registry

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod kind;
pub mod path;
pub mod template;

pub use explain::{Explanation, lookup_explanation};
pub use kind::{ResourceKind, Tier};
pub use path::NodePath;
pub use template::{
    OutputDecl, ResourceDecl, ResourceMetadata, SCHEMA_MANIFEST_V1, SCHEMA_TEMPLATE_V1,
    SuppressionEntry, SynthManifest, Template, ToolMeta,
};
