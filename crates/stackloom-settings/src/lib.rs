//! Config parsing and environment preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration
//! provided as strings. Resolution is the all-or-nothing gate in front of the
//! composer: every validation failure happens here, before any resource is
//! declared.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{BackendConfig, DatabaseConfig, ScalingConfig, StackConfigV1};
pub use presets::known_environments;
pub use resolve::{ConfigError, Overrides};

use stackloom_domain::stack::StackPlan;

/// Parse `stackloom.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> Result<StackConfigV1, ConfigError> {
    let cfg: StackConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the plan the composer runs against (environment preset + config
/// file + CLI overrides).
pub fn resolve_plan(
    env_key: &str,
    cfg: StackConfigV1,
    overrides: Overrides,
) -> Result<StackPlan, ConfigError> {
    resolve::resolve_plan(env_key, cfg, overrides)
}
