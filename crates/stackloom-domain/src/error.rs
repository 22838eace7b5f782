use stackloom_types::Tier;

/// Failures during composition. Any of these aborts the whole pass: the
/// caller never sees a partially built graph.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("duplicate logical id: {0}")]
    DuplicateLogicalId(String),

    #[error("unknown parent node for {child}")]
    UnknownParent { child: String },

    #[error(
        "security rule '{description}' connects non-adjacent tiers {source_tier:?} -> {dest_tier:?}"
    )]
    NonAdjacentTiers {
        source_tier: Tier,
        dest_tier: Tier,
        description: String,
    },

    #[error("task '{task}' must have exactly one essential container, found {found}")]
    EssentialContainerCount { task: String, found: usize },

    #[error("container '{container}' declares '{key}' as both plain env and secret ref")]
    EnvSecretOverlap { container: String, key: String },

    #[error("container '{container}' depends on undeclared container '{dependency}'")]
    UnknownContainerDependency {
        container: String,
        dependency: String,
    },

    #[error("router must have exactly one default route, found {found}")]
    DefaultRouteCount { found: usize },
}
