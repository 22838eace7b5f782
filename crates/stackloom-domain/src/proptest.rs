//! Property-based tests for the synthesis engine.
//!
//! These tests use proptest to verify invariants around:
//! - Permit-chain adjacency for arbitrary valid plans
//! - Suppression idempotence over the finished graph
//! - Container env/secret channel disjointness
//! - Longest-prefix route matching

use crate::compose;
use crate::compose::edge::{AllowedMethods, CacheMode, EdgeRouter, OriginRef, RouteRule};
use crate::compose::{compute, security};
use crate::stack::{BackendPlan, DatabasePlan, ServiceScaling, StackPlan};
use crate::suppress::SuppressionVisitor;
use proptest::prelude::*;
use stackloom_types::ResourceKind;
use std::collections::BTreeMap;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for app names (lowercase alphanumeric).
fn arb_app_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{2,11}").expect("valid regex")
}

fn arb_region() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ap-northeast-1".to_string()),
        Just("us-east-1".to_string()),
        Just("eu-west-1".to_string()),
    ]
}

fn arb_environment() -> impl Strategy<Value = String> {
    prop_oneof![Just("dev".to_string()), Just("prd".to_string())]
}

fn arb_port() -> impl Strategy<Value = u16> {
    1024u16..9000
}

fn arb_scaling() -> impl Strategy<Value = ServiceScaling> {
    prop_oneof![
        (1u32..5).prop_map(ServiceScaling::Fixed),
        (1u32..3, 4u32..10, 30u32..80).prop_map(|(min, max, target_cpu_pct)| {
            ServiceScaling::AutoScaled {
                min,
                max,
                target_cpu_pct,
                scale_in_cooldown_s: 120,
                scale_out_cooldown_s: 60,
            }
        }),
    ]
}

fn arb_tags() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(
        prop::string::string_regex("[A-Z][a-z]{2,8}").expect("valid regex"),
        prop::string::string_regex("[a-z]{2,12}").expect("valid regex"),
        0..4,
    )
}

fn arb_plan() -> impl Strategy<Value = StackPlan> {
    (
        arb_app_name(),
        arb_environment(),
        arb_region(),
        arb_tags(),
        arb_port(),
        arb_port(),
        arb_scaling(),
    )
        .prop_map(
            |(app_name, environment, region, tags, container_port, db_port, scaling)| {
                let service_name = format!("{app_name}-backend");
                StackPlan {
                    app_name,
                    environment,
                    region,
                    tags,
                    database: DatabasePlan {
                        name: "appdb".to_string(),
                        port: db_port,
                        min_capacity: 0.0,
                        max_capacity: 1.0,
                    },
                    backend: BackendPlan {
                        service_name,
                        container_port,
                        cpu_units: 256,
                        memory_mib: 512,
                        scaling,
                    },
                }
            },
        )
}

/// Strategy for route prefixes like `/api/*`, `/api/v2/*`.
fn arb_route_prefixes() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("(/[a-z]{1,6}){1,3}").expect("valid regex"),
        1..5,
    )
    .prop_map(|prefixes| {
        let mut unique: Vec<String> = prefixes
            .into_iter()
            .map(|p| format!("{p}/*"))
            .collect();
        unique.sort();
        unique.dedup();
        unique
    })
}

fn arb_request_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("(/[a-z]{1,6}){1,4}").expect("valid regex")
}

// ============================================================================
// Property tests: permit chain
// ============================================================================

proptest! {
    /// Every generated security rule spans exactly one tier hop.
    #[test]
    fn permit_chain_rules_are_always_adjacent(plan in arb_plan()) {
        let rules = security::chain(&plan);
        security::validate_chain(&rules).expect("chain validates");
        for rule in &rules {
            prop_assert_eq!(
                rule.source.tier().index().abs_diff(rule.dest.tier().index()),
                1,
                "rule '{}' spans more than one hop",
                rule.description
            );
        }
    }

    /// Each rule carries a single configured port, never a range, and the
    /// three configured ports land on the right hops.
    #[test]
    fn permit_chain_ports_match_the_plan(plan in arb_plan()) {
        let rules = security::chain(&plan);
        prop_assert_eq!(rules.len(), 3);
        prop_assert_eq!(rules[0].port, security::EDGE_PORT);
        prop_assert_eq!(rules[1].port, plan.backend.container_port);
        prop_assert_eq!(rules[2].port, plan.database.port);
    }
}

// ============================================================================
// Property tests: composition shape
// ============================================================================

proptest! {
    /// Composition succeeds for every valid plan and always yields the same
    /// per-kind layout.
    #[test]
    fn composition_yields_fixed_kind_counts(plan in arb_plan()) {
        let synthesis = compose(&plan).expect("compose valid plan");
        let graph = &synthesis.graph;

        prop_assert_eq!(graph.count_kind(ResourceKind::Network), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::SecurityGroup), 3);
        prop_assert_eq!(graph.count_kind(ResourceKind::DatabaseCluster), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::ComputeCluster), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::Service), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::TaskDefinition), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::LoadBalancer), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::Listener), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::TargetGroup), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::Bucket), 1);
        prop_assert_eq!(graph.count_kind(ResourceKind::Distribution), 1);

        let scaling_nodes = graph.count_kind(ResourceKind::ScalableTarget)
            + graph.count_kind(ResourceKind::ScalingPolicy);
        if plan.backend.scaling.is_autoscaled() {
            prop_assert_eq!(scaling_nodes, 2);
        } else {
            prop_assert_eq!(scaling_nodes, 0);
        }
    }

    /// Stack tags reach every taggable node and only those.
    #[test]
    fn tags_propagate_to_taggable_nodes_only(plan in arb_plan()) {
        let synthesis = compose(&plan).expect("compose valid plan");
        if plan.tags.is_empty() {
            return Ok(());
        }
        for node in synthesis.graph.nodes() {
            prop_assert_eq!(
                node.properties.get("Tags").is_some(),
                node.kind.is_taggable(),
                "tagging mismatch on {}",
                &node.logical_id
            );
        }
    }
}

// ============================================================================
// Property tests: task invariants
// ============================================================================

proptest! {
    /// Exactly one essential container per task; plain-env and secret-ref
    /// key sets never overlap.
    #[test]
    fn task_spec_invariants_hold(plan in arb_plan()) {
        let spec = compute::task_spec(&plan);
        spec.validate().expect("task spec validates");

        let essential = spec.containers.iter().filter(|c| c.essential).count();
        prop_assert_eq!(essential, 1);

        for container in &spec.containers {
            for key in container.environment.keys() {
                prop_assert!(
                    !container.secrets.contains_key(key),
                    "key {} in both channels of {}",
                    key,
                    &container.name
                );
            }
        }
    }
}

// ============================================================================
// Property tests: suppression idempotence
// ============================================================================

proptest! {
    /// Re-running the visitor over an unchanged graph yields identical
    /// per-node exception sets.
    #[test]
    fn suppression_is_idempotent(plan in arb_plan()) {
        let mut synthesis = compose(&plan).expect("compose valid plan");
        let visitor = SuppressionVisitor::builtin();

        visitor.visit(&mut synthesis.graph);
        let first: Vec<BTreeMap<String, String>> = synthesis
            .graph
            .nodes()
            .map(|n| n.suppressions.clone())
            .collect();

        visitor.visit(&mut synthesis.graph);
        let second: Vec<BTreeMap<String, String>> = synthesis
            .graph
            .nodes()
            .map(|n| n.suppressions.clone())
            .collect();

        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Property tests: route matching
// ============================================================================

proptest! {
    /// The matched route's prefix is a prefix of the path, and no other
    /// matching rule has a longer one.
    #[test]
    fn route_match_picks_the_longest_prefix(
        prefixes in arb_route_prefixes(),
        path in arb_request_path(),
    ) {
        let mut rules = vec![RouteRule {
            path_pattern: None,
            origin: OriginRef::StaticBucket,
            cache: CacheMode::Optimized,
            methods: AllowedMethods::GetHead,
            is_default: true,
        }];
        rules.extend(prefixes.iter().map(|pattern| RouteRule {
            path_pattern: Some(pattern.clone()),
            origin: OriginRef::Compute,
            cache: CacheMode::Disabled,
            methods: AllowedMethods::All,
            is_default: false,
        }));
        let router = EdgeRouter::new(rules).expect("router validates");

        let matched = router.match_route(&path);
        let matching_lengths: Vec<usize> = prefixes
            .iter()
            .map(|p| p.trim_end_matches('*').to_string())
            .filter(|p| path.starts_with(p.as_str()))
            .map(|p| p.len())
            .collect();

        match &matched.path_pattern {
            Some(pattern) => {
                let prefix = pattern.trim_end_matches('*');
                prop_assert!(path.starts_with(prefix));
                prop_assert_eq!(
                    Some(prefix.len()),
                    matching_lengths.iter().copied().max()
                );
            }
            None => {
                prop_assert!(matched.is_default);
                prop_assert!(matching_lengths.is_empty());
            }
        }
    }
}
