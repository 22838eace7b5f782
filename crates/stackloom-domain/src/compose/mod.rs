//! Ordered construction of the full topology.
//!
//! Build order is strict: network, security chain, credentials and data
//! cluster, registry and compute, load balancing, static storage, edge
//! distribution, monitoring. A failure at any stage aborts the whole pass;
//! callers never see a partially built graph. Tag propagation runs as one
//! explicit pass at the end of construction.

use crate::error::ComposeError;
use crate::graph::{OutputSet, ResourceGraph};
use crate::naming;
use crate::stack::StackPlan;
use serde_json::{Value as JsonValue, json};
use std::collections::BTreeMap;
use tracing::debug;

pub mod compute;
pub mod data;
pub mod edge;
pub mod monitor;
pub mod network;
pub mod routing;
pub mod security;
pub mod storage;

/// A finished composition: the annotated-ready graph plus its output set.
#[derive(Clone, Debug)]
pub struct Synthesis {
    pub graph: ResourceGraph,
    pub outputs: OutputSet,
}

/// Build the whole topology for a resolved plan.
pub fn compose(plan: &StackPlan) -> Result<Synthesis, ComposeError> {
    let mut graph = ResourceGraph::new(&plan.stack_name());

    debug!(stage = "network", "declaring network tier");
    network::build(&mut graph, plan)?;

    debug!(stage = "security", "declaring permit chain");
    security::build(&mut graph, plan)?;

    debug!(stage = "data", "declaring credentials and database cluster");
    data::build(&mut graph, plan)?;

    debug!(stage = "compute", "declaring registry, cluster, task, service");
    compute::build(&mut graph, plan)?;

    debug!(stage = "routing", "declaring load balancer and target group");
    routing::build(&mut graph, plan)?;

    debug!(stage = "storage", "declaring static bucket");
    storage::build(&mut graph, plan)?;

    debug!(stage = "edge", "declaring edge distribution");
    edge::build(&mut graph, plan)?;

    debug!(stage = "monitor", "declaring health canary");
    monitor::build(&mut graph, plan)?;

    apply_tags(&mut graph, &plan.tags);

    let outputs = OutputSet {
        database_endpoint: naming::database_endpoint(plan),
        load_balancer_dns: naming::load_balancer_dns(plan),
        edge_domain: naming::edge_domain(plan),
        web_bucket: naming::web_bucket_name(plan),
    };

    debug!(resources = graph.len(), "composition finished");
    Ok(Synthesis { graph, outputs })
}

/// Merge stack-level tags into every taggable resource. Runs exactly once,
/// after all tiers are declared.
fn apply_tags(graph: &mut ResourceGraph, tags: &BTreeMap<String, String>) {
    if tags.is_empty() {
        return;
    }
    let entries: Vec<JsonValue> = tags
        .iter()
        .map(|(key, value)| json!({ "Key": key, "Value": value }))
        .collect();

    let ids: Vec<_> = graph.node_ids().collect();
    for id in ids {
        let node = graph.node_mut(id);
        if !node.kind.is_taggable() {
            continue;
        }
        if let Some(obj) = node.properties.as_object_mut() {
            obj.entry("Tags".to_string())
                .or_insert_with(|| JsonValue::Array(entries.clone()));
        }
    }
}
