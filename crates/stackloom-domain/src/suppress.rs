//! Rule-based annotation of accepted policy-linter exceptions.
//!
//! The visitor walks the finished graph exactly once, in construction order.
//! Each rule is independent: a node may satisfy several predicates and
//! accumulates the union of their exception sets. Attachment goes through a
//! per-node map keyed by rule id, so re-running the visitor or matching the
//! same rule twice changes nothing.

use crate::graph::{NodeId, ResourceGraph};
use stackloom_types::{ResourceKind, SuppressionEntry, ids};

/// What a suppression rule matches against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Exact resource-kind match.
    Kind(ResourceKind),
    /// Substring match against the node's hierarchical path.
    PathContains(String),
}

impl Predicate {
    fn matches(&self, graph: &ResourceGraph, id: NodeId) -> bool {
        let node = graph.node(id);
        match self {
            Predicate::Kind(kind) => node.kind == *kind,
            Predicate::PathContains(needle) => node.path.contains(needle),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SuppressionRule {
    pub predicate: Predicate,
    /// Propagate the exception set to every node beneath a match.
    pub applies_to_descendants: bool,
    pub exceptions: Vec<SuppressionEntry>,
}

impl SuppressionRule {
    fn new(
        predicate: Predicate,
        applies_to_descendants: bool,
        exceptions: &[(&str, &str)],
    ) -> Self {
        Self {
            predicate,
            applies_to_descendants,
            exceptions: exceptions
                .iter()
                .map(|(id, reason)| SuppressionEntry {
                    id: (*id).to_string(),
                    reason: (*reason).to_string(),
                })
                .collect(),
        }
    }
}

/// Walks the graph once, applying a fixed ordered rule list.
#[derive(Clone, Debug)]
pub struct SuppressionVisitor {
    rules: Vec<SuppressionRule>,
}

impl SuppressionVisitor {
    pub fn new(rules: Vec<SuppressionRule>) -> Self {
        Self { rules }
    }

    /// The built-in exception list for this topology.
    pub fn builtin() -> Self {
        Self::new(vec![
            SuppressionRule::new(
                Predicate::Kind(ResourceKind::Bucket),
                false,
                &[
                    (
                        ids::RULE_BUCKET_ACCESS_LOGS,
                        "Server access logs are disabled in development",
                    ),
                    (
                        ids::RULE_BUCKET_ORIGIN_ACCESS,
                        "Origin access control is configured at the distribution",
                    ),
                    (
                        ids::RULE_BUCKET_SSL_ONLY,
                        "SSL enforcement is disabled in development",
                    ),
                ],
            ),
            SuppressionRule::new(
                Predicate::PathContains("WebBucket/Policy".to_string()),
                true,
                &[(
                    ids::RULE_BUCKET_SSL_ONLY,
                    "SSL enforcement is disabled in development",
                )],
            ),
            SuppressionRule::new(
                Predicate::Kind(ResourceKind::LoadBalancer),
                false,
                &[
                    (
                        ids::RULE_LB_ACCESS_LOGS,
                        "Load balancer access logs are disabled in development",
                    ),
                    (
                        ids::RULE_OPEN_INGRESS,
                        "Plain HTTP is allowed from the edge prefix list in development",
                    ),
                ],
            ),
            SuppressionRule::new(
                Predicate::Kind(ResourceKind::DatabaseCluster),
                false,
                &[
                    (
                        ids::RULE_DB_IAM_AUTH,
                        "IAM database authentication is disabled in development",
                    ),
                    (
                        ids::RULE_DB_MULTI_AZ,
                        "Multi-AZ is disabled in development",
                    ),
                ],
            ),
            SuppressionRule::new(
                Predicate::PathContains("Edge".to_string()),
                true,
                &[
                    (
                        ids::RULE_EDGE_GEO_RESTRICTION,
                        "Geo restriction is disabled in development",
                    ),
                    (
                        ids::RULE_EDGE_WAF,
                        "No web ACL is attached in development",
                    ),
                    (
                        ids::RULE_EDGE_ACCESS_LOGS,
                        "Distribution access logs are disabled in development",
                    ),
                    (
                        ids::RULE_EDGE_TLS_MINIMUM,
                        "No minimum TLS version is pinned in development",
                    ),
                    (
                        ids::RULE_EDGE_ORIGIN_TLS,
                        "Origin traffic stays inside the private network",
                    ),
                ],
            ),
            SuppressionRule::new(
                Predicate::PathContains("Network".to_string()),
                true,
                &[(
                    ids::RULE_NETWORK_FLOW_LOGS,
                    "Flow logs are disabled in development",
                )],
            ),
            SuppressionRule::new(
                Predicate::PathContains("Cluster".to_string()),
                true,
                &[
                    (
                        ids::RULE_CLUSTER_INSIGHTS,
                        "The task ships its own telemetry agent",
                    ),
                    (
                        ids::RULE_TASK_PLAIN_ENV,
                        "Non-secret configuration is passed as plain environment variables",
                    ),
                ],
            ),
            SuppressionRule::new(
                Predicate::PathContains("TaskDefinition".to_string()),
                true,
                &[
                    (
                        ids::RULE_CLUSTER_INSIGHTS,
                        "The task ships its own telemetry agent",
                    ),
                    (
                        ids::RULE_TASK_PLAIN_ENV,
                        "Non-secret configuration is passed as plain environment variables",
                    ),
                ],
            ),
            SuppressionRule::new(
                Predicate::PathContains("Credentials".to_string()),
                true,
                &[(
                    ids::RULE_SECRET_ROTATION,
                    "Automatic rotation is disabled in development",
                )],
            ),
            SuppressionRule::new(
                Predicate::Kind(ResourceKind::DatabaseCluster),
                false,
                &[
                    (
                        ids::RULE_DB_DEFAULT_PORT,
                        "The engine default port is used behind the permit chain",
                    ),
                    (
                        ids::RULE_DB_BACKTRACK,
                        "Backtrack is disabled in development",
                    ),
                    (
                        ids::RULE_DB_LOG_EXPORTS,
                        "Engine log exports are disabled in development",
                    ),
                ],
            ),
        ])
    }

    pub fn rules(&self) -> &[SuppressionRule] {
        &self.rules
    }

    /// Annotate every node of the finished graph. Predicate evaluation never
    /// fails; an unmatched predicate attaches nothing.
    pub fn visit(&self, graph: &mut ResourceGraph) {
        let ids: Vec<NodeId> = graph.node_ids().collect();
        for id in &ids {
            for rule in &self.rules {
                if !rule.predicate.matches(graph, *id) {
                    continue;
                }
                attach(graph, *id, &rule.exceptions);
                if rule.applies_to_descendants {
                    for descendant in graph.descendants(*id) {
                        attach(graph, descendant, &rule.exceptions);
                    }
                }
            }
        }
    }
}

fn attach(graph: &mut ResourceGraph, id: NodeId, exceptions: &[SuppressionEntry]) {
    let node = graph.node_mut(id);
    for entry in exceptions {
        // Duplicate attachment is a no-op, not an error.
        node.suppressions
            .entry(entry.id.clone())
            .or_insert_with(|| entry.reason.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose;
    use crate::test_support::sample_plan;
    use std::collections::BTreeMap;

    fn annotated_graph() -> ResourceGraph {
        let mut synthesis = compose(&sample_plan("dev")).expect("compose dev plan");
        SuppressionVisitor::builtin().visit(&mut synthesis.graph);
        synthesis.graph
    }

    #[test]
    fn bucket_collects_the_union_of_kind_matches() {
        let graph = annotated_graph();
        let bucket = graph.get("WebBucket").expect("bucket node");
        for rule in [
            ids::RULE_BUCKET_ACCESS_LOGS,
            ids::RULE_BUCKET_ORIGIN_ACCESS,
            ids::RULE_BUCKET_SSL_ONLY,
        ] {
            assert!(bucket.suppressions.contains_key(rule), "missing {rule}");
        }
    }

    #[test]
    fn policy_inherits_through_the_path_predicate() {
        let graph = annotated_graph();
        let policy = graph.get("WebBucketPolicy").expect("bucket policy node");
        assert!(policy.suppressions.contains_key(ids::RULE_BUCKET_SSL_ONLY));
    }

    #[test]
    fn database_cluster_satisfies_both_rule_groups() {
        let graph = annotated_graph();
        let cluster = graph.get("DatabaseCluster").expect("database cluster");
        for rule in [
            ids::RULE_DB_IAM_AUTH,
            ids::RULE_DB_MULTI_AZ,
            ids::RULE_DB_DEFAULT_PORT,
            ids::RULE_DB_BACKTRACK,
            ids::RULE_DB_LOG_EXPORTS,
        ] {
            assert!(cluster.suppressions.contains_key(rule), "missing {rule}");
        }
        // The path also contains "Cluster", so the compute-path exceptions
        // accumulate onto the same node.
        assert!(cluster.suppressions.contains_key(ids::RULE_CLUSTER_INSIGHTS));
    }

    #[test]
    fn network_subtree_inherits_flow_log_exception() {
        let graph = annotated_graph();
        let subnet = graph.get("NetworkPublicSubnet1").expect("subnet node");
        assert!(subnet.suppressions.contains_key(ids::RULE_NETWORK_FLOW_LOGS));
    }

    #[test]
    fn unmatched_nodes_stay_clean() {
        let graph = annotated_graph();
        let role = graph.get("TaskExecutionRole").expect("execution role");
        assert!(role.suppressions.is_empty());
    }

    #[test]
    fn visiting_twice_is_idempotent() {
        let mut synthesis = compose(&sample_plan("dev")).expect("compose dev plan");
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

        assert_eq!(first, second);
    }

    #[test]
    fn visitor_never_adds_or_removes_nodes() {
        let mut synthesis = compose(&sample_plan("dev")).expect("compose dev plan");
        let before = synthesis.graph.len();
        SuppressionVisitor::builtin().visit(&mut synthesis.graph);
        assert_eq!(synthesis.graph.len(), before);
    }
}
