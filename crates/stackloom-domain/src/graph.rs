//! The in-memory resource graph produced by composition.
//!
//! Nodes are created exactly once during a synthesis pass and never removed;
//! the only post-composition writes are suppression annotations. Iteration
//! order is insertion order, which the composer keeps equal to construction
//! (pre-)order.

use crate::error::ComposeError;
use serde_json::Value as JsonValue;
use stackloom_types::{NodePath, ResourceKind, Tier};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct ResourceNode {
    pub logical_id: String,
    pub kind: ResourceKind,
    pub path: NodePath,
    /// Security boundary this resource belongs to, where one applies.
    pub tier: Option<Tier>,
    pub properties: JsonValue,
    /// rule id -> reason. A BTreeMap makes duplicate attachment a no-op and
    /// keeps the emitted order deterministic.
    pub suppressions: BTreeMap<String, String>,
    parent: Option<NodeId>,
}

impl ResourceNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Clone, Debug)]
pub struct ResourceGraph {
    scope: NodePath,
    nodes: Vec<ResourceNode>,
    by_logical_id: BTreeMap<String, NodeId>,
}

impl ResourceGraph {
    pub fn new(stack_name: &str) -> Self {
        Self {
            scope: NodePath::new(stack_name),
            nodes: Vec::new(),
            by_logical_id: BTreeMap::new(),
        }
    }

    /// Hierarchical path of the stack root.
    pub fn scope(&self) -> &NodePath {
        &self.scope
    }

    /// Declare a top-level resource.
    pub fn add(
        &mut self,
        logical_id: &str,
        kind: ResourceKind,
        tier: Option<Tier>,
        properties: JsonValue,
    ) -> Result<NodeId, ComposeError> {
        let path = self.scope.join(logical_id);
        self.insert(logical_id, kind, tier, properties, path, None)
    }

    /// Declare a resource beneath an existing node.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        logical_id: &str,
        kind: ResourceKind,
        tier: Option<Tier>,
        properties: JsonValue,
    ) -> Result<NodeId, ComposeError> {
        let path = self.nodes[parent.0].path.join(logical_id);
        self.insert(logical_id, kind, tier, properties, path, Some(parent))
    }

    fn insert(
        &mut self,
        logical_id: &str,
        kind: ResourceKind,
        tier: Option<Tier>,
        properties: JsonValue,
        path: NodePath,
        parent: Option<NodeId>,
    ) -> Result<NodeId, ComposeError> {
        // Template resource keys are flat, so child ids must be qualified by
        // their parent to stay unique.
        let key = match parent {
            Some(p) => format!("{}{}", self.nodes[p.0].logical_id, logical_id),
            None => logical_id.to_string(),
        };
        if self.by_logical_id.contains_key(&key) {
            return Err(ComposeError::DuplicateLogicalId(key));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(ResourceNode {
            logical_id: key.clone(),
            kind,
            path,
            tier,
            properties,
            suppressions: BTreeMap::new(),
            parent,
        });
        self.by_logical_id.insert(key, id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> &ResourceNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ResourceNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, logical_id: &str) -> Option<&ResourceNode> {
        self.by_logical_id.get(logical_id).map(|id| &self.nodes[id.0])
    }

    /// All nodes in insertion (construction) order.
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn count_kind(&self, kind: ResourceKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Ids of every node strictly beneath `id` in the hierarchy.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let ancestor = &self.nodes[id.0].path;
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|n| self.nodes[n.0].path.is_descendant_of(ancestor))
            .collect()
    }

    /// Total suppression annotations across all nodes.
    pub fn suppression_count(&self) -> usize {
        self.nodes.iter().map(|n| n.suppressions.len()).sum()
    }
}

/// Named immutable values exposed after composition, consumed by the
/// external deployment collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputSet {
    pub database_endpoint: String,
    pub load_balancer_dns: String,
    pub edge_domain: String,
    pub web_bucket: String,
}

impl OutputSet {
    /// (name, description, value) triples in emission order.
    pub fn entries(&self) -> [(&'static str, &'static str, &str); 4] {
        use stackloom_types::ids;
        [
            (
                ids::OUTPUT_DATABASE_ENDPOINT,
                "The endpoint of the database",
                self.database_endpoint.as_str(),
            ),
            (
                ids::OUTPUT_LOAD_BALANCER_DNS,
                "The DNS name of the load balancer",
                self.load_balancer_dns.as_str(),
            ),
            (
                ids::OUTPUT_EDGE_DOMAIN,
                "The domain name of the edge distribution",
                self.edge_domain.as_str(),
            ),
            (
                ids::OUTPUT_WEB_BUCKET,
                "The name of the bucket hosting the frontend",
                self.web_bucket.as_str(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn child_paths_nest_under_parent() {
        let mut graph = ResourceGraph::new("webapp-stack");
        let vpc = graph
            .add("Network", ResourceKind::Network, Some(Tier::Network), json!({}))
            .expect("add network");
        let subnet = graph
            .add_child(vpc, "PublicSubnet1", ResourceKind::Subnet, Some(Tier::Network), json!({}))
            .expect("add subnet");

        assert_eq!(graph.node(subnet).path.as_str(), "webapp-stack/Network/PublicSubnet1");
        assert_eq!(graph.node(subnet).logical_id, "NetworkPublicSubnet1");
        assert_eq!(graph.node(subnet).parent(), Some(vpc));
    }

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut graph = ResourceGraph::new("webapp-stack");
        graph
            .add("WebBucket", ResourceKind::Bucket, None, json!({}))
            .expect("first add");
        let err = graph
            .add("WebBucket", ResourceKind::Bucket, None, json!({}))
            .expect_err("second add must fail");
        assert!(matches!(err, ComposeError::DuplicateLogicalId(id) if id == "WebBucket"));
    }

    #[test]
    fn descendants_cover_whole_subtree() {
        let mut graph = ResourceGraph::new("s");
        let vpc = graph
            .add("Network", ResourceKind::Network, Some(Tier::Network), json!({}))
            .expect("network");
        let a = graph
            .add_child(vpc, "PublicSubnet1", ResourceKind::Subnet, None, json!({}))
            .expect("subnet");
        let _other = graph
            .add("WebBucket", ResourceKind::Bucket, None, json!({}))
            .expect("bucket");

        assert_eq!(graph.descendants(vpc), vec![a]);
        assert!(graph.descendants(a).is_empty());
    }

    #[test]
    fn nodes_iterate_in_insertion_order() {
        let mut graph = ResourceGraph::new("s");
        graph.add("A", ResourceKind::Bucket, None, json!({})).expect("a");
        graph.add("B", ResourceKind::Bucket, None, json!({})).expect("b");
        let ids: Vec<&str> = graph.nodes().map(|n| n.logical_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
