//! The tier-to-tier permit chain.
//!
//! Three groups, three rules: edge accepts the provider prefix list on the
//! edge port, compute accepts the edge group on the container port, data
//! accepts the compute group on the database port. A rule may only connect
//! adjacent tiers; wider hops never exist.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::stack::StackPlan;
use serde_json::{Value as JsonValue, json};
use stackloom_types::{ResourceKind, Tier};

/// Port the edge provider reaches the load balancer on.
pub const EDGE_PORT: u16 = 80;

/// Managed prefix list covering the edge provider's origin-facing ranges.
pub const EDGE_PREFIX_LIST: &str = "pl-58a04531";

/// The three groups of the chain, one per protected tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainGroup {
    Edge,
    Compute,
    Data,
}

impl ChainGroup {
    pub fn tier(self) -> Tier {
        match self {
            ChainGroup::Edge => Tier::Edge,
            ChainGroup::Compute => Tier::Compute,
            ChainGroup::Data => Tier::Data,
        }
    }

    pub fn logical_id(self) -> &'static str {
        match self {
            ChainGroup::Edge => "EdgeSecurityGroup",
            ChainGroup::Compute => "ServiceSecurityGroup",
            ChainGroup::Data => "DatabaseSecurityGroup",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ChainGroup::Edge => "Allow HTTP inbound traffic to the load balancer",
            ChainGroup::Compute => "Allow inbound traffic from the load balancer to the service",
            ChainGroup::Data => "Allow inbound traffic from the service to the database",
        }
    }
}

/// Where a permit rule accepts traffic from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleSource {
    /// Public-network side, scoped to the edge provider's prefix list.
    PrefixList(String),
    /// Another group in the chain.
    Group(ChainGroup),
}

impl RuleSource {
    pub fn tier(&self) -> Tier {
        match self {
            RuleSource::PrefixList(_) => Tier::Network,
            RuleSource::Group(group) => group.tier(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityRule {
    pub source: RuleSource,
    pub dest: ChainGroup,
    pub protocol: &'static str,
    /// A single port, never a range.
    pub port: u16,
    pub description: String,
}

/// The full permit chain for a plan. Each allowed source is its own rule.
pub fn chain(plan: &StackPlan) -> Vec<SecurityRule> {
    vec![
        SecurityRule {
            source: RuleSource::PrefixList(EDGE_PREFIX_LIST.to_string()),
            dest: ChainGroup::Edge,
            protocol: "tcp",
            port: EDGE_PORT,
            description: "Allow HTTP from the edge distribution".to_string(),
        },
        SecurityRule {
            source: RuleSource::Group(ChainGroup::Edge),
            dest: ChainGroup::Compute,
            protocol: "tcp",
            port: plan.backend.container_port,
            description: "Allow traffic from the load balancer".to_string(),
        },
        SecurityRule {
            source: RuleSource::Group(ChainGroup::Compute),
            dest: ChainGroup::Data,
            protocol: "tcp",
            port: plan.database.port,
            description: "Allow traffic from the backend service".to_string(),
        },
    ]
}

/// Reject any rule that connects tiers more than one hop apart.
pub fn validate_chain(rules: &[SecurityRule]) -> Result<(), ComposeError> {
    for rule in rules {
        let source = rule.source.tier();
        let dest = rule.dest.tier();
        if !source.is_adjacent_to(dest) {
            return Err(ComposeError::NonAdjacentTiers {
                source_tier: source,
                dest_tier: dest,
                description: rule.description.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct SecurityParts {
    pub edge_group: NodeId,
    pub compute_group: NodeId,
    pub data_group: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<SecurityParts, ComposeError> {
    let rules = chain(plan);
    validate_chain(&rules)?;

    let mut declared: Vec<NodeId> = Vec::with_capacity(3);
    for group in [ChainGroup::Edge, ChainGroup::Compute, ChainGroup::Data] {
        let ingress: Vec<JsonValue> = rules
            .iter()
            .filter(|r| r.dest == group)
            .map(ingress_entry)
            .collect();
        let id = graph.add(
            group.logical_id(),
            ResourceKind::SecurityGroup,
            Some(group.tier()),
            json!({
                "GroupDescription": group.description(),
                "VpcId": { "Ref": "Network" },
                "SecurityGroupIngress": ingress,
            }),
        )?;
        declared.push(id);
    }

    Ok(SecurityParts {
        edge_group: declared[0],
        compute_group: declared[1],
        data_group: declared[2],
    })
}

fn ingress_entry(rule: &SecurityRule) -> JsonValue {
    let mut entry = serde_json::Map::new();
    entry.insert("IpProtocol".to_string(), json!(rule.protocol));
    entry.insert("FromPort".to_string(), json!(rule.port));
    entry.insert("ToPort".to_string(), json!(rule.port));
    entry.insert("Description".to_string(), json!(rule.description));
    match &rule.source {
        RuleSource::PrefixList(id) => {
            entry.insert("SourcePrefixListId".to_string(), json!(id));
        }
        RuleSource::Group(group) => {
            entry.insert(
                "SourceSecurityGroupId".to_string(),
                json!({ "Ref": group.logical_id() }),
            );
        }
    }
    JsonValue::Object(entry)
}
