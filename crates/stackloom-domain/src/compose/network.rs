//! Network tier: the private network and its subnet layout.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::stack::StackPlan;
use serde_json::json;
use stackloom_types::{ResourceKind, Tier};

const NETWORK_CIDR: &str = "10.0.0.0/16";

/// Two availability zones, three subnet groups: public (edge-facing),
/// private-with-egress (compute), isolated (data).
const SUBNETS: [(&str, &str, bool); 6] = [
    ("PublicSubnet1", "10.0.0.0/24", true),
    ("PublicSubnet2", "10.0.1.0/24", true),
    ("PrivateSubnet1", "10.0.2.0/24", false),
    ("PrivateSubnet2", "10.0.3.0/24", false),
    ("IsolatedSubnet1", "10.0.4.0/24", false),
    ("IsolatedSubnet2", "10.0.5.0/24", false),
];

#[derive(Clone, Copy, Debug)]
pub struct NetworkParts {
    pub vpc: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<NetworkParts, ComposeError> {
    let vpc = graph.add(
        "Network",
        ResourceKind::Network,
        Some(Tier::Network),
        json!({
            "CidrBlock": NETWORK_CIDR,
            "EnableDnsSupport": true,
            "EnableDnsHostnames": true,
        }),
    )?;

    for (index, (name, cidr, public)) in SUBNETS.iter().enumerate() {
        // Alternate zones a/c, two subnets per group.
        let zone_suffix = if index % 2 == 0 { "a" } else { "c" };
        graph.add_child(
            vpc,
            name,
            ResourceKind::Subnet,
            Some(Tier::Network),
            json!({
                "VpcId": { "Ref": "Network" },
                "CidrBlock": cidr,
                "AvailabilityZone": format!("{}{}", plan.region, zone_suffix),
                "MapPublicIpOnLaunch": public,
            }),
        )?;
    }

    Ok(NetworkParts { vpc })
}

/// Subnet references for the compute tier (private with egress).
pub fn private_subnet_refs() -> serde_json::Value {
    json!([
        { "Ref": "NetworkPrivateSubnet1" },
        { "Ref": "NetworkPrivateSubnet2" },
    ])
}

/// Subnet references for the data tier (isolated).
pub fn isolated_subnet_refs() -> serde_json::Value {
    json!([
        { "Ref": "NetworkIsolatedSubnet1" },
        { "Ref": "NetworkIsolatedSubnet2" },
    ])
}
