//! Closed resource-kind and tier enums.
//!
//! Suppression dispatch and template emission both switch over `ResourceKind`
//! rather than inspecting concrete types at runtime.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Construction-order phase with its own security boundary, ordered by
/// traffic-flow hop count: public network, edge, compute, data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Network,
    Edge,
    Compute,
    Data,
}

impl Tier {
    /// Hop index along the permit chain. A security rule may only connect
    /// tiers whose indices differ by exactly one.
    pub fn index(self) -> u8 {
        match self {
            Tier::Network => 0,
            Tier::Edge => 1,
            Tier::Compute => 2,
            Tier::Data => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Network => "network",
            Tier::Edge => "edge",
            Tier::Compute => "compute",
            Tier::Data => "data",
        }
    }

    pub fn is_adjacent_to(self, other: Tier) -> bool {
        self.index().abs_diff(other.index()) == 1
    }
}

/// Every kind of resource the composer can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    Subnet,
    SecurityGroup,
    Secret,
    DatabaseCluster,
    ContainerRegistry,
    ComputeCluster,
    LogGroup,
    Role,
    TaskDefinition,
    Service,
    ScalableTarget,
    ScalingPolicy,
    LoadBalancer,
    Listener,
    TargetGroup,
    Bucket,
    BucketPolicy,
    Distribution,
    Canary,
}

impl ResourceKind {
    /// The declarative type string in the provider's target schema.
    pub fn provider_type(self) -> &'static str {
        match self {
            ResourceKind::Network => "AWS::EC2::VPC",
            ResourceKind::Subnet => "AWS::EC2::Subnet",
            ResourceKind::SecurityGroup => "AWS::EC2::SecurityGroup",
            ResourceKind::Secret => "AWS::SecretsManager::Secret",
            ResourceKind::DatabaseCluster => "AWS::RDS::DBCluster",
            ResourceKind::ContainerRegistry => "AWS::ECR::Repository",
            ResourceKind::ComputeCluster => "AWS::ECS::Cluster",
            ResourceKind::LogGroup => "AWS::Logs::LogGroup",
            ResourceKind::Role => "AWS::IAM::Role",
            ResourceKind::TaskDefinition => "AWS::ECS::TaskDefinition",
            ResourceKind::Service => "AWS::ECS::Service",
            ResourceKind::ScalableTarget => "AWS::ApplicationAutoScaling::ScalableTarget",
            ResourceKind::ScalingPolicy => "AWS::ApplicationAutoScaling::ScalingPolicy",
            ResourceKind::LoadBalancer => "AWS::ElasticLoadBalancingV2::LoadBalancer",
            ResourceKind::Listener => "AWS::ElasticLoadBalancingV2::Listener",
            ResourceKind::TargetGroup => "AWS::ElasticLoadBalancingV2::TargetGroup",
            ResourceKind::Bucket => "AWS::S3::Bucket",
            ResourceKind::BucketPolicy => "AWS::S3::BucketPolicy",
            ResourceKind::Distribution => "AWS::CloudFront::Distribution",
            ResourceKind::Canary => "AWS::Synthetics::Canary",
        }
    }

    /// Whether stack-level tags are merged into this resource during the
    /// tag-propagation pass.
    pub fn is_taggable(self) -> bool {
        !matches!(
            self,
            ResourceKind::BucketPolicy | ResourceKind::Listener | ResourceKind::ScalingPolicy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_indices_follow_traffic_order() {
        assert!(Tier::Network.index() < Tier::Edge.index());
        assert!(Tier::Edge.index() < Tier::Compute.index());
        assert!(Tier::Compute.index() < Tier::Data.index());
    }

    #[test]
    fn adjacency_is_one_hop_only() {
        assert!(Tier::Network.is_adjacent_to(Tier::Edge));
        assert!(Tier::Edge.is_adjacent_to(Tier::Compute));
        assert!(Tier::Compute.is_adjacent_to(Tier::Data));
        assert!(!Tier::Edge.is_adjacent_to(Tier::Data));
        assert!(!Tier::Network.is_adjacent_to(Tier::Data));
        assert!(!Tier::Compute.is_adjacent_to(Tier::Compute));
    }

    #[test]
    fn every_kind_has_a_provider_type() {
        assert_eq!(ResourceKind::Network.provider_type(), "AWS::EC2::VPC");
        assert_eq!(
            ResourceKind::Distribution.provider_type(),
            "AWS::CloudFront::Distribution"
        );
        assert_eq!(
            ResourceKind::TaskDefinition.provider_type(),
            "AWS::ECS::TaskDefinition"
        );
    }
}
