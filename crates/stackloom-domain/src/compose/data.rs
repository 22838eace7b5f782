//! Data tier: generated credentials and the serverless database cluster.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::naming;
use crate::stack::StackPlan;
use serde_json::json;
use stackloom_types::{ResourceKind, Tier};

pub const CREDENTIALS_ID: &str = "DatabaseCredentials";
pub const CLUSTER_ID: &str = "DatabaseCluster";
pub const MASTER_USERNAME: &str = "admin";

#[derive(Clone, Copy, Debug)]
pub struct DataParts {
    pub credentials: NodeId,
    pub cluster: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<DataParts, ComposeError> {
    // The password is generated into the secret store at deploy time and only
    // ever referenced from there.
    let credentials = graph.add(
        CREDENTIALS_ID,
        ResourceKind::Secret,
        Some(Tier::Data),
        json!({
            "Name": format!("{}-db-credentials", plan.app_name),
            "GenerateSecretString": {
                "SecretStringTemplate": format!("{{\"username\":\"{MASTER_USERNAME}\"}}"),
                "GenerateStringKey": "password",
                "ExcludePunctuation": true,
                "IncludeSpace": false,
            },
        }),
    )?;

    let cluster = graph.add(
        CLUSTER_ID,
        ResourceKind::DatabaseCluster,
        Some(Tier::Data),
        json!({
            "Engine": "aurora-mysql",
            "DatabaseName": plan.database.name,
            "Port": plan.database.port,
            "ServerlessV2ScalingConfiguration": {
                "MinCapacity": plan.database.min_capacity,
                "MaxCapacity": plan.database.max_capacity,
            },
            "MasterUsername": MASTER_USERNAME,
            "MasterUserSecret": { "SecretArn": { "Ref": CREDENTIALS_ID } },
            "StorageEncrypted": true,
            "DeletionProtection": false,
            "VpcSecurityGroupIds": [ { "Ref": "DatabaseSecurityGroup" } ],
            "SubnetIds": super::network::isolated_subnet_refs(),
            "Endpoint": { "Address": naming::database_endpoint(plan) },
        }),
    )?;

    Ok(DataParts {
        credentials,
        cluster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_plan;

    #[test]
    fn cluster_carries_plan_values() {
        let plan = sample_plan("dev");
        let mut graph = ResourceGraph::new(&plan.stack_name());
        let parts = build(&mut graph, &plan).expect("build data tier");

        let cluster = graph.node(parts.cluster);
        assert_eq!(cluster.tier, Some(Tier::Data));
        assert_eq!(cluster.properties["DatabaseName"], "appdb");
        assert_eq!(cluster.properties["Port"], 3306);
        assert_eq!(cluster.properties["StorageEncrypted"], true);
        assert_eq!(
            cluster.properties["ServerlessV2ScalingConfiguration"]["MaxCapacity"],
            1.0
        );
    }

    #[test]
    fn credentials_generate_a_password_only() {
        let plan = sample_plan("dev");
        let mut graph = ResourceGraph::new(&plan.stack_name());
        let parts = build(&mut graph, &plan).expect("build data tier");

        let secret = graph.node(parts.credentials);
        let generate = &secret.properties["GenerateSecretString"];
        assert_eq!(generate["GenerateStringKey"], "password");
        assert_eq!(
            generate["SecretStringTemplate"],
            "{\"username\":\"admin\"}"
        );
    }
}
