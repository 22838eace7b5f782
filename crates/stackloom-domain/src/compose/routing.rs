//! Load-balancing: internal load balancer, HTTP listener, target group.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::stack::StackPlan;
use serde_json::json;
use stackloom_types::{ResourceKind, Tier};

pub const LOAD_BALANCER_ID: &str = "LoadBalancer";
pub const TARGET_GROUP_ID: &str = "TargetGroup";

pub const HEALTH_CHECK_PATH: &str = "/actuator/health";
pub const HEALTH_CHECK_INTERVAL_S: u32 = 30;
pub const HEALTH_CHECK_TIMEOUT_S: u32 = 5;
pub const HEALTHY_THRESHOLD: u32 = 2;
pub const UNHEALTHY_THRESHOLD: u32 = 5;

#[derive(Clone, Copy, Debug)]
pub struct RoutingParts {
    pub load_balancer: NodeId,
    pub listener: NodeId,
    pub target_group: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<RoutingParts, ComposeError> {
    let load_balancer = graph.add(
        LOAD_BALANCER_ID,
        ResourceKind::LoadBalancer,
        Some(Tier::Edge),
        json!({
            "Name": format!("{}-internal-alb", plan.app_name),
            "Type": "application",
            "Scheme": "internal",
            "SecurityGroups": [ { "Ref": "EdgeSecurityGroup" } ],
            "Subnets": super::network::private_subnet_refs(),
        }),
    )?;

    let listener = graph.add_child(
        load_balancer,
        "HttpListener",
        ResourceKind::Listener,
        Some(Tier::Edge),
        json!({
            "LoadBalancerArn": { "Ref": LOAD_BALANCER_ID },
            "Port": super::security::EDGE_PORT,
            "Protocol": "HTTP",
            "DefaultActions": [{
                "Type": "forward",
                "TargetGroupArn": { "Ref": TARGET_GROUP_ID },
            }],
        }),
    )?;

    let target_group = graph.add(
        TARGET_GROUP_ID,
        ResourceKind::TargetGroup,
        Some(Tier::Edge),
        json!({
            "TargetType": "ip",
            "Port": plan.backend.container_port,
            "Protocol": "HTTP",
            "VpcId": { "Ref": "Network" },
            "HealthCheckPath": HEALTH_CHECK_PATH,
            "HealthCheckIntervalSeconds": HEALTH_CHECK_INTERVAL_S,
            "HealthCheckTimeoutSeconds": HEALTH_CHECK_TIMEOUT_S,
            "HealthyThresholdCount": HEALTHY_THRESHOLD,
            "UnhealthyThresholdCount": UNHEALTHY_THRESHOLD,
        }),
    )?;

    Ok(RoutingParts {
        load_balancer,
        listener,
        target_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_plan;

    #[test]
    fn target_group_carries_health_check_contract() {
        let plan = sample_plan("dev");
        let mut graph = ResourceGraph::new(&plan.stack_name());
        let parts = build(&mut graph, &plan).expect("build routing tier");

        let tg = graph.node(parts.target_group);
        assert_eq!(tg.properties["Port"], 8080);
        assert_eq!(tg.properties["HealthCheckPath"], "/actuator/health");
        assert_eq!(tg.properties["HealthCheckIntervalSeconds"], 30);
        assert_eq!(tg.properties["HealthCheckTimeoutSeconds"], 5);
        assert_eq!(tg.properties["HealthyThresholdCount"], 2);
        assert_eq!(tg.properties["UnhealthyThresholdCount"], 5);
    }

    #[test]
    fn listener_nests_under_the_load_balancer() {
        let plan = sample_plan("dev");
        let mut graph = ResourceGraph::new(&plan.stack_name());
        let parts = build(&mut graph, &plan).expect("build routing tier");

        let listener = graph.node(parts.listener);
        assert_eq!(listener.parent(), Some(parts.load_balancer));
        assert_eq!(listener.properties["Port"], 80);
        assert_eq!(
            listener.path.as_str(),
            "webapp-stack/LoadBalancer/HttpListener"
        );
    }

    #[test]
    fn load_balancer_is_internal() {
        let plan = sample_plan("dev");
        let mut graph = ResourceGraph::new(&plan.stack_name());
        let parts = build(&mut graph, &plan).expect("build routing tier");
        assert_eq!(graph.node(parts.load_balancer).properties["Scheme"], "internal");
    }
}
