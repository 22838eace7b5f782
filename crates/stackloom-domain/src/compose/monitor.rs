//! Monitoring: the synthetic health canary probing the public entry point.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::naming;
use crate::stack::StackPlan;
use serde_json::json;
use stackloom_types::ResourceKind;

pub const CANARY_ID: &str = "HealthCanary";
const SCHEDULE_EXPRESSION: &str = "rate(5 minutes)";

#[derive(Clone, Copy, Debug)]
pub struct MonitorParts {
    pub canary: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<MonitorParts, ComposeError> {
    let canary = graph.add(
        CANARY_ID,
        ResourceKind::Canary,
        None,
        json!({
            "Name": format!("{}-canary", plan.app_name),
            "RuntimeVersion": "syn-nodejs-puppeteer-11.0",
            "Schedule": { "Expression": SCHEDULE_EXPRESSION },
            "StartCanaryAfterCreation": true,
            "RunConfig": {
                "ActiveTracing": true,
                "EnvironmentVariables": {
                    "SITE_URL": format!("https://{}", naming::edge_domain(plan)),
                },
            },
        }),
    )?;

    Ok(MonitorParts { canary })
}
