//! Deterministic synthesized endpoints.
//!
//! Synthesis is pure, so values that a live deployment would resolve lazily
//! (cluster endpoint, distribution domain) are derived up front from the
//! app name, environment, and region. Anything wired early — the CORS origin
//! env var, the canary site URL — reads the same value the output set does.

use crate::stack::StackPlan;

pub fn database_endpoint(plan: &StackPlan) -> String {
    format!(
        "{}-database.cluster.{}.rds.internal",
        plan.app_name, plan.region
    )
}

pub fn load_balancer_dns(plan: &StackPlan) -> String {
    format!("internal-{}-alb.{}.elb.internal", plan.app_name, plan.region)
}

pub fn edge_domain(plan: &StackPlan) -> String {
    format!("{}-{}.dist.edge.internal", plan.app_name, plan.environment)
}

pub fn web_bucket_name(plan: &StackPlan) -> String {
    format!("{}-web-{}", plan.app_name, plan.environment)
}

pub fn registry_name(plan: &StackPlan) -> String {
    format!("{}-repository", plan.app_name)
}

/// Image reference the essential container runs, pinned to the registry the
/// composer declares.
pub fn application_image(plan: &StackPlan) -> String {
    format!(
        "registry.{}.internal/{}:latest",
        plan.region,
        registry_name(plan)
    )
}

pub fn database_url(plan: &StackPlan) -> String {
    format!(
        "mysql://{}:{}/{}",
        database_endpoint(plan),
        plan.database.port,
        plan.database.name
    )
}
