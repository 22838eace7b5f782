//! Shared fixtures for domain tests.

use crate::stack::{BackendPlan, DatabasePlan, ServiceScaling, StackPlan};
use std::collections::BTreeMap;

/// A plan shaped like the `dev` preset, decoupled from the settings crate so
/// domain tests stand alone.
pub(crate) fn sample_plan(environment: &str) -> StackPlan {
    let mut tags = BTreeMap::new();
    tags.insert("Environment".to_string(), "Development".to_string());
    tags.insert("Project".to_string(), "WebApp".to_string());

    StackPlan {
        app_name: "webapp".to_string(),
        environment: environment.to_string(),
        region: "ap-northeast-1".to_string(),
        tags,
        database: DatabasePlan {
            name: "appdb".to_string(),
            port: 3306,
            min_capacity: 0.0,
            max_capacity: 1.0,
        },
        backend: BackendPlan {
            service_name: "webapp-backend".to_string(),
            container_port: 8080,
            cpu_units: 256,
            memory_mib: 512,
            scaling: ServiceScaling::Fixed(1),
        },
    }
}

/// Same plan, in autoscaled mode.
pub(crate) fn autoscaled_plan(environment: &str) -> StackPlan {
    let mut plan = sample_plan(environment);
    plan.backend.scaling = ServiceScaling::AutoScaled {
        min: 1,
        max: 10,
        target_cpu_pct: 50,
        scale_in_cooldown_s: 120,
        scale_out_cooldown_s: 60,
    };
    plan
}
