use stackloom_domain::stack::{BackendPlan, DatabasePlan, ServiceScaling, StackPlan};
use std::collections::BTreeMap;

pub const DEFAULT_APP_NAME: &str = "webapp";
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// The closed set of accepted environment keys.
pub fn known_environments() -> &'static [&'static str] {
    &["dev", "prd"]
}

/// Environment presets are opinionated defaults.
///
/// Keep these small and readable. Anything project-specific belongs in the
/// override file. Returns `None` for keys outside the closed set.
pub fn preset(env_key: &str) -> Option<StackPlan> {
    match env_key {
        "dev" => Some(dev_preset()),
        "prd" => Some(prd_preset()),
        _ => None,
    }
}

fn dev_preset() -> StackPlan {
    StackPlan {
        app_name: DEFAULT_APP_NAME.to_string(),
        environment: "dev".to_string(),
        region: DEFAULT_REGION.to_string(),
        tags: base_tags("Development"),
        database: DatabasePlan {
            name: "appdb".to_string(),
            port: 3306,
            min_capacity: 0.0,
            max_capacity: 1.0,
        },
        backend: BackendPlan {
            service_name: format!("{DEFAULT_APP_NAME}-backend"),
            container_port: 8080,
            cpu_units: 256,
            memory_mib: 512,
            scaling: ServiceScaling::Fixed(1),
        },
    }
}

fn prd_preset() -> StackPlan {
    StackPlan {
        app_name: DEFAULT_APP_NAME.to_string(),
        environment: "prd".to_string(),
        region: DEFAULT_REGION.to_string(),
        tags: base_tags("Production"),
        database: DatabasePlan {
            name: "appdb".to_string(),
            port: 3306,
            min_capacity: 0.5,
            max_capacity: 2.0,
        },
        backend: BackendPlan {
            service_name: format!("{DEFAULT_APP_NAME}-backend"),
            container_port: 8080,
            cpu_units: 512,
            memory_mib: 1024,
            scaling: ServiceScaling::AutoScaled {
                min: 1,
                max: 10,
                target_cpu_pct: 50,
                scale_in_cooldown_s: 120,
                scale_out_cooldown_s: 60,
            },
        },
    }
}

fn base_tags(environment: &str) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    tags.insert("Environment".to_string(), environment.to_string());
    tags.insert("Project".to_string(), "WebApp".to_string());
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_environment_has_a_preset() {
        for env in known_environments() {
            let plan = preset(env).expect("preset for known environment");
            assert_eq!(plan.environment, *env);
        }
    }

    #[test]
    fn unknown_keys_have_no_preset() {
        assert!(preset("stg").is_none());
        assert!(preset("production").is_none());
        assert!(preset("").is_none());
    }

    #[test]
    fn presets_disagree_on_scaling_mode() {
        let dev = preset("dev").expect("dev preset");
        let prd = preset("prd").expect("prd preset");
        assert!(!dev.backend.scaling.is_autoscaled());
        assert!(prd.backend.scaling.is_autoscaled());
    }
}
