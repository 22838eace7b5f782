use crate::{model::StackConfigV1, presets};
use stackloom_domain::stack::{ServiceScaling, StackPlan};

/// CLI-level overrides, applied after the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub app_name: Option<String>,
    pub region: Option<String>,
}

/// Configuration failures. All of these fire before any resource is
/// declared; resolution is the all-or-nothing gate in front of the composer.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported environment key: '{0}' (expected one of: dev, prd)")]
    UnknownEnvironment(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("backend configures both desired_count and scaling bounds; pick one mode")]
    AmbiguousScaling,

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn resolve_plan(
    env_key: &str,
    cfg: StackConfigV1,
    overrides: Overrides,
) -> Result<StackPlan, ConfigError> {
    let mut plan = presets::preset(env_key)
        .ok_or_else(|| ConfigError::UnknownEnvironment(env_key.to_string()))?;

    if let Some(app_name) = overrides.app_name.or(cfg.app_name) {
        plan.app_name = app_name;
    }
    if let Some(region) = overrides.region.or(cfg.region) {
        plan.region = region;
    }
    plan.tags.extend(cfg.tags);

    if let Some(name) = cfg.database.name {
        plan.database.name = name;
    }
    if let Some(port) = cfg.database.port {
        plan.database.port = port;
    }
    if let Some(min) = cfg.database.min_capacity {
        plan.database.min_capacity = min;
    }
    if let Some(max) = cfg.database.max_capacity {
        plan.database.max_capacity = max;
    }

    // The service name default follows the app name unless pinned explicitly.
    match cfg.backend.service_name {
        Some(service_name) => plan.backend.service_name = service_name,
        None => plan.backend.service_name = format!("{}-backend", plan.app_name),
    }
    if let Some(port) = cfg.backend.container_port {
        plan.backend.container_port = port;
    }
    if let Some(cpu) = cfg.backend.cpu_units {
        plan.backend.cpu_units = cpu;
    }
    if let Some(memory) = cfg.backend.memory_mib {
        plan.backend.memory_mib = memory;
    }

    // Exactly one scaling mode, never both. The preset's mode only survives
    // when the config file says nothing.
    match (cfg.backend.desired_count, cfg.backend.scaling) {
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousScaling),
        (Some(count), None) => plan.backend.scaling = ServiceScaling::Fixed(count),
        (None, Some(scaling)) => {
            plan.backend.scaling = ServiceScaling::AutoScaled {
                min: scaling.min_capacity,
                max: scaling.max_capacity,
                target_cpu_pct: scaling.target_cpu_pct.unwrap_or(50),
                scale_in_cooldown_s: scaling.scale_in_cooldown_s.unwrap_or(120),
                scale_out_cooldown_s: scaling.scale_out_cooldown_s.unwrap_or(60),
            };
        }
        (None, None) => {}
    }

    validate(&plan)?;
    Ok(plan)
}

fn validate(plan: &StackPlan) -> Result<(), ConfigError> {
    if plan.app_name.trim().is_empty() {
        return Err(ConfigError::MissingField("app_name"));
    }
    if plan.database.name.trim().is_empty() {
        return Err(ConfigError::MissingField("database.name"));
    }
    if plan.backend.service_name.trim().is_empty() {
        return Err(ConfigError::MissingField("backend.service_name"));
    }
    if plan.database.port == 0 {
        return Err(ConfigError::InvalidValue {
            field: "database.port",
            message: "port must be nonzero".to_string(),
        });
    }
    if plan.backend.container_port == 0 {
        return Err(ConfigError::InvalidValue {
            field: "backend.container_port",
            message: "port must be nonzero".to_string(),
        });
    }
    if plan.backend.cpu_units == 0 || plan.backend.memory_mib == 0 {
        return Err(ConfigError::InvalidValue {
            field: "backend.cpu_units",
            message: "task sizing must be nonzero".to_string(),
        });
    }
    if plan.database.min_capacity > plan.database.max_capacity {
        return Err(ConfigError::InvalidValue {
            field: "database.min_capacity",
            message: format!(
                "min capacity {} exceeds max capacity {}",
                plan.database.min_capacity, plan.database.max_capacity
            ),
        });
    }
    match plan.backend.scaling {
        ServiceScaling::Fixed(count) if count == 0 => Err(ConfigError::InvalidValue {
            field: "backend.desired_count",
            message: "desired count must be at least 1".to_string(),
        }),
        ServiceScaling::AutoScaled { min, max, .. } if min == 0 || min > max => {
            Err(ConfigError::InvalidValue {
                field: "backend.scaling",
                message: format!("bounds {min}..{max} are not a valid range"),
            })
        }
        ServiceScaling::AutoScaled { target_cpu_pct, .. }
            if !(1..=100).contains(&target_cpu_pct) =>
        {
            Err(ConfigError::InvalidValue {
                field: "backend.scaling.target_cpu_pct",
                message: format!("{target_cpu_pct} is not a percentage"),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;

    #[test]
    fn unknown_environment_is_fatal() {
        let err = resolve_plan("stg", StackConfigV1::default(), Overrides::default())
            .expect_err("unknown env must fail");
        assert!(matches!(err, ConfigError::UnknownEnvironment(key) if key == "stg"));
    }

    #[test]
    fn empty_config_resolves_to_the_preset() {
        let plan = resolve_plan("dev", StackConfigV1::default(), Overrides::default())
            .expect("resolve dev");
        assert_eq!(plan.app_name, "webapp");
        assert_eq!(plan.backend.container_port, 8080);
        assert_eq!(plan.backend.scaling, ServiceScaling::Fixed(1));
    }

    #[test]
    fn app_name_override_rederives_the_service_name() {
        let overrides = Overrides {
            app_name: Some("orders".to_string()),
            region: None,
        };
        let plan = resolve_plan("dev", StackConfigV1::default(), overrides)
            .expect("resolve dev");
        assert_eq!(plan.app_name, "orders");
        assert_eq!(plan.backend.service_name, "orders-backend");
    }

    #[test]
    fn config_file_overrides_recognized_fields_only() {
        let cfg = parse_config_toml(
            r#"
app_name = "orders"

[tags]
Team = "platform"

[database]
name = "orders_db"
port = 3307

[backend]
container_port = 9090
desired_count = 2
"#,
        )
        .expect("parse config");

        let plan = resolve_plan("dev", cfg, Overrides::default()).expect("resolve dev");
        assert_eq!(plan.database.name, "orders_db");
        assert_eq!(plan.database.port, 3307);
        assert_eq!(plan.backend.container_port, 9090);
        assert_eq!(plan.backend.scaling, ServiceScaling::Fixed(2));
        assert_eq!(plan.tags.get("Team").map(String::as_str), Some("platform"));
        // Preset tags survive the merge.
        assert_eq!(
            plan.tags.get("Project").map(String::as_str),
            Some("WebApp")
        );
    }

    #[test]
    fn both_scaling_modes_at_once_are_rejected() {
        let cfg = parse_config_toml(
            r#"
[backend]
desired_count = 2

[backend.scaling]
min_capacity = 1
max_capacity = 5
"#,
        )
        .expect("parse config");

        let err = resolve_plan("dev", cfg, Overrides::default())
            .expect_err("ambiguous scaling must fail");
        assert!(matches!(err, ConfigError::AmbiguousScaling));
    }

    #[test]
    fn scaling_bounds_replace_a_fixed_preset() {
        let cfg = parse_config_toml(
            r#"
[backend.scaling]
min_capacity = 2
max_capacity = 6
target_cpu_pct = 60
"#,
        )
        .expect("parse config");

        let plan = resolve_plan("dev", cfg, Overrides::default()).expect("resolve dev");
        assert_eq!(
            plan.backend.scaling,
            ServiceScaling::AutoScaled {
                min: 2,
                max: 6,
                target_cpu_pct: 60,
                scale_in_cooldown_s: 120,
                scale_out_cooldown_s: 60,
            }
        );
    }

    #[test]
    fn inverted_scaling_bounds_are_rejected() {
        let cfg = parse_config_toml(
            r#"
[backend.scaling]
min_capacity = 6
max_capacity = 2
"#,
        )
        .expect("parse config");

        let err = resolve_plan("dev", cfg, Overrides::default())
            .expect_err("inverted bounds must fail");
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "backend.scaling"));
    }

    #[test]
    fn zero_container_port_is_rejected() {
        let cfg = parse_config_toml(
            r#"
[backend]
container_port = 0
"#,
        )
        .expect("parse config");

        let err = resolve_plan("dev", cfg, Overrides::default())
            .expect_err("zero port must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "backend.container_port", .. }
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_config_toml("backend = ").expect_err("parse must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
