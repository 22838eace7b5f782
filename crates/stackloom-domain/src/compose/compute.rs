//! Compute tier: registry reference, cluster, roles, log groups, the task
//! definition with its container topology, the service, and its scaling mode.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::naming;
use crate::stack::{ServiceScaling, StackPlan};
use serde_json::{Value as JsonValue, json};
use stackloom_types::{ResourceKind, Tier};
use std::collections::BTreeMap;

pub const TASK_DEFINITION_ID: &str = "TaskDefinition";
pub const SERVICE_ID: &str = "BackendService";
pub const SERVICE_LOG_GROUP_ID: &str = "ServiceLogGroup";
pub const AGENT_LOG_GROUP_ID: &str = "TelemetryAgentLogGroup";

const INSTRUMENTATION_VOLUME: &str = "instrumentation";
const TELEMETRY_AGENT_IMAGE: &str =
    "public.ecr.aws/cloudwatch-agent/cloudwatch-agent:latest-amd64";
const INIT_IMAGE: &str =
    "public.ecr.aws/aws-observability/adot-autoinstrumentation-java:v1.32.6";

/// Gate another container must pass before a dependent one may start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyCondition {
    Start,
    Complete,
    Success,
    Healthy,
}

impl DependencyCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyCondition::Start => "START",
            DependencyCondition::Complete => "COMPLETE",
            DependencyCondition::Success => "SUCCESS",
            DependencyCondition::Healthy => "HEALTHY",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerDependency {
    pub container: String,
    pub condition: DependencyCondition,
}

/// Reference into the secret store, resolved at launch time. Plain env vars
/// resolve at definition time; the two channels never share a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretRef {
    /// Logical id of the secret resource.
    pub secret: String,
    /// Key within the secret's JSON payload.
    pub json_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountPoint {
    pub source_volume: String,
    pub container_path: String,
    pub read_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub essential: bool,
    pub container_port: Option<u16>,
    pub environment: BTreeMap<String, String>,
    pub secrets: BTreeMap<String, SecretRef>,
    pub depends_on: Vec<ContainerDependency>,
    pub command: Vec<String>,
    /// Logical id of the log group this container streams to.
    pub log_group: Option<String>,
    pub mount_points: Vec<MountPoint>,
}

impl ContainerSpec {
    fn plain(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            essential: false,
            container_port: None,
            environment: BTreeMap::new(),
            secrets: BTreeMap::new(),
            depends_on: Vec::new(),
            command: Vec::new(),
            log_group: None,
            mount_points: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskSpec {
    pub family: String,
    pub cpu_units: u32,
    pub memory_mib: u32,
    pub volumes: Vec<String>,
    pub containers: Vec<ContainerSpec>,
}

impl TaskSpec {
    /// Enforce the task invariants: exactly one essential container, env and
    /// secret channels disjoint, dependency targets declared.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let essential = self.containers.iter().filter(|c| c.essential).count();
        if essential != 1 {
            return Err(ComposeError::EssentialContainerCount {
                task: self.family.clone(),
                found: essential,
            });
        }

        for container in &self.containers {
            for key in container.environment.keys() {
                if container.secrets.contains_key(key) {
                    return Err(ComposeError::EnvSecretOverlap {
                        container: container.name.clone(),
                        key: key.clone(),
                    });
                }
            }
            for dep in &container.depends_on {
                if !self.containers.iter().any(|c| c.name == dep.container) {
                    return Err(ComposeError::UnknownContainerDependency {
                        container: container.name.clone(),
                        dependency: dep.container.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The single essential container; `validate` guarantees it exists.
    pub fn default_container(&self) -> Option<&ContainerSpec> {
        self.containers.iter().find(|c| c.essential)
    }
}

/// One application container, a telemetry sidecar, and an init container
/// that stages the instrumentation agent before the application starts.
pub fn task_spec(plan: &StackPlan) -> TaskSpec {
    let app_container_name = format!("{}-container", plan.app_name);
    let init_name = "init-instrumentation";

    let mut app = ContainerSpec::plain(&app_container_name, &naming::application_image(plan));
    app.essential = true;
    app.container_port = Some(plan.backend.container_port);
    app.log_group = Some(SERVICE_LOG_GROUP_ID.to_string());
    app.environment.insert(
        "DATABASE_URL".to_string(),
        naming::database_url(plan),
    );
    app.environment.insert(
        "CORS_ALLOWED_ORIGINS".to_string(),
        format!("https://{}", naming::edge_domain(plan)),
    );
    app.environment
        .insert("OTEL_SERVICE_NAME".to_string(), plan.app_name.clone());
    app.environment.insert(
        "OTEL_EXPORTER_OTLP_ENDPOINT".to_string(),
        "http://localhost:4316".to_string(),
    );
    app.secrets.insert(
        "DB_USERNAME".to_string(),
        SecretRef {
            secret: super::data::CREDENTIALS_ID.to_string(),
            json_key: "username".to_string(),
        },
    );
    app.secrets.insert(
        "DB_PASSWORD".to_string(),
        SecretRef {
            secret: super::data::CREDENTIALS_ID.to_string(),
            json_key: "password".to_string(),
        },
    );
    app.depends_on.push(ContainerDependency {
        container: init_name.to_string(),
        condition: DependencyCondition::Start,
    });
    app.mount_points.push(MountPoint {
        source_volume: INSTRUMENTATION_VOLUME.to_string(),
        container_path: "/instrumentation".to_string(),
        read_only: false,
    });

    let mut agent = ContainerSpec::plain("telemetry-agent", TELEMETRY_AGENT_IMAGE);
    agent.log_group = Some(AGENT_LOG_GROUP_ID.to_string());
    agent.environment.insert(
        "CW_CONFIG_CONTENT".to_string(),
        json!({
            "traces": { "traces_collected": { "application_signals": { "enabled": true } } },
            "logs": { "metrics_collected": { "application_signals": { "enabled": true } } },
        })
        .to_string(),
    );

    let mut init = ContainerSpec::plain(init_name, INIT_IMAGE);
    init.command = vec![
        "cp".to_string(),
        "/javaagent.jar".to_string(),
        "/instrumentation/javaagent.jar".to_string(),
    ];
    init.mount_points.push(MountPoint {
        source_volume: INSTRUMENTATION_VOLUME.to_string(),
        container_path: "/instrumentation".to_string(),
        read_only: false,
    });

    TaskSpec {
        family: format!("{}-task", plan.app_name),
        cpu_units: plan.backend.cpu_units,
        memory_mib: plan.backend.memory_mib,
        volumes: vec![INSTRUMENTATION_VOLUME.to_string()],
        containers: vec![app, agent, init],
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ComputeParts {
    pub registry: NodeId,
    pub cluster: NodeId,
    pub task_definition: NodeId,
    pub service: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<ComputeParts, ComposeError> {
    let registry = graph.add(
        "ContainerRegistry",
        ResourceKind::ContainerRegistry,
        Some(Tier::Compute),
        json!({ "RepositoryName": naming::registry_name(plan) }),
    )?;

    let cluster = graph.add(
        "ComputeCluster",
        ResourceKind::ComputeCluster,
        Some(Tier::Compute),
        json!({ "ClusterName": format!("{}-cluster", plan.app_name) }),
    )?;

    graph.add(
        SERVICE_LOG_GROUP_ID,
        ResourceKind::LogGroup,
        Some(Tier::Compute),
        json!({
            "LogGroupName": format!("/ecs/{}-service", plan.app_name),
            "RetentionInDays": 30,
        }),
    )?;
    graph.add(
        AGENT_LOG_GROUP_ID,
        ResourceKind::LogGroup,
        Some(Tier::Compute),
        json!({ "RetentionInDays": 7 }),
    )?;

    build_roles(graph)?;

    let spec = task_spec(plan);
    spec.validate()?;
    let task_definition = graph.add(
        TASK_DEFINITION_ID,
        ResourceKind::TaskDefinition,
        Some(Tier::Compute),
        task_definition_properties(plan, &spec),
    )?;

    let service = graph.add(
        SERVICE_ID,
        ResourceKind::Service,
        Some(Tier::Compute),
        service_properties(plan, &spec),
    )?;

    if let ServiceScaling::AutoScaled {
        min,
        max,
        target_cpu_pct,
        scale_in_cooldown_s,
        scale_out_cooldown_s,
    } = plan.backend.scaling
    {
        graph.add(
            "ServiceScalableTarget",
            ResourceKind::ScalableTarget,
            Some(Tier::Compute),
            json!({
                "MinCapacity": min,
                "MaxCapacity": max,
                "ResourceId": {
                    "Fn::Sub": format!(
                        "service/${{ComputeCluster}}/{}",
                        plan.backend.service_name
                    )
                },
                "ScalableDimension": "ecs:service:DesiredCount",
                "ServiceNamespace": "ecs",
            }),
        )?;
        graph.add(
            "ServiceScalingPolicy",
            ResourceKind::ScalingPolicy,
            Some(Tier::Compute),
            json!({
                "PolicyType": "TargetTrackingScaling",
                "ScalingTargetId": { "Ref": "ServiceScalableTarget" },
                "TargetTrackingScalingPolicyConfiguration": {
                    "TargetValue": target_cpu_pct,
                    "PredefinedMetricSpecification": {
                        "PredefinedMetricType": "ECSServiceAverageCPUUtilization"
                    },
                    "ScaleInCooldown": scale_in_cooldown_s,
                    "ScaleOutCooldown": scale_out_cooldown_s,
                },
            }),
        )?;
    }

    Ok(ComputeParts {
        registry,
        cluster,
        task_definition,
        service,
    })
}

fn build_roles(graph: &mut ResourceGraph) -> Result<(), ComposeError> {
    let assume_tasks = json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "ecs-tasks.amazonaws.com" },
            "Action": "sts:AssumeRole",
        }],
    });

    graph.add(
        "TaskExecutionRole",
        ResourceKind::Role,
        Some(Tier::Compute),
        json!({
            "AssumeRolePolicyDocument": assume_tasks,
            "ManagedPolicyArns": [
                "arn:aws:iam::aws:policy/service-role/AmazonECSTaskExecutionRolePolicy",
                "arn:aws:iam::aws:policy/CloudWatchAgentServerPolicy",
            ],
        }),
    )?;

    graph.add(
        "TaskRole",
        ResourceKind::Role,
        Some(Tier::Compute),
        json!({
            "AssumeRolePolicyDocument": assume_tasks,
            "ManagedPolicyArns": [
                "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess",
            ],
            "Policies": [{
                "PolicyName": "TelemetryWriteAccess",
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Action": [
                            "logs:PutLogEvents",
                            "logs:CreateLogGroup",
                            "logs:CreateLogStream",
                            "logs:DescribeLogStreams",
                            "logs:DescribeLogGroups",
                            "xray:PutTraceSegments",
                            "xray:PutTelemetryRecords",
                            "cloudwatch:PutMetricData",
                            "ssm:GetParameters",
                        ],
                        "Resource": "*",
                    }],
                },
            }],
        }),
    )?;

    Ok(())
}

fn task_definition_properties(plan: &StackPlan, spec: &TaskSpec) -> JsonValue {
    json!({
        "Family": spec.family,
        "Cpu": spec.cpu_units.to_string(),
        "Memory": spec.memory_mib.to_string(),
        "NetworkMode": "awsvpc",
        "RequiresCompatibilities": ["FARGATE"],
        "ExecutionRoleArn": { "Fn::GetAtt": ["TaskExecutionRole", "Arn"] },
        "TaskRoleArn": { "Fn::GetAtt": ["TaskRole", "Arn"] },
        "Volumes": spec.volumes.iter().map(|v| json!({ "Name": v })).collect::<Vec<_>>(),
        "ContainerDefinitions": spec
            .containers
            .iter()
            .map(|c| container_definition(plan, c))
            .collect::<Vec<_>>(),
    })
}

fn container_definition(plan: &StackPlan, container: &ContainerSpec) -> JsonValue {
    let mut def = serde_json::Map::new();
    def.insert("Name".to_string(), json!(container.name));
    def.insert("Image".to_string(), json!(container.image));
    def.insert("Essential".to_string(), json!(container.essential));

    if let Some(port) = container.container_port {
        def.insert(
            "PortMappings".to_string(),
            json!([{ "ContainerPort": port, "Protocol": "tcp" }]),
        );
    }
    if !container.environment.is_empty() {
        let env: Vec<JsonValue> = container
            .environment
            .iter()
            .map(|(name, value)| json!({ "Name": name, "Value": value }))
            .collect();
        def.insert("Environment".to_string(), JsonValue::Array(env));
    }
    if !container.secrets.is_empty() {
        let secrets: Vec<JsonValue> = container
            .secrets
            .iter()
            .map(|(name, secret_ref)| {
                json!({
                    "Name": name,
                    "ValueFrom": {
                        "Fn::Sub": format!(
                            "${{{}}}:{}::",
                            secret_ref.secret, secret_ref.json_key
                        )
                    },
                })
            })
            .collect();
        def.insert("Secrets".to_string(), JsonValue::Array(secrets));
    }
    if !container.depends_on.is_empty() {
        let deps: Vec<JsonValue> = container
            .depends_on
            .iter()
            .map(|dep| {
                json!({
                    "ContainerName": dep.container,
                    "Condition": dep.condition.as_str(),
                })
            })
            .collect();
        def.insert("DependsOn".to_string(), JsonValue::Array(deps));
    }
    if !container.command.is_empty() {
        def.insert("Command".to_string(), json!(container.command));
    }
    if let Some(log_group) = &container.log_group {
        def.insert(
            "LogConfiguration".to_string(),
            json!({
                "LogDriver": "awslogs",
                "Options": {
                    "awslogs-group": { "Ref": log_group },
                    "awslogs-stream-prefix": plan.app_name,
                },
            }),
        );
    }
    if !container.mount_points.is_empty() {
        let mounts: Vec<JsonValue> = container
            .mount_points
            .iter()
            .map(|m| {
                json!({
                    "SourceVolume": m.source_volume,
                    "ContainerPath": m.container_path,
                    "ReadOnly": m.read_only,
                })
            })
            .collect();
        def.insert("MountPoints".to_string(), JsonValue::Array(mounts));
    }

    JsonValue::Object(def)
}

fn service_properties(plan: &StackPlan, spec: &TaskSpec) -> JsonValue {
    let default_container = spec
        .default_container()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    json!({
        "Cluster": { "Ref": "ComputeCluster" },
        "ServiceName": plan.backend.service_name,
        "TaskDefinition": { "Ref": TASK_DEFINITION_ID },
        "LaunchType": "FARGATE",
        "DesiredCount": plan.backend.scaling.initial_count(),
        "DeploymentConfiguration": {
            "MinimumHealthyPercent": 100,
            "MaximumPercent": 200,
        },
        "HealthCheckGracePeriodSeconds": 180,
        "NetworkConfiguration": {
            "AwsvpcConfiguration": {
                "AssignPublicIp": "DISABLED",
                "SecurityGroups": [ { "Ref": "ServiceSecurityGroup" } ],
                "Subnets": super::network::private_subnet_refs(),
            },
        },
        "LoadBalancers": [{
            "ContainerName": default_container,
            "ContainerPort": plan.backend.container_port,
            "TargetGroupArn": { "Ref": super::routing::TARGET_GROUP_ID },
        }],
    })
}
