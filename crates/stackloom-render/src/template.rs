//! Emission of the finished graph into the provider's declarative schema.
//!
//! The graph owns the structure; this pass only flattens it into the target
//! format and carries suppression annotations into resource metadata.

use stackloom_domain::Synthesis;
use stackloom_types::{OutputDecl, ResourceDecl, ResourceMetadata, SuppressionEntry, Template};

pub fn to_template(synthesis: &Synthesis) -> Template {
    let mut template = Template::default();

    for node in synthesis.graph.nodes() {
        let metadata = if node.suppressions.is_empty() {
            None
        } else {
            Some(ResourceMetadata {
                lint_suppressions: node
                    .suppressions
                    .iter()
                    .map(|(id, reason)| SuppressionEntry {
                        id: id.clone(),
                        reason: reason.clone(),
                    })
                    .collect(),
            })
        };

        template.resources.insert(
            node.logical_id.clone(),
            ResourceDecl {
                r#type: node.kind.provider_type().to_string(),
                properties: node.properties.clone(),
                metadata,
            },
        );
    }

    for (name, description, value) in synthesis.outputs.entries() {
        template.outputs.insert(
            name.to_string(),
            OutputDecl {
                description: description.to_string(),
                value: value.to_string(),
            },
        );
    }

    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackloom_domain::stack::{BackendPlan, DatabasePlan, ServiceScaling, StackPlan};
    use stackloom_domain::suppress::SuppressionVisitor;
    use stackloom_domain::compose;
    use std::collections::BTreeMap;

    fn synthesized() -> Synthesis {
        let plan = StackPlan {
            app_name: "webapp".to_string(),
            environment: "dev".to_string(),
            region: "ap-northeast-1".to_string(),
            tags: BTreeMap::new(),
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
        };
        let mut synthesis = compose(&plan).expect("compose plan");
        SuppressionVisitor::builtin().visit(&mut synthesis.graph);
        synthesis
    }

    #[test]
    fn template_covers_every_graph_node() {
        let synthesis = synthesized();
        let template = to_template(&synthesis);
        assert_eq!(template.resources.len(), synthesis.graph.len());
        assert_eq!(template.count_type("AWS::EC2::VPC"), 1);
        assert_eq!(template.count_type("AWS::EC2::SecurityGroup"), 3);
        assert_eq!(template.count_type("AWS::CloudFront::Distribution"), 1);
    }

    #[test]
    fn suppressions_land_in_resource_metadata() {
        let template = to_template(&synthesized());
        let bucket = template.resources.get("WebBucket").expect("bucket resource");
        let metadata = bucket.metadata.as_ref().expect("bucket metadata");
        assert!(
            metadata
                .lint_suppressions
                .iter()
                .any(|s| s.id == "AwsSolutions-S1")
        );

        // Nodes without annotations emit no metadata block at all.
        let role = template
            .resources
            .get("TaskExecutionRole")
            .expect("role resource");
        assert!(role.metadata.is_none());
    }

    #[test]
    fn outputs_carry_descriptions_and_values() {
        let template = to_template(&synthesized());
        assert_eq!(template.outputs.len(), 4);
        let output = template
            .outputs
            .get("DatabaseEndpoint")
            .expect("database endpoint output");
        assert_eq!(output.description, "The endpoint of the database");
        assert_eq!(
            output.value,
            "webapp-database.cluster.ap-northeast-1.rds.internal"
        );
    }
}
