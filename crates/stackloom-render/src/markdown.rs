use stackloom_domain::Synthesis;

/// Markdown summary of a synthesis, for CI surfaces.
pub fn render_summary(synthesis: &Synthesis) -> String {
    let mut out = String::new();

    out.push_str("# Synthesis summary\n\n");
    out.push_str(&format!(
        "- Resources: {}\n- Suppressions: {}\n\n",
        synthesis.graph.len(),
        synthesis.graph.suppression_count()
    ));

    out.push_str("## Resources\n\n");
    out.push_str("| Logical ID | Type | Tier |\n|---|---|---|\n");
    for node in synthesis.graph.nodes() {
        let tier = node.tier.map(|t| t.as_str()).unwrap_or("-");
        out.push_str(&format!(
            "| `{}` | `{}` | {} |\n",
            node.logical_id,
            node.kind.provider_type(),
            tier
        ));
    }

    out.push_str("\n## Outputs\n\n");
    for (name, description, value) in synthesis.outputs.entries() {
        out.push_str(&format!("- **{}**: `{}` — {}\n", name, value, description));
    }

    let suppressed: Vec<_> = synthesis
        .graph
        .nodes()
        .filter(|n| !n.suppressions.is_empty())
        .collect();
    if !suppressed.is_empty() {
        out.push_str("\n## Accepted exceptions\n\n");
        for node in suppressed {
            let rules: Vec<&str> = node.suppressions.keys().map(String::as_str).collect();
            out.push_str(&format!("- `{}`: {}\n", node.logical_id, rules.join(", ")));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackloom_domain::compose;
    use stackloom_domain::stack::{BackendPlan, DatabasePlan, ServiceScaling, StackPlan};
    use stackloom_domain::suppress::SuppressionVisitor;
    use std::collections::BTreeMap;

    #[test]
    fn summary_lists_resources_outputs_and_exceptions() {
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

        let md = render_summary(&synthesis);
        assert!(md.contains("# Synthesis summary"));
        assert!(md.contains("| `Network` | `AWS::EC2::VPC` | network |"));
        assert!(md.contains("**DatabaseEndpoint**"));
        assert!(md.contains("## Accepted exceptions"));
        assert!(md.contains("AwsSolutions-S1"));
    }
}
