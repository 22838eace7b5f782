//! The `synth` use case: resolve a plan, compose the topology, annotate it,
//! and emit the template.

use anyhow::Context;
use stackloom_domain::suppress::SuppressionVisitor;
use stackloom_settings::Overrides;
use stackloom_types::{SCHEMA_MANIFEST_V1, SynthManifest, Template, ToolMeta};
use time::OffsetDateTime;
use tracing::debug;

/// Input for the synth use case.
#[derive(Clone, Debug)]
pub struct SynthInput<'a> {
    /// Environment key (closed set; anything unknown fails before
    /// composition).
    pub env_key: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the synth use case.
#[derive(Clone, Debug)]
pub struct SynthOutput {
    /// The emitted template.
    pub template: Template,
    /// The named values the deployment collaborator consumes.
    pub outputs: stackloom_domain::graph::OutputSet,
    /// Envelope describing the synthesis run.
    pub manifest: SynthManifest,
    /// Markdown synthesis summary.
    pub summary: String,
}

/// Run the synth use case: parse config, resolve the plan, compose, apply
/// suppressions, render. All-or-nothing: any failure returns `Err` and no
/// partial artifacts.
pub fn run_synth(input: SynthInput<'_>) -> anyhow::Result<SynthOutput> {
    let synthesized_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, the preset applies).
    let cfg = if input.config_text.trim().is_empty() {
        stackloom_settings::StackConfigV1::default()
    } else {
        stackloom_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let plan = stackloom_settings::resolve_plan(input.env_key, cfg, input.overrides.clone())
        .context("resolve plan")?;
    debug!(app = %plan.app_name, env = %plan.environment, "plan resolved");

    let mut synthesis = stackloom_domain::compose(&plan).context("compose topology")?;
    SuppressionVisitor::builtin().visit(&mut synthesis.graph);

    let template = stackloom_render::to_template(&synthesis);
    let summary = stackloom_render::render_summary(&synthesis);

    let manifest = SynthManifest {
        schema: SCHEMA_MANIFEST_V1.to_string(),
        tool: ToolMeta {
            name: "stackloom".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        app_name: plan.app_name.clone(),
        environment: plan.environment.clone(),
        region: plan.region.clone(),
        synthesized_at,
        resource_count: synthesis.graph.len() as u32,
        suppression_count: synthesis.graph.suppression_count() as u32,
    };

    Ok(SynthOutput {
        template,
        outputs: synthesis.outputs,
        manifest,
        summary,
    })
}

/// Serialize a template as pretty JSON with a trailing newline.
pub fn serialize_template(template: &Template) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(template).context("serialize template")?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_synthesizes_the_preset() {
        let input = SynthInput {
            env_key: "dev",
            config_text: "",
            overrides: Overrides::default(),
        };
        let output = run_synth(input).expect("run_synth");

        assert_eq!(output.manifest.app_name, "webapp");
        assert_eq!(output.manifest.environment, "dev");
        assert_eq!(
            output.manifest.resource_count as usize,
            output.template.resources.len()
        );
        assert!(output.manifest.suppression_count > 0);
        assert_eq!(output.template.outputs.len(), 4);
    }

    #[test]
    fn unknown_environment_yields_no_output_at_all() {
        let input = SynthInput {
            env_key: "staging",
            config_text: "",
            overrides: Overrides::default(),
        };
        let err = run_synth(input).expect_err("unknown env must fail");
        assert!(err.to_string().contains("resolve plan"));
    }

    #[test]
    fn config_overrides_flow_through_to_the_template() {
        let input = SynthInput {
            env_key: "dev",
            config_text: "app_name = \"orders\"\n",
            overrides: Overrides::default(),
        };
        let output = run_synth(input).expect("run_synth");
        assert_eq!(output.outputs.web_bucket, "orders-web-dev");
        let task = output
            .template
            .resources
            .get("TaskDefinition")
            .expect("task definition");
        assert_eq!(task.properties["Family"], "orders-task");
    }

    #[test]
    fn serialized_template_parses_back() {
        let input = SynthInput {
            env_key: "prd",
            config_text: "",
            overrides: Overrides::default(),
        };
        let output = run_synth(input).expect("run_synth");
        let text = serialize_template(&output.template).expect("serialize");
        let parsed: Template = serde_json::from_str(&text).expect("parse back");
        assert_eq!(parsed, output.template);
    }
}
