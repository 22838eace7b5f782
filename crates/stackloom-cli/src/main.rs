//! CLI entry point for stackloom.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. All business logic lives in the `stackloom-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use stackloom_app::{ExplainOutput, SynthInput, run_explain, run_synth, serialize_template};
use stackloom_settings::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "stackloom",
    version,
    about = "Multi-tier deployment topology synthesizer"
)]
struct Cli {
    /// Tracing filter (e.g. `stackloom=debug`).
    #[arg(long, default_value = "warn")]
    log_filter: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize the deployment template for an environment.
    Synth {
        /// Environment key (dev|prd).
        #[arg(long)]
        env: String,

        /// Override the application name.
        #[arg(long)]
        app_name: Option<String>,

        /// Override the target region.
        #[arg(long)]
        region: Option<String>,

        /// Path to the stackloom config TOML.
        #[arg(long, default_value = "stackloom.toml")]
        config: Utf8PathBuf,

        /// Where to write the template JSON.
        #[arg(long, default_value = "artifacts/template.json")]
        out: Utf8PathBuf,

        /// Where to write the synthesis manifest JSON.
        #[arg(long, default_value = "artifacts/manifest.json")]
        manifest_out: Utf8PathBuf,

        /// Write a Markdown synthesis summary alongside the template.
        #[arg(long)]
        write_summary: bool,

        /// Where to write the Markdown summary (if enabled).
        #[arg(long, default_value = "artifacts/summary.md")]
        summary_out: Utf8PathBuf,
    },

    /// Explain a lint rule id used by the suppression pass.
    Explain {
        /// The rule id (e.g. "AwsSolutions-S1") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Commands::Synth {
            env,
            app_name,
            region,
            config,
            out,
            manifest_out,
            write_summary,
            summary_out,
        } => cmd_synth(
            &env,
            app_name,
            region,
            &config,
            &out,
            &manifest_out,
            write_summary,
            &summary_out,
        ),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_synth(
    env: &str,
    app_name: Option<String>,
    region: Option<String>,
    config: &Utf8PathBuf,
    out: &Utf8PathBuf,
    manifest_out: &Utf8PathBuf,
    write_summary: bool,
    summary_out: &Utf8PathBuf,
) -> anyhow::Result<()> {
    // Missing config file is allowed; the environment preset applies.
    let config_text = std::fs::read_to_string(config).unwrap_or_default();

    let output = run_synth(SynthInput {
        env_key: env,
        config_text: &config_text,
        overrides: Overrides { app_name, region },
    })?;

    // Artifacts are only written once the whole synthesis has succeeded.
    let template_json = serialize_template(&output.template)?;
    write_file(out, &template_json)?;

    let mut manifest_json =
        serde_json::to_string_pretty(&output.manifest).context("serialize manifest")?;
    manifest_json.push('\n');
    write_file(manifest_out, &manifest_json)?;

    if write_summary {
        write_file(summary_out, &output.summary)?;
    }

    println!("Synthesized {} ({} environment)", output.manifest.app_name, env);
    println!("Template: {out}");
    println!("Outputs:");
    for (name, _, value) in output.outputs.entries() {
        println!("  {name} = {value}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", stackloom_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!(
                "{}",
                stackloom_app::format_not_found(&identifier, available_rule_ids)
            );
            std::process::exit(2);
        }
    }
}

fn write_file(path: &Utf8PathBuf, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory {parent}"))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write {path}"))
}
