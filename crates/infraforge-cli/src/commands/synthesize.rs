//! Synthesize a Terraform bundle

use anyhow::{Context, Result};
use infraforge_codegen::{SynthesisOptions, Synthesizer};
use std::path::PathBuf;

use super::{load_config, load_graph};

/// Run the synthesize command
pub fn run(
    config_path: &str,
    graph_path: &str,
    output: Option<&str>,
    environment: Option<&str>,
    profile: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, profile)?;
    let mut graph = load_graph(graph_path)?;

    // --environment beats the graph's requirements, which beat the config
    if let Some(env) = environment {
        graph = graph.with_environment(env);
    } else if !graph.requirements.contains_key("environment")
        && let Some(env) = &config.project.environment
    {
        graph = graph.with_environment(env.clone());
    }

    tracing::info!(
        "Synthesizing {} ({} nodes, environment {})",
        graph_path,
        graph.nodes.len(),
        graph.environment()
    );

    let synthesizer = Synthesizer::new(SynthesisOptions {
        project_name: config.project.name.clone(),
        region: config.project.region.clone(),
        pricing: config.project.pricing.clone(),
    })?;
    let bundle = synthesizer
        .synthesize(&graph)
        .context("Failed to synthesize bundle")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    let output_dir = output
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output_path());
    let written = bundle
        .write_to(&output_dir)
        .with_context(|| format!("Failed to write bundle to {}", output_dir.display()))?;

    for path in &written {
        tracing::debug!("wrote {}", path.display());
    }

    let modules: Vec<_> = bundle.module_names().iter().map(|m| m.name()).collect();
    tracing::info!("✓ Modules: {}", modules.join(", "));
    tracing::info!(
        "✓ Estimated monthly cost: ${}",
        bundle.estimated_monthly_cost.total_monthly
    );
    tracing::info!("✓ Wrote {} files to {}", written.len(), output_dir.display());
    tracing::info!("  Digest: {}", bundle.digest());

    Ok(())
}
