//! Validate a graph command

use anyhow::{Context, Result};
use infraforge_codegen::normalize;
use infraforge_core::{Severity, advise};

use super::{load_config, load_graph};

/// Run the validate command
pub fn run(config_path: &str, graph_path: &str, profile: Option<&str>) -> Result<()> {
    tracing::info!("Validating graph: {}", graph_path);

    let config = load_config(config_path, profile)?;
    tracing::info!("✓ Project: {}", config.project.name);
    if let Some(profile) = &config.active_profile {
        tracing::info!("✓ Profile: {}", profile);
    }

    let graph = load_graph(graph_path)?;
    let required = normalize(&graph.nodes).context("Graph cannot be synthesized")?;

    let modules: Vec<_> = required.kinds().iter().map(|m| m.name()).collect();
    if modules.is_empty() {
        tracing::info!("✓ Modules: none");
    } else {
        tracing::info!("✓ Modules: {}", modules.join(", "));
    }

    let advisories = advise(&graph.nodes);
    for advisory in &advisories {
        let resource = advisory
            .resource
            .as_deref()
            .map(|r| format!(" [{r}]"))
            .unwrap_or_default();
        match advisory.severity {
            Severity::Info => {
                tracing::info!("{}{}: {}", advisory.id, resource, advisory.message)
            }
            Severity::Warning | Severity::Critical => {
                tracing::warn!(
                    "{} ({:?}){}: {}",
                    advisory.id,
                    advisory.severity,
                    resource,
                    advisory.message
                )
            }
        }
    }

    tracing::info!(
        "✓ Graph is valid ({} advisories)",
        advisories.len()
    );
    Ok(())
}
