//! Estimate the monthly cost of a graph

use anyhow::Result;
use infraforge_core::CostEstimator;

use super::{load_config, load_graph};

/// Run the estimate command
pub fn run(config_path: &str, graph_path: &str, profile: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(config_path, profile)?;
    let graph = load_graph(graph_path)?;

    let estimator = CostEstimator::new(config.project.pricing.clone());
    let cost = estimator.estimate(&graph.nodes);

    if json {
        println!("{}", serde_json::to_string_pretty(&cost)?);
        return Ok(());
    }

    let skipped = graph.nodes.len() - cost.line_items.len();
    if skipped > 0 {
        tracing::info!("{} node(s) carry no price and were skipped", skipped);
    }

    let id_width = cost
        .line_items
        .iter()
        .map(|i| i.node_id.len())
        .max()
        .unwrap_or(0)
        .max("Total".len());

    println!("Estimated monthly cost (USD)");
    println!();
    for item in &cost.line_items {
        println!(
            "  {:<id_width$}  {:<26}  {:>10}",
            item.node_id,
            item.label,
            item.monthly.to_string()
        );
    }
    println!();
    for (label, amount) in &cost.breakdown {
        println!(
            "  {:<id_width$}  {:<26}  {:>10}",
            "",
            label,
            amount.to_string()
        );
    }
    println!(
        "  {:<id_width$}  {:<26}  {:>10}",
        "Total",
        "",
        cost.total_monthly.to_string()
    );

    Ok(())
}
