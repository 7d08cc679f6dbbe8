//! CLI command implementations

pub mod estimate;
pub mod init;
pub mod synthesize;
pub mod validate;

use anyhow::{Context, Result};
use infraforge_core::{Config, Graph, ProjectConfig};
use std::path::{Path, PathBuf};

/// Load the project configuration
///
/// A missing configuration falls back to the defaults unless a profile was
/// requested, since profiles only exist in a configuration file.
pub fn load_config(config_path: &str, profile: Option<&str>) -> Result<Config> {
    let path = Path::new(config_path);
    if !path.exists() && profile.is_none() {
        tracing::debug!(path = config_path, "no configuration found, using defaults");
        return Ok(Config {
            project: ProjectConfig::default(),
            base_path: PathBuf::from("."),
            active_profile: None,
        });
    }

    Config::load_with_profile(path, profile).context("Failed to load configuration")
}

/// Load a graph file
pub fn load_graph(graph_path: &str) -> Result<Graph> {
    Graph::load(graph_path).with_context(|| format!("Failed to load graph '{graph_path}'"))
}
