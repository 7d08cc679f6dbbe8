//! Integration tests for project configuration and graph loading
//!
//! Tests use temporary directories with real file fixtures to verify:
//! - Project config loading with profiles
//! - Pricing overrides flowing into the estimator
//! - Graph files in YAML and JSON
//! - Error handling for missing files

use infraforge_core::config::CONFIG_FILE;
use infraforge_core::{ComponentKind, Config, CostEstimator, Error, Graph};
use rust_decimal_macros::dec;
use tempfile::TempDir;

/// Helper to create a temporary project directory with a `graphs/` folder.
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("graphs")).unwrap();
    dir
}

const PROJECT_YAML: &str = r#"
name: shop
region: eu-west-1
environment: staging
output_dir: infra
pricing:
  load_balancer_hourly: 0.03
profiles:
  prod:
    region: us-west-2
    environment: production
    output_dir: infra/prod
  dev:
    environment: development
"#;

// =============================================================================
// Profile Tests
// =============================================================================

#[test]
fn test_base_config_without_profile() {
    let dir = setup_project();
    std::fs::write(dir.path().join(CONFIG_FILE), PROJECT_YAML).unwrap();

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.project.name, "shop");
    assert_eq!(config.project.region, "eu-west-1");
    assert_eq!(config.project.environment.as_deref(), Some("staging"));
    assert_eq!(config.output_path(), dir.path().join("infra"));
}

#[test]
fn test_prod_profile_overrides_every_field() {
    let dir = setup_project();
    std::fs::write(dir.path().join(CONFIG_FILE), PROJECT_YAML).unwrap();

    let config = Config::load_with_profile(dir.path(), Some("prod")).unwrap();
    assert_eq!(config.active_profile.as_deref(), Some("prod"));
    assert_eq!(config.project.region, "us-west-2");
    assert_eq!(config.project.environment.as_deref(), Some("production"));
    assert_eq!(config.output_path(), dir.path().join("infra/prod"));
}

#[test]
fn test_partial_profile_keeps_base_values() {
    let dir = setup_project();
    std::fs::write(dir.path().join(CONFIG_FILE), PROJECT_YAML).unwrap();

    let config = Config::load_with_profile(dir.path(), Some("dev")).unwrap();
    assert_eq!(config.project.region, "eu-west-1");
    assert_eq!(config.project.environment.as_deref(), Some("development"));
    assert_eq!(config.project.output_dir, "infra");
}

#[test]
fn test_unknown_profile_lists_available() {
    let dir = setup_project();
    std::fs::write(dir.path().join(CONFIG_FILE), PROJECT_YAML).unwrap();

    let err = Config::load_with_profile(dir.path(), Some("qa")).unwrap_err();
    match err {
        Error::ProfileError { message, .. } => {
            assert!(message.contains("dev, prod"), "got: {message}");
        }
        other => panic!("Expected profile error, got {:?}", other),
    }
}

#[test]
fn test_load_from_explicit_file_path() {
    let dir = setup_project();
    let path = dir.path().join("custom.yaml");
    std::fs::write(&path, "name: custom-app\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.project.name, "custom-app");
    assert_eq!(config.base_path, dir.path());
}

// =============================================================================
// Pricing Override Tests
// =============================================================================

#[test]
fn test_pricing_override_reaches_estimator() {
    let dir = setup_project();
    std::fs::write(dir.path().join(CONFIG_FILE), PROJECT_YAML).unwrap();
    let config = Config::load(dir.path()).unwrap();

    let graph = Graph::from_nodes(vec![infraforge_core::Node::new("lb", "alb")]);
    let cost = CostEstimator::new(config.project.pricing).estimate(&graph.nodes);

    // 0.03 * 730
    assert_eq!(cost.total_monthly, dec!(21.90));
}

// =============================================================================
// Graph Loading Tests
// =============================================================================

#[test]
fn test_load_yaml_graph() {
    let dir = setup_project();
    let path = dir.path().join("graphs/web.yaml");
    std::fs::write(
        &path,
        r#"
nodes:
  - id: net
    component: vpc
  - id: web
    component: asg
    properties:
      minSize: 2
      instanceType: large
  - id: fn
    component: lambda
connections:
  - id: c1
    source: net
    target: web
    type: network
requirements:
  environment: staging
"#,
    )
    .unwrap();

    let graph = Graph::load(&path).unwrap();
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.nodes[1].component, ComponentKind::Asg);
    assert_eq!(
        graph.nodes[2].component,
        ComponentKind::Other("lambda".to_string())
    );
    assert_eq!(graph.connections[0].kind, "network");
    assert_eq!(graph.environment(), "staging");
}

#[test]
fn test_load_json_graph() {
    let dir = setup_project();
    let path = dir.path().join("graphs/db.json");
    std::fs::write(
        &path,
        r#"{"nodes": [{"id": "db", "component": "rds", "properties": {"multiAz": false}}]}"#,
    )
    .unwrap();

    let graph = Graph::load(&path).unwrap();
    assert_eq!(graph.nodes[0].component, ComponentKind::Rds);
    assert!(graph.connections.is_empty());
    assert_eq!(graph.environment(), "production");
}

#[test]
fn test_missing_graph_file() {
    let dir = setup_project();
    let err = Graph::load(dir.path().join("graphs/missing.yaml")).unwrap_err();
    assert!(matches!(err, Error::GraphNotFound { .. }));
}
