//! End-to-end synthesis tests
//!
//! Each test drives the public `Synthesizer` API with a graph and inspects
//! the resulting bundle: module selection and order, rendered parameters,
//! root wiring and the bundled cost estimate.

use infraforge_codegen::{Error, ModuleKind, SynthesisOptions, Synthesizer};
use infraforge_core::{Connection, CostEstimator, EstimateRequest, Graph, Node};
use rstest::rstest;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn synthesizer() -> Synthesizer {
    Synthesizer::new(SynthesisOptions::default()).unwrap()
}

/// The web stack used throughout: vpc, alb, a 2..6 group of large
/// instances and a single-AZ database.
fn web_stack() -> Vec<Node> {
    vec![
        Node::new("vpc", "vpc"),
        Node::new("alb", "alb"),
        Node::new("web", "asg")
            .with_property("minSize", 2)
            .with_property("maxSize", 6)
            .with_property("instanceType", "large"),
        Node::new("db", "rds").with_property("multiAz", false),
    ]
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_web_stack_end_to_end() {
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(web_stack()))
        .unwrap();

    assert_eq!(
        bundle.module_names(),
        [
            ModuleKind::Vpc,
            ModuleKind::Alb,
            ModuleKind::Compute,
            ModuleKind::Database
        ]
    );

    let compute = &bundle.module(ModuleKind::Compute).unwrap().content;
    assert!(compute.contains("instance_type          = \"t3.large\""));
    assert!(compute.contains("min_size                  = 2\n"));
    assert!(compute.contains("max_size                  = 6\n"));

    let database = &bundle.module(ModuleKind::Database).unwrap().content;
    assert!(database.contains("multi_az               = false\n"));

    assert!(bundle.root.contains("target_group_arn      = module.alb.target_group_arn"));
    assert!(bundle.outputs.contains("module.alb.alb_dns_name"));

    let cost = &bundle.estimated_monthly_cost;
    assert_eq!(cost.total_monthly, dec!(231.89));
    assert_eq!(cost.breakdown["NAT Gateway"], dec!(32.85));
    assert_eq!(cost.breakdown["Application Load Balancer"], dec!(16.43));
    assert_eq!(cost.breakdown["Auto Scaling Group"], dec!(121.47));
    assert_eq!(cost.breakdown["RDS Database"], dec!(61.14));
}

#[test]
fn test_bundle_json_shape() {
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(web_stack()))
        .unwrap();
    let json = serde_json::to_value(&bundle).unwrap();

    assert_eq!(json["modules"][0]["name"], "vpc");
    assert_eq!(json["modules"][0]["path"], "modules/vpc");
    assert_eq!(json["estimated_monthly_cost"]["currency"], "USD");
    assert!(json["backend"].is_string());
}

// =============================================================================
// Ordering and determinism
// =============================================================================

#[test]
fn test_identical_requests_yield_identical_bundles() {
    let request = Graph::from_nodes(web_stack());
    let a = synthesizer().synthesize(&request).unwrap();
    let b = synthesizer().synthesize(&request).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[rstest]
#[case::reversed(&[3, 2, 1, 0])]
#[case::rotated(&[2, 3, 0, 1])]
#[case::swapped(&[1, 0, 3, 2])]
fn test_module_order_ignores_input_order(#[case] order: &[usize]) {
    let nodes = web_stack();
    let shuffled: Vec<Node> = order.iter().map(|&i| nodes[i].clone()).collect();

    let expected = synthesizer().synthesize(&Graph::from_nodes(nodes)).unwrap();
    let actual = synthesizer()
        .synthesize(&Graph::from_nodes(shuffled))
        .unwrap();

    assert_eq!(actual.module_names(), expected.module_names());
    assert_eq!(actual.root, expected.root);
    assert_eq!(
        actual.estimated_monthly_cost.total_monthly,
        expected.estimated_monthly_cost.total_monthly
    );
}

#[test]
fn test_shared_across_threads() {
    let synthesizer = Arc::new(synthesizer());
    let request = Arc::new(Graph::from_nodes(web_stack()));
    let expected = synthesizer.synthesize(&request).unwrap().digest();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let synthesizer = Arc::clone(&synthesizer);
            let request = Arc::clone(&request);
            std::thread::spawn(move || synthesizer.synthesize(&request).unwrap().digest())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// =============================================================================
// Triggers and defaults
// =============================================================================

#[test]
fn test_database_only_pulls_in_network() {
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(vec![Node::new("db", "rds")]))
        .unwrap();
    assert_eq!(
        bundle.module_names(),
        [ModuleKind::Vpc, ModuleKind::Database]
    );
    assert!(!bundle.root.contains("app_security_group_id"));
}

#[test]
fn test_compute_defaults_to_medium_instance() {
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(vec![Node::new("web", "asg")]))
        .unwrap();
    let compute = &bundle.module(ModuleKind::Compute).unwrap().content;
    assert!(compute.contains("instance_type          = \"t3.medium\""));
    assert!(compute.contains("min_size                  = 2\n"));
    assert!(compute.contains("max_size                  = 10\n"));
}

#[test]
fn test_single_instance_ignores_min_size() {
    let node = Node::new("web", "ec2").with_property("minSize", 5);
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(vec![node]))
        .unwrap();
    let compute = &bundle.module(ModuleKind::Compute).unwrap().content;
    assert!(compute.contains("min_size                  = 1\n"));
    assert!(compute.contains("max_size                  = 1\n"));
}

#[test]
fn test_unrecognized_components_are_dropped() {
    let request = Graph::from_nodes(vec![
        Node::new("assets", "s3"),
        Node::new("fn", "lambda"),
    ]);
    let bundle = synthesizer().synthesize(&request).unwrap();

    assert_eq!(bundle.module_names(), [ModuleKind::Storage]);
    assert_eq!(bundle.estimated_monthly_cost.line_items.len(), 1);
    assert_eq!(bundle.estimated_monthly_cost.total_monthly, dec!(2.30));
}

#[test]
fn test_nodes_without_component_are_dropped() {
    let request: Graph =
        serde_json::from_str(r#"{"nodes":[{"id":"a"},{"id":"b","component":"s3"}]}"#).unwrap();
    let bundle = synthesizer().synthesize(&request).unwrap();

    assert_eq!(bundle.module_names(), [ModuleKind::Storage]);
    assert_eq!(bundle.estimated_monthly_cost.total_monthly, dec!(2.30));

    let estimate: EstimateRequest =
        serde_json::from_str(r#"{"nodes":[{"id":"a","component":7},{"id":"b","component":"s3"}]}"#)
            .unwrap();
    let cost = CostEstimator::default().estimate(&estimate.nodes);
    assert_eq!(cost.total_monthly, dec!(2.30));
}

#[test]
fn test_only_unrecognized_components_still_synthesize() {
    let request = Graph::from_nodes(vec![Node::new("fn", "lambda")]);
    let bundle = synthesizer().synthesize(&request).unwrap();

    assert!(bundle.modules.is_empty());
    assert!(bundle.backend.is_some());
    assert!(bundle.outputs.is_empty());
}

#[test]
fn test_vpc_properties_become_root_defaults() {
    let node = Node::new("net", "vpc")
        .with_property("cidr", "10.20.0.0/16")
        .with_property("azCount", 2);
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(vec![node]))
        .unwrap();
    assert!(bundle.variables.contains("default     = \"10.20.0.0/16\""));
    assert!(bundle.variables.contains("default     = 2\n"));
}

#[test]
fn test_vpc_layout_stays_within_subnet_slots() {
    let node = Node::new("net", "vpc")
        .with_property("cidr", "10.20.0.0/30")
        .with_property("azCount", 12);
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(vec![node]))
        .unwrap();
    assert!(bundle.variables.contains("default     = \"10.0.0.0/16\""));
    assert!(bundle.variables.contains("default     = 8\n"));

    let vpc = &bundle.module(ModuleKind::Vpc).unwrap().content;
    assert!(vpc.contains("default     = 8\n"));
}

// =============================================================================
// Errors and pass-through
// =============================================================================

#[test]
fn test_empty_graph_is_rejected() {
    let err = synthesizer().synthesize(&Graph::default()).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_connections_carried_through() {
    let mut request = Graph::from_nodes(web_stack());
    request.connections.push(Connection {
        id: "c1".to_string(),
        source: "alb".to_string(),
        target: "web".to_string(),
        kind: "network".to_string(),
        properties: None,
    });

    let bundle = synthesizer().synthesize(&request).unwrap();
    assert_eq!(bundle.connections, request.connections);
}

#[test]
fn test_write_bundle_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = synthesizer()
        .synthesize(&Graph::from_nodes(web_stack()))
        .unwrap();
    bundle.write_to(dir.path()).unwrap();

    for file in ["main.tf", "variables.tf", "outputs.tf", "backend.tf"] {
        assert!(dir.path().join(file).exists(), "missing {file}");
    }
    for module in ["vpc", "alb", "compute", "database"] {
        let path = dir.path().join("modules").join(module).join("main.tf");
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(!dir.path().join("modules/storage").exists());
}
