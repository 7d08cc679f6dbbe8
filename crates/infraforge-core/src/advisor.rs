//! Graph advisories
//!
//! Non-blocking findings about a graph: missing network isolation, compute
//! without a load balancer, components the engine will ignore, and a few
//! risky property choices. Advisories never change synthesis output.

use serde::{Deserialize, Serialize};

use crate::graph::{ComponentKind, Node};
use crate::resources::{DatabaseSettings, StorageSettings};

/// Advisory severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Worth fixing
    Warning,
    /// Should be fixed before deploying
    Critical,
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Stable identifier, e.g. `no-vpc`
    pub id: String,
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Node the finding refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl Advisory {
    fn new(id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.into(),
            resource: None,
        }
    }

    fn on(mut self, node: &Node) -> Self {
        self.resource = Some(node.id.clone());
        self
    }
}

/// Inspect a node list and report advisories
///
/// Graph-level findings come first, followed by per-node findings in input
/// order.
pub fn advise(nodes: &[Node]) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if nodes.is_empty() {
        return advisories;
    }

    let has = |kind: ComponentKind| nodes.iter().any(|n| n.component == kind);
    let has_compute = nodes.iter().any(|n| n.component.is_compute());

    if has_compute && !has(ComponentKind::Vpc) {
        advisories.push(Advisory::new(
            "no-vpc",
            Severity::Warning,
            "Consider adding a VPC for network isolation. A default VPC module will be generated for compute resources.",
        ));
    }
    if has_compute && !has(ComponentKind::Alb) {
        advisories.push(Advisory::new(
            "no-alb",
            Severity::Info,
            "For production web applications, add an Application Load Balancer for traffic distribution.",
        ));
    }
    if has(ComponentKind::Alb) && !has_compute {
        advisories.push(Advisory::new(
            "orphan-alb",
            Severity::Warning,
            "Load balancer has no compute targets; no load balancer module will be generated.",
        ));
    }

    for node in nodes {
        match &node.component {
            ComponentKind::Rds => {
                if !DatabaseSettings::from_properties(&node.properties).multi_az {
                    advisories.push(
                        Advisory::new(
                            "single-az-database",
                            Severity::Warning,
                            "Database runs in a single availability zone; enable multiAz for failover.",
                        )
                        .on(node),
                    );
                }
            }
            ComponentKind::S3 => {
                if !StorageSettings::from_properties(&node.properties).encryption {
                    advisories.push(
                        Advisory::new(
                            "unencrypted-storage",
                            Severity::Critical,
                            "Bucket has server-side encryption disabled.",
                        )
                        .on(node),
                    );
                }
            }
            ComponentKind::Other(kind) => {
                let message = if kind.is_empty() {
                    "Node names no component and will be ignored.".to_string()
                } else {
                    format!("Component '{kind}' is not supported and will be ignored.")
                };
                advisories.push(
                    Advisory::new("unrecognized-component", Severity::Info, message).on(node),
                );
            }
            _ => {}
        }
    }

    advisories
}
