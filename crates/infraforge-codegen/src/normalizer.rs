//! Graph normalizer
//!
//! Decides which modules a node list requires and extracts the settings for
//! each one. Module presence depends only on the component kinds present:
//!
//! | Module | Required when |
//! |---|---|
//! | vpc | any `vpc`, `ec2`, `asg` or `rds` |
//! | alb | an `alb` and any `ec2`/`asg` |
//! | compute | any `ec2` or `asg` |
//! | database | any `rds` |
//! | storage | any `s3` |
//!
//! Settings come from the first node (in input order) matching the module's
//! trigger kinds; later nodes of the same kind only affect cost.

use infraforge_core::graph::{ComponentKind, Node};
use infraforge_core::resources::{ComputeSettings, DatabaseSettings, StorageSettings, VpcSettings};

use crate::error::{Error, Result};
use crate::ir::{ModuleSpec, RequiredModules};

/// Determine the modules required by a node list
///
/// Fails only when `nodes` is empty.
pub fn normalize(nodes: &[Node]) -> Result<RequiredModules> {
    if nodes.is_empty() {
        return Err(Error::Validation {
            message: "graph has no nodes".to_string(),
        });
    }

    let mut vpc: Option<&Node> = None;
    let mut compute: Option<&Node> = None;
    let mut database: Option<&Node> = None;
    let mut storage: Option<&Node> = None;
    let mut needs_network = false;
    let mut has_alb = false;

    for node in nodes {
        match &node.component {
            ComponentKind::Vpc => {
                needs_network = true;
                vpc = vpc.or(Some(node));
            }
            ComponentKind::Ec2 | ComponentKind::Asg => {
                needs_network = true;
                compute = compute.or(Some(node));
            }
            ComponentKind::Rds => {
                needs_network = true;
                database = database.or(Some(node));
            }
            ComponentKind::S3 => storage = storage.or(Some(node)),
            ComponentKind::Alb => has_alb = true,
            // priced, but never emits a module of its own
            ComponentKind::Nat => {}
            ComponentKind::Other(kind) => {
                tracing::debug!(node = %node.id, kind = %kind, "unrecognized component, dropped");
            }
        }
    }

    let mut modules = Vec::new();

    if needs_network {
        let settings = vpc
            .map(|n| VpcSettings::from_properties(&n.properties))
            .unwrap_or_default();
        modules.push(ModuleSpec::Vpc(settings));
    }

    if let Some(settings) = compute.and_then(ComputeSettings::from_node) {
        if has_alb {
            modules.push(ModuleSpec::Alb);
        }
        modules.push(ModuleSpec::Compute(settings));
    } else if has_alb {
        tracing::debug!("load balancer without compute targets, no alb module");
    }

    if let Some(node) = database {
        modules.push(ModuleSpec::Database(DatabaseSettings::from_properties(
            &node.properties,
        )));
    }

    if let Some(node) = storage {
        modules.push(ModuleSpec::Storage(StorageSettings::from_properties(
            &node.properties,
        )));
    }

    let required = RequiredModules::new(modules);
    tracing::debug!(modules = ?required.kinds(), "normalized graph");
    Ok(required)
}
