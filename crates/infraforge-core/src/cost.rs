//! Monthly cost estimation
//!
//! Every node contributes independently of the others, so the total does not
//! depend on node order. Each contribution is rounded to cents (half-up) when
//! it is computed, and the total is the rounded sum of those contributions.
//!
//! | Kind | Label | Monthly amount |
//! |---|---|---|
//! | ec2 | EC2 Instance | rate(type) × hours |
//! | asg | Auto Scaling Group | rate(type) × hours × minSize |
//! | rds | RDS Database | rate(class) × hours × (2 if multi-AZ) + storage rate × GB |
//! | alb | Application Load Balancer | lb rate × hours |
//! | vpc | NAT Gateway | nat rate × hours |
//! | s3 | S3 Storage | storage rate × estimated GB |

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{ComponentKind, Node};
use crate::pricing::PricingTable;
use crate::resources::{ComputeSettings, DatabaseSettings};

/// Input to a standalone estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    /// Nodes to price
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Currency of all amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// US dollars
    #[default]
    #[serde(rename = "USD")]
    Usd,
}

/// One node's contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    /// Node the amount belongs to
    pub node_id: String,
    /// Resource label (shared by all nodes of a kind)
    pub label: String,
    /// Monthly amount, rounded to cents
    pub monthly: Decimal,
}

/// Result of a cost estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Total monthly amount, rounded to cents
    pub total_monthly: Decimal,
    /// Amount per resource label; nodes sharing a label accumulate
    pub breakdown: BTreeMap<String, Decimal>,
    /// One entry per priced node, in input order
    pub line_items: Vec<CostLineItem>,
    /// Currency of every amount
    pub currency: Currency,
}

/// Round half-up to whole cents
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices node lists against an injected [`PricingTable`]
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    pricing: PricingTable,
}

impl CostEstimator {
    /// Create an estimator over the given pricing table
    pub fn new(pricing: PricingTable) -> Self {
        Self { pricing }
    }

    /// The pricing table in use
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Estimate the monthly cost of a node list
    pub fn estimate(&self, nodes: &[Node]) -> CostBreakdown {
        let mut result = CostBreakdown::default();

        for node in nodes {
            let Some((label, monthly)) = self.node_cost(node) else {
                continue;
            };
            *result.breakdown.entry(label.to_string()).or_default() += monthly;
            result.total_monthly += monthly;
            result.line_items.push(CostLineItem {
                node_id: node.id.clone(),
                label: label.to_string(),
                monthly,
            });
        }

        result.total_monthly = round_cents(result.total_monthly);
        tracing::debug!(
            nodes = nodes.len(),
            priced = result.line_items.len(),
            total = %result.total_monthly,
            "estimated monthly cost"
        );
        result
    }

    /// Monthly contribution of a single node, rounded to cents
    ///
    /// Returns `None` for kinds that carry no price.
    pub fn node_cost(&self, node: &Node) -> Option<(&'static str, Decimal)> {
        let p = &self.pricing;
        let hours = p.hours_per_month;

        let (label, amount) = match &node.component {
            ComponentKind::Ec2 | ComponentKind::Asg => {
                let compute = ComputeSettings::from_node(node)?;
                let hourly = p.instance_rate(&compute.instance_type) * hours;
                if node.component == ComponentKind::Asg {
                    (
                        "Auto Scaling Group",
                        hourly * Decimal::from(compute.min_size),
                    )
                } else {
                    ("EC2 Instance", hourly)
                }
            }
            ComponentKind::Rds => {
                let db = DatabaseSettings::from_properties(&node.properties);
                let replicas = if db.multi_az { Decimal::TWO } else { Decimal::ONE };
                let instances = p.db_instance_rate(&db.instance_class) * hours * replicas;
                let storage = p.db_storage_gb_monthly * Decimal::from(db.allocated_storage_gb);
                ("RDS Database", instances + storage)
            }
            ComponentKind::Alb => ("Application Load Balancer", p.load_balancer_hourly * hours),
            // the vpc module provisions the only NAT gateway
            ComponentKind::Vpc => ("NAT Gateway", p.nat_gateway_hourly * hours),
            ComponentKind::S3 => (
                "S3 Storage",
                p.object_storage_gb_monthly * p.object_storage_estimated_gb,
            ),
            ComponentKind::Nat => {
                tracing::debug!(node = %node.id, "nat gateway is priced with its vpc, skipping");
                return None;
            }
            ComponentKind::Other(kind) => {
                tracing::debug!(node = %node.id, kind = %kind, "no price for component, skipping");
                return None;
            }
        };

        Some((label, round_cents(amount)))
    }
}
