//! InfraForge Core Library
//!
//! This crate provides the core functionality for InfraForge:
//! - The infrastructure graph model (nodes, connections, property bags)
//! - Per-kind resource settings with their documented defaults
//! - The pricing table and monthly cost estimator
//! - Graph advisories (non-blocking lint findings)
//! - Project configuration parsing and profiles
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Graph    │────▶│  Resource   │────▶│    Cost     │
//! │ (YAML/JSON) │     │  Settings   │     │  Estimator  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use infraforge_core::{CostEstimator, Graph};
//!
//! let graph = Graph::load("./graphs/web.yaml")?;
//! let cost = CostEstimator::default().estimate(&graph.nodes);
//! println!("Monthly: ${}", cost.total_monthly);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod advisor;
pub mod config;
pub mod cost;
pub mod error;
pub mod graph;
pub mod pricing;
pub mod resources;

pub use advisor::{Advisory, Severity, advise};
pub use config::{Config, ProjectConfig};
pub use cost::{CostBreakdown, CostEstimator, CostLineItem, Currency, EstimateRequest};
pub use error::{Error, Result};
pub use graph::{ComponentKind, Connection, Graph, Node, Properties, SynthesisRequest};
pub use pricing::PricingTable;
