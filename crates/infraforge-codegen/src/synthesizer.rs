//! Bundle synthesizer
//!
//! Runs the whole pipeline for one request: normalize the graph, render each
//! required module, compose the root documents and price the nodes.

use infraforge_core::{CostEstimator, PricingTable, SynthesisRequest};

use crate::bundle::{Bundle, Module};
use crate::composer::{RootComposer, RootSettings};
use crate::error::{Error, Result};
use crate::normalizer::normalize;
use crate::templates::TemplateLibrary;

/// Options for the synthesizer
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Project name written as the `project_name` default
    pub project_name: String,

    /// Region written as the `aws_region` default
    pub region: String,

    /// Prices used for the bundled estimate
    pub pricing: PricingTable,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            project_name: "infraforge".to_string(),
            region: "us-east-1".to_string(),
            pricing: PricingTable::default(),
        }
    }
}

/// Turns synthesis requests into bundles
///
/// Holds only immutable data, so one instance can serve many requests
/// (and threads).
#[derive(Debug)]
pub struct Synthesizer {
    options: SynthesisOptions,
    templates: TemplateLibrary,
    estimator: CostEstimator,
}

impl Synthesizer {
    /// Create a synthesizer with the built-in templates
    pub fn new(options: SynthesisOptions) -> Result<Self> {
        Ok(Self {
            templates: TemplateLibrary::new()?,
            estimator: CostEstimator::new(options.pricing.clone()),
            options,
        })
    }

    /// Replace the template library
    pub fn with_templates(mut self, templates: TemplateLibrary) -> Self {
        self.templates = templates;
        self
    }

    /// Synthesize a bundle
    ///
    /// Nothing is emitted when the request is rejected.
    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<Bundle> {
        if request.nodes.is_empty() {
            return Err(Error::Validation {
                message: "cannot synthesize an empty graph".to_string(),
            });
        }

        let required = normalize(&request.nodes)?;

        let modules = required
            .specs()
            .iter()
            .map(|spec| {
                let rendered = self.templates.render(spec)?;
                Ok(Module {
                    name: rendered.kind,
                    path: rendered.kind.path(),
                    content: rendered.text,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let composer = RootComposer::new(RootSettings {
            project_name: self.options.project_name.clone(),
            region: self.options.region.clone(),
            environment: request.environment().to_string(),
            vpc: required.vpc().cloned().unwrap_or_default(),
        });
        let docs = composer.compose(&required.kinds())?;

        let estimated_monthly_cost = self.estimator.estimate(&request.nodes);

        tracing::info!(
            nodes = request.nodes.len(),
            modules = ?required.kinds(),
            environment = request.environment(),
            monthly = %estimated_monthly_cost.total_monthly,
            "synthesized bundle"
        );

        Ok(Bundle {
            modules,
            variables: docs.variables,
            outputs: docs.outputs,
            root: docs.root,
            backend: Some(docs.backend),
            connections: request.connections.clone(),
            estimated_monthly_cost,
        })
    }
}
