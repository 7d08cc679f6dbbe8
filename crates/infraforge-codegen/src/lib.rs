//! InfraForge Module Synthesis
//!
//! This crate turns an infrastructure graph into a Terraform bundle.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌────────────┐     ┌───────────┐     ┌──────────┐
//! │  Graph  │────▶│  Required  │────▶│  Modules  │────▶│  Bundle  │
//! │ (nodes) │     │  Modules   │     │  + Root   │     │ (+ cost) │
//! └─────────┘     └────────────┘     └───────────┘     └──────────┘
//!   normalize        templates          composer
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use infraforge_codegen::{SynthesisOptions, Synthesizer};
//! use infraforge_core::Graph;
//!
//! let synthesizer = Synthesizer::new(SynthesisOptions::default())?;
//! let bundle = synthesizer.synthesize(&Graph::load("graphs/web.yaml")?)?;
//! bundle.write_to("infra")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bundle;
pub mod composer;
pub mod error;
pub mod ir;
pub mod normalizer;
pub mod synthesizer;
pub mod templates;

pub use bundle::{Bundle, Module};
pub use composer::{RootComposer, RootDocuments, RootSettings};
pub use error::{Error, Result};
pub use ir::{ModuleKind, ModuleSpec, RequiredModules};
pub use normalizer::normalize;
pub use synthesizer::{SynthesisOptions, Synthesizer};
pub use templates::{ModuleContract, RenderedModule, TemplateLibrary};
