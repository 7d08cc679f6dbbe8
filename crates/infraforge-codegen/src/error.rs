//! Error types for module synthesis

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during synthesis
#[derive(Error, Debug)]
pub enum Error {
    /// The request cannot be synthesized (e.g. no nodes)
    #[error("validation error: {message}")]
    Validation {
        /// Error description
        message: String,
    },

    /// A module template failed to compile or render
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A module input could not be wired to its producer
    #[error("cannot wire module '{module}': {message}")]
    Wiring {
        /// Consuming module
        module: String,
        /// Error description
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core library (config, graph loading)
    #[error(transparent)]
    Core(#[from] infraforge_core::Error),
}
