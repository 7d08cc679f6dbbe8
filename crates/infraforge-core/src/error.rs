//! Error types for infraforge-core

use thiserror::Error;

/// Result type alias for infraforge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in infraforge-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration or graph
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// Profile resolution error
    #[error("profile '{profile_name}': {message}")]
    ProfileError {
        /// Name of the profile
        profile_name: String,
        /// Description of the error
        message: String,
    },

    /// Graph file could not be found
    #[error("graph file not found: {path}")]
    GraphNotFound {
        /// Path that was searched
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
