//! Configuration parsing and validation
//!
//! This module handles loading and validating InfraForge project files.
//!
//! # Configuration Files
//!
//! - `infraforge.yaml` - Project root configuration
//!
//! ```yaml
//! name: shop
//! region: eu-west-1
//! environment: staging
//! output_dir: infra
//! pricing:
//!   nat_gateway_hourly: 0.048
//! profiles:
//!   prod:
//!     environment: production
//!     output_dir: infra/prod
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pricing::PricingTable;

/// Default configuration file name
pub const CONFIG_FILE: &str = "infraforge.yaml";

/// Project names end up in bucket and resource names, so they must be DNS-safe.
static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]{1,38}[a-z0-9]$").expect("valid project name regex"));

/// Root project configuration from `infraforge.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name; prefixes every generated resource name
    #[serde(default = "default_name")]
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// AWS region written as the `aws_region` default
    #[serde(default = "default_region")]
    pub region: String,

    /// Environment used when a graph does not request one
    #[serde(default)]
    pub environment: Option<String>,

    /// Directory (relative to the project) that bundles are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Pricing overrides
    #[serde(default)]
    pub pricing: PricingTable,

    /// Named overrides selected with `--profile`
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            region: default_region(),
            environment: None,
            output_dir: default_output_dir(),
            pricing: PricingTable::default(),
            profiles: BTreeMap::new(),
        }
    }
}

fn default_name() -> String {
    "infraforge".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_output_dir() -> String {
    "infra".to_string()
}

/// Environment-specific overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Region override
    #[serde(default)]
    pub region: Option<String>,

    /// Environment override
    #[serde(default)]
    pub environment: Option<String>,

    /// Output directory override
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration (with the active profile applied)
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,

    /// Profile applied on load, if any
    pub active_profile: Option<String>,
}

impl Config {
    /// Load configuration from a directory or an `infraforge.yaml` path
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_profile(path, None)
    }

    /// Load configuration and apply a named profile
    pub fn load_with_profile<P: AsRef<Path>>(path: P, profile: Option<&str>) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let mut project: ProjectConfig = serde_yaml::from_str(&contents)?;

        if let Some(name) = profile {
            let overrides = project
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| Error::ProfileError {
                    profile_name: name.to_string(),
                    message: format!(
                        "not defined in {} (available: {})",
                        config_path.display(),
                        available(&project.profiles)
                    ),
                })?;
            apply_profile(&mut project, overrides);
            tracing::debug!(profile = name, "applied configuration profile");
        }

        let config = Self {
            project,
            base_path,
            active_profile: profile.map(str::to_string),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that flow into generated resource names
    pub fn validate(&self) -> Result<()> {
        validate_project_name(&self.project.name)?;

        if self.project.region.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "region must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Absolute-or-relative directory bundles are written to
    pub fn output_path(&self) -> PathBuf {
        self.base_path.join(&self.project.output_dir)
    }
}

/// Reject project names that cannot be used in bucket and resource names
pub fn validate_project_name(name: &str) -> Result<()> {
    if PROJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::ConfigInvalid {
            message: format!(
                "project name '{}' must be 3-40 lowercase letters, digits or '-', starting with a letter",
                name
            ),
        })
    }
}

fn apply_profile(project: &mut ProjectConfig, overrides: ProfileConfig) {
    if let Some(region) = overrides.region {
        project.region = region;
    }
    if let Some(environment) = overrides.environment {
        project.environment = Some(environment);
    }
    if let Some(output_dir) = overrides.output_dir {
        project.output_dir = output_dir;
    }
}

fn available(profiles: &BTreeMap<String, ProfileConfig>) -> String {
    if profiles.is_empty() {
        "none".to_string()
    } else {
        profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_minimal_config() {
        let config: ProjectConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.name, "infraforge");
        assert_eq!(config.version, "0.1.0");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.output_dir, "infra");
        assert!(config.environment.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: shop
version: "1.2.0"
region: eu-west-1
environment: staging
output_dir: terraform
pricing:
  nat_gateway_hourly: 0.048
profiles:
  prod:
    environment: production
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "shop");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.environment.as_deref(), Some("staging"));
        assert_eq!(config.pricing.nat_gateway_hourly, dec!(0.048));
        assert_eq!(config.pricing.hours_per_month, dec!(730));
        assert!(config.profiles.contains_key("prod"));
    }

    #[test]
    fn test_project_name_validation() {
        assert!(validate_project_name("infraforge").is_ok());
        assert!(validate_project_name("shop-api-2").is_ok());
        assert!(validate_project_name("Shop").is_err());
        assert!(validate_project_name("ab").is_err());
        assert!(validate_project_name("trailing-").is_err());
        assert!(validate_project_name("has_underscore").is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "name: shop\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.project.name, "shop");
        assert_eq!(config.base_path, dir.path());
        assert_eq!(config.output_path(), dir.path().join("infra"));
        assert!(config.active_profile.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path());
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_rejects_bad_project_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "name: Not Valid\n").unwrap();
        let result = Config::load(dir.path());
        assert!(matches!(result, Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn test_unknown_profile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "name: shop\n").unwrap();
        let result = Config::load_with_profile(dir.path(), Some("prod"));
        match result {
            Err(Error::ProfileError {
                profile_name,
                message,
            }) => {
                assert_eq!(profile_name, "prod");
                assert!(message.contains("none"));
            }
            other => panic!("Expected profile error, got {:?}", other),
        }
    }
}
