//! Per-kind resource settings
//!
//! Each settings struct reads the recognized properties of a node and fills
//! in the documented default for anything absent, blank, or of the wrong
//! type. The code generator and the cost estimator both read nodes through
//! these structs, so every default lives in exactly one place.
//!
//! | Kind | Property | Default |
//! |---|---|---|
//! | vpc | `cidr` | `10.0.0.0/16` (prefix at most /28) |
//! | vpc | `azCount` | `3` (at most 8) |
//! | ec2 / asg | `instanceType` | `t3.medium` |
//! | asg | `minSize` / `maxSize` | `2` / `10` |
//! | rds | `engine` | `postgres` |
//! | rds | `instanceClass` | `db.t3.medium` |
//! | rds | `allocatedStorage` | `100` |
//! | rds | `multiAz` | `true` |
//! | s3 | `versioning` / `encryption` | `true` / `true` |

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::graph::{ComponentKind, Node, Properties};

/// Default VPC CIDR block
pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";
/// Default number of availability zones
pub const DEFAULT_AZ_COUNT: u32 = 3;
/// Subnet bits added to the VPC prefix for each public or private subnet
pub const SUBNET_NEWBITS: u8 = 4;
/// Most availability zones a VPC can span (a public and a private subnet each)
pub const MAX_AZ_COUNT: u32 = (1 << SUBNET_NEWBITS) / 2;
/// Default compute instance type (medium tier)
pub const DEFAULT_INSTANCE_TYPE: &str = "t3.medium";
/// Default database instance class (medium tier)
pub const DEFAULT_DB_INSTANCE_CLASS: &str = "db.t3.medium";
/// Default database engine
pub const DEFAULT_DB_ENGINE: &str = "postgres";
/// Default allocated database storage in GB
pub const DEFAULT_ALLOCATED_STORAGE_GB: u32 = 100;
/// Default auto-scaling group minimum size
pub const DEFAULT_ASG_MIN_SIZE: u32 = 2;
/// Default auto-scaling group maximum size
pub const DEFAULT_ASG_MAX_SIZE: u32 = 10;

const INSTANCE_FAMILY: &str = "t3.";
const DB_INSTANCE_FAMILY: &str = "db.t3.";
const TIERS: &[&str] = &["nano", "micro", "small", "medium", "large", "xlarge", "2xlarge"];

/// Expand a bare tier name (`large`) into a full instance type (`t3.large`)
///
/// Anything that is not a bare tier is returned unchanged.
pub fn expand_tier(value: &str, family: &str) -> String {
    if TIERS.contains(&value) {
        format!("{family}{value}")
    } else {
        value.to_string()
    }
}

fn is_ipv4_cidr(value: &str) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    addr.parse::<Ipv4Addr>().is_ok() && prefix.parse::<u8>().is_ok_and(|p| p <= 32)
}

/// Whether subnets can still be carved out of the block
fn has_subnet_room(cidr: &str) -> bool {
    cidr.split_once('/')
        .and_then(|(_, prefix)| prefix.parse::<u8>().ok())
        .is_some_and(|p| p <= 32 - SUBNET_NEWBITS)
}

/// Network settings for the `vpc` module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VpcSettings {
    /// IPv4 CIDR block
    pub cidr: String,
    /// Availability zone count (at least 1)
    pub az_count: u32,
}

impl Default for VpcSettings {
    fn default() -> Self {
        Self {
            cidr: DEFAULT_VPC_CIDR.to_string(),
            az_count: DEFAULT_AZ_COUNT,
        }
    }
}

impl VpcSettings {
    /// Read settings from a property bag
    pub fn from_properties(props: &Properties) -> Self {
        let raw_cidr = props.str_or("cidr", DEFAULT_VPC_CIDR);
        let cidr = if is_ipv4_cidr(raw_cidr) && has_subnet_room(raw_cidr) {
            raw_cidr.to_string()
        } else {
            tracing::debug!(cidr = raw_cidr, "unusable vpc cidr, using default");
            DEFAULT_VPC_CIDR.to_string()
        };

        let az_count = match props.u32_or("azCount", DEFAULT_AZ_COUNT) {
            0 => DEFAULT_AZ_COUNT,
            n if n > MAX_AZ_COUNT => {
                tracing::debug!(az_count = n, max = MAX_AZ_COUNT, "too many zones, clamping");
                MAX_AZ_COUNT
            }
            n => n,
        };

        Self { cidr, az_count }
    }
}

/// Whether compute is a single instance or an auto-scaling group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    /// Single instance; always sized 1/1
    Single,
    /// Auto-scaling group honoring its own bounds
    Group,
}

/// Compute settings for the `compute` module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputeSettings {
    /// Full instance type, e.g. `t3.medium`
    pub instance_type: String,
    /// Minimum (and desired) capacity
    pub min_size: u32,
    /// Maximum capacity (never below `min_size`)
    pub max_size: u32,
    /// Scaling branch taken from the node kind
    pub scaling: ScalingMode,
}

impl ComputeSettings {
    /// Read settings from an `ec2` or `asg` node; `None` for any other kind
    pub fn from_node(node: &Node) -> Option<Self> {
        let props = &node.properties;
        let instance_type = expand_tier(
            props.str_or("instanceType", DEFAULT_INSTANCE_TYPE),
            INSTANCE_FAMILY,
        );

        match node.component {
            ComponentKind::Ec2 => Some(Self {
                instance_type,
                min_size: 1,
                max_size: 1,
                scaling: ScalingMode::Single,
            }),
            ComponentKind::Asg => {
                let min_size = props.u32_or("minSize", DEFAULT_ASG_MIN_SIZE);
                let max_size = props.u32_or("maxSize", DEFAULT_ASG_MAX_SIZE).max(min_size);
                Some(Self {
                    instance_type,
                    min_size,
                    max_size,
                    scaling: ScalingMode::Group,
                })
            }
            _ => None,
        }
    }
}

/// Database settings for the `database` module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Engine name (`postgres`, `mysql`, ...)
    pub engine: String,
    /// Full instance class, e.g. `db.t3.medium`
    pub instance_class: String,
    /// Allocated storage in GB (at least 1)
    pub allocated_storage_gb: u32,
    /// Standby replica in a second availability zone
    pub multi_az: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::from_properties(&Properties::new())
    }
}

impl DatabaseSettings {
    /// Read settings from a property bag
    pub fn from_properties(props: &Properties) -> Self {
        let allocated_storage_gb = match props.u32_or("allocatedStorage", DEFAULT_ALLOCATED_STORAGE_GB)
        {
            0 => DEFAULT_ALLOCATED_STORAGE_GB,
            n => n,
        };

        Self {
            engine: props.str_or("engine", DEFAULT_DB_ENGINE).to_string(),
            instance_class: expand_tier(
                props.str_or("instanceClass", DEFAULT_DB_INSTANCE_CLASS),
                DB_INSTANCE_FAMILY,
            ),
            allocated_storage_gb,
            multi_az: props.bool_or("multiAz", true),
        }
    }

    /// Whether the engine is PostgreSQL
    pub fn is_postgres(&self) -> bool {
        self.engine == "postgres"
    }

    /// Engine version pinned for the engine family
    pub fn engine_version(&self) -> &'static str {
        if self.is_postgres() { "15.4" } else { "8.0" }
    }

    /// Listener port for the engine family
    pub fn port(&self) -> u16 {
        if self.is_postgres() { 5432 } else { 3306 }
    }
}

/// Object storage settings for the `storage` module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Object versioning enabled
    pub versioning: bool,
    /// Server-side encryption enabled
    pub encryption: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            versioning: true,
            encryption: true,
        }
    }
}

impl StorageSettings {
    /// Read settings from a property bag
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            versioning: props.bool_or("versioning", true),
            encryption: props.bool_or("encryption", true),
        }
    }
}
