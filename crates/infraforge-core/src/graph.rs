//! Infrastructure graph model
//!
//! A graph is a list of [`Node`]s (requested infrastructure elements) and
//! [`Connection`]s (declared relationships), plus an open requirements map.
//! Graphs are authored by the editor or by hand and loaded from YAML or JSON.
//!
//! # Example
//!
//! ```yaml
//! nodes:
//!   - id: web
//!     component: asg
//!     properties:
//!       instanceType: large
//!       minSize: 2
//!   - id: db
//!     component: rds
//! connections:
//!   - id: web-db
//!     source: web
//!     target: db
//!     type: data-flow
//! requirements:
//!   environment: staging
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Environment used when the requirements map does not name one
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Component kind of a node
///
/// Deserialized from the plain component string. Strings that match no
/// supported kind become [`ComponentKind::Other`] and keep their spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    /// Virtual private cloud
    Vpc,
    /// Application load balancer
    Alb,
    /// NAT gateway
    Nat,
    /// Single compute instance
    Ec2,
    /// Auto-scaling group of compute instances
    Asg,
    /// Managed relational database
    Rds,
    /// Object storage bucket
    S3,
    /// Anything else; contributes nothing to modules or cost
    Other(String),
}

impl ComponentKind {
    /// Canonical component string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vpc => "vpc",
            Self::Alb => "alb",
            Self::Nat => "nat",
            Self::Ec2 => "ec2",
            Self::Asg => "asg",
            Self::Rds => "rds",
            Self::S3 => "s3",
            Self::Other(s) => s,
        }
    }

    /// Whether this kind runs application compute
    pub fn is_compute(&self) -> bool {
        matches!(self, Self::Ec2 | Self::Asg)
    }

    /// Whether this kind is one the engine understands
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ComponentKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "vpc" => Self::Vpc,
            "alb" => Self::Alb,
            "nat" => Self::Nat,
            "ec2" => Self::Ec2,
            "asg" => Self::Asg,
            "rds" => Self::Rds,
            "s3" => Self::S3,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ComponentKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open key → value property bag attached to a node
///
/// Every property is optional. The typed accessors return the supplied
/// default when a key is absent or holds a value of the wrong type, so
/// callers express each default exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, Value>);

impl Properties {
    /// Create an empty property bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access to a property value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a property value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Number of properties present
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a non-blank string, or `default`
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
            _ => default,
        }
    }

    /// Read a non-negative integer that fits in `u32`, or `default`
    ///
    /// Integral floats such as `2.0` are accepted; strings are not.
    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        let Some(Value::Number(n)) = self.0.get(key) else {
            return default;
        };
        if let Some(v) = n.as_u64() {
            return u32::try_from(v).unwrap_or(default);
        }
        match n.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => f as u32,
            _ => default,
        }
    }

    /// Read a boolean, or `default`
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One requested infrastructure element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier (unique within a graph)
    pub id: String,

    /// Component kind
    #[serde(default = "unnamed_component", deserialize_with = "lenient_component")]
    pub component: ComponentKind,

    /// Provider-specific properties
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: Properties,
}

impl Node {
    /// Create a node with no properties
    pub fn new(id: impl Into<String>, component: impl Into<ComponentKind>) -> Self {
        Self {
            id: id.into(),
            component: component.into(),
            properties: Properties::new(),
        }
    }

    /// Set a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }
}

fn unnamed_component() -> ComponentKind {
    ComponentKind::Other(String::new())
}

/// Missing, `null` or non-string components become an unnamed `Other` kind.
fn lenient_component<'de, D>(deserializer: D) -> std::result::Result<ComponentKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => ComponentKind::from(s),
        _ => unnamed_component(),
    })
}

/// `null` or non-object property payloads are treated as an empty bag.
fn lenient_properties<'de, D>(deserializer: D) -> std::result::Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map.into_iter().collect(),
        _ => Properties::new(),
    })
}

/// A declared relationship between two nodes
///
/// Connections are carried through synthesis unchanged; module wiring is
/// derived from the kinds present, not from these edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection identifier
    pub id: String,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Relationship kind (network, dependency, data-flow, ...)
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Optional edge properties (protocol, port, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

/// An infrastructure graph together with its requirements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Requested infrastructure elements
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Declared relationships
    #[serde(default)]
    pub connections: Vec<Connection>,

    /// Open requirements map (`environment`, `traffic`, ...)
    #[serde(default)]
    pub requirements: BTreeMap<String, Value>,
}

/// Input to synthesis: nodes, connections, and requirements
pub type SynthesisRequest = Graph;

impl Graph {
    /// Create a graph from a node list
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    /// Load a graph from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::GraphNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let graph = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        Ok(graph)
    }

    /// Target environment from the requirements, defaulting to `production`
    pub fn environment(&self) -> &str {
        match self.requirements.get("environment") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
            _ => DEFAULT_ENVIRONMENT,
        }
    }

    /// Override the `environment` requirement
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.requirements
            .insert("environment".to_string(), Value::String(environment.into()));
        self
    }

    /// Nodes of a given kind, in input order
    pub fn nodes_of<'a>(&'a self, kind: &'a ComponentKind) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| &n.component == kind)
    }
}
