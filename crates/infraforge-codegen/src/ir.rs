//! Intermediate representation for synthesis
//!
//! The IR sits between the raw graph and the emitted text: it records which
//! modules a graph needs and the settings each module is rendered with.

use infraforge_core::resources::{ComputeSettings, DatabaseSettings, StorageSettings, VpcSettings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of modules the engine can emit
///
/// Declaration order is dependency order: a module may only consume outputs
/// of modules declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Network foundation
    Vpc,
    /// Application load balancer
    Alb,
    /// Instances behind an auto-scaling group
    Compute,
    /// Managed relational database
    Database,
    /// Object storage bucket
    Storage,
}

impl ModuleKind {
    /// All kinds in dependency order
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Vpc,
        ModuleKind::Alb,
        ModuleKind::Compute,
        ModuleKind::Database,
        ModuleKind::Storage,
    ];

    /// Module name as used in `module "<name>"` blocks
    pub fn name(self) -> &'static str {
        match self {
            ModuleKind::Vpc => "vpc",
            ModuleKind::Alb => "alb",
            ModuleKind::Compute => "compute",
            ModuleKind::Database => "database",
            ModuleKind::Storage => "storage",
        }
    }

    /// Path of the module relative to the bundle root
    pub fn path(self) -> String {
        format!("modules/{}", self.name())
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A module together with the settings it is rendered with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "lowercase")]
pub enum ModuleSpec {
    /// Network foundation
    Vpc(VpcSettings),
    /// Load balancer (no parameters beyond naming)
    Alb,
    /// Compute tier
    Compute(ComputeSettings),
    /// Database tier
    Database(DatabaseSettings),
    /// Object storage
    Storage(StorageSettings),
}

impl ModuleSpec {
    /// Kind of this module
    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleSpec::Vpc(_) => ModuleKind::Vpc,
            ModuleSpec::Alb => ModuleKind::Alb,
            ModuleSpec::Compute(_) => ModuleKind::Compute,
            ModuleSpec::Database(_) => ModuleKind::Database,
            ModuleSpec::Storage(_) => ModuleKind::Storage,
        }
    }
}

/// Modules required by a graph, always in dependency order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredModules {
    modules: Vec<ModuleSpec>,
}

impl RequiredModules {
    /// Build from specs in any order; the result is sorted by kind
    pub fn new(mut modules: Vec<ModuleSpec>) -> Self {
        modules.sort_by_key(ModuleSpec::kind);
        modules.dedup_by_key(|m| m.kind());
        Self { modules }
    }

    /// Module specs in dependency order
    pub fn specs(&self) -> &[ModuleSpec] {
        &self.modules
    }

    /// Module kinds in dependency order
    pub fn kinds(&self) -> Vec<ModuleKind> {
        self.modules.iter().map(ModuleSpec::kind).collect()
    }

    /// Whether a module is required
    pub fn contains(&self, kind: ModuleKind) -> bool {
        self.modules.iter().any(|m| m.kind() == kind)
    }

    /// Settings of the vpc module, if required
    pub fn vpc(&self) -> Option<&VpcSettings> {
        self.modules.iter().find_map(|m| match m {
            ModuleSpec::Vpc(settings) => Some(settings),
            _ => None,
        })
    }

    /// Settings of the compute module, if required
    pub fn compute(&self) -> Option<&ComputeSettings> {
        self.modules.iter().find_map(|m| match m {
            ModuleSpec::Compute(settings) => Some(settings),
            _ => None,
        })
    }

    /// Settings of the database module, if required
    pub fn database(&self) -> Option<&DatabaseSettings> {
        self.modules.iter().find_map(|m| match m {
            ModuleSpec::Database(settings) => Some(settings),
            _ => None,
        })
    }

    /// Number of required modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is required
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
