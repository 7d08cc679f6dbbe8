//! Synthesis output
//!
//! A [`Bundle`] holds every emitted document. Its layout on disk is:
//!
//! ```text
//! <dir>/
//! ├── main.tf
//! ├── variables.tf
//! ├── outputs.tf
//! ├── backend.tf
//! └── modules/
//!     └── <name>/main.tf
//! ```

use infraforge_core::{Connection, CostBreakdown};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ir::ModuleKind;

/// One emitted module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name
    pub name: ModuleKind,
    /// Path relative to the bundle root (`modules/<name>`)
    pub path: String,
    /// Terraform source of the module's `main.tf`
    pub content: String,
}

/// Everything produced by one synthesis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Modules in dependency order
    pub modules: Vec<Module>,
    /// `variables.tf`
    pub variables: String,
    /// `outputs.tf`
    pub outputs: String,
    /// `main.tf`
    pub root: String,
    /// `backend.tf`
    pub backend: Option<String>,
    /// Connections from the request, unchanged
    pub connections: Vec<Connection>,
    /// Cost estimate for the request's nodes
    pub estimated_monthly_cost: CostBreakdown,
}

impl Bundle {
    /// Module names in emission order
    pub fn module_names(&self) -> Vec<ModuleKind> {
        self.modules.iter().map(|m| m.name).collect()
    }

    /// Look up an emitted module
    pub fn module(&self, kind: ModuleKind) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == kind)
    }

    /// All files of the bundle as `(relative path, contents)`, in a fixed order
    pub fn files(&self) -> Vec<(PathBuf, &str)> {
        let mut files = vec![
            (PathBuf::from("main.tf"), self.root.as_str()),
            (PathBuf::from("variables.tf"), self.variables.as_str()),
            (PathBuf::from("outputs.tf"), self.outputs.as_str()),
        ];
        if let Some(backend) = &self.backend {
            files.push((PathBuf::from("backend.tf"), backend.as_str()));
        }
        for module in &self.modules {
            files.push((
                Path::new(&module.path).join("main.tf"),
                module.content.as_str(),
            ));
        }
        files
    }

    /// SHA-256 over every emitted file path and body
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for (path, content) in self.files() {
            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(content.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    /// Write the bundle under `dir`, returning the written paths
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::new();

        for (relative, content) in self.files() {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)?;
            written.push(path);
        }

        tracing::debug!(dir = %dir.display(), files = written.len(), "wrote bundle");
        Ok(written)
    }
}
