//! Root module composition
//!
//! Produces the four root documents of a bundle: `main.tf` (provider header
//! plus one `module` block per required module), `variables.tf`,
//! `outputs.tf` and `backend.tf`. Module arguments are derived from each
//! module's [`ModuleContract`](crate::templates::ModuleContract): shared
//! inputs become `var.<name>`, cross-module inputs become
//! `module.<producer>.<output>`.

use infraforge_core::resources::VpcSettings;
use std::fmt::Write;

use crate::error::{Error, Result};
use crate::ir::ModuleKind;
use crate::templates::{InputSource, contract, escape_hcl};

/// Region the state bucket lives in, independent of the deployment region
pub const BACKEND_REGION: &str = "us-east-1";

const ROOT_HEADER: &str = r#"terraform {
  required_version = ">= 1.5.0"

  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = "~> 5.0"
    }
  }
}

provider "aws" {
  region = var.aws_region

  default_tags {
    tags = local.common_tags
  }
}

locals {
  common_tags = {
    Environment = var.environment
    Project     = var.project_name
    ManagedBy   = "Terraform"
    CreatedBy   = "InfraForge"
  }
}
"#;

/// Values baked into the root documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSettings {
    /// Project name (variable default and state bucket prefix)
    pub project_name: String,
    /// Deployment region
    pub region: String,
    /// Deployment environment
    pub environment: String,
    /// Network defaults for `vpc_cidr` and `az_count`
    pub vpc: VpcSettings,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            project_name: "infraforge".to_string(),
            region: "us-east-1".to_string(),
            environment: infraforge_core::graph::DEFAULT_ENVIRONMENT.to_string(),
            vpc: VpcSettings::default(),
        }
    }
}

/// The root documents of a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDocuments {
    /// `main.tf`
    pub root: String,
    /// `variables.tf`
    pub variables: String,
    /// `outputs.tf`
    pub outputs: String,
    /// `backend.tf`
    pub backend: String,
}

/// Composes root documents for an ordered module list
#[derive(Debug, Clone, Default)]
pub struct RootComposer {
    settings: RootSettings,
}

impl RootComposer {
    /// Create a composer
    pub fn new(settings: RootSettings) -> Self {
        Self { settings }
    }

    /// Compose root documents for modules given in dependency order
    pub fn compose(&self, modules: &[ModuleKind]) -> Result<RootDocuments> {
        Ok(RootDocuments {
            root: self.root(modules)?,
            variables: self.variables(),
            outputs: Self::outputs(modules),
            backend: self.backend(),
        })
    }

    fn root(&self, modules: &[ModuleKind]) -> Result<String> {
        let mut out = String::from(ROOT_HEADER);

        for (idx, &kind) in modules.iter().enumerate() {
            let args = Self::module_arguments(kind, &modules[..idx], &modules[idx + 1..])?;

            out.push('\n');
            let _ = writeln!(out, "module \"{}\" {{", kind.name());
            let _ = writeln!(out, "  source = \"./{}\"", kind.path());
            out.push('\n');
            push_aligned(&mut out, "  ", &args);
            out.push_str("}\n");
        }

        Ok(out)
    }

    /// Arguments for one module block, checked against what is declared
    /// before and after it
    fn module_arguments(
        kind: ModuleKind,
        before: &[ModuleKind],
        after: &[ModuleKind],
    ) -> Result<Vec<(&'static str, String)>> {
        if before.contains(&kind) || after.contains(&kind) {
            return Err(Error::Wiring {
                module: kind.to_string(),
                message: "module listed more than once".to_string(),
            });
        }

        let mut args = Vec::new();
        for input in contract(kind).inputs {
            match input.source {
                InputSource::Variable => args.push((input.name, format!("var.{}", input.name))),
                InputSource::ModuleOutput { module, output } => {
                    if before.contains(&module) {
                        args.push((input.name, format!("module.{module}.{output}")));
                    } else if after.contains(&module) {
                        return Err(Error::Wiring {
                            module: kind.to_string(),
                            message: format!(
                                "input '{}' depends on module '{module}', which is declared later",
                                input.name
                            ),
                        });
                    } else if input.required {
                        return Err(Error::Wiring {
                            module: kind.to_string(),
                            message: format!(
                                "input '{}' requires module '{module}'",
                                input.name
                            ),
                        });
                    } else {
                        tracing::debug!(
                            module = %kind,
                            input = input.name,
                            producer = %module,
                            "optional input left unset"
                        );
                    }
                }
            }
        }
        Ok(args)
    }

    fn variables(&self) -> String {
        let s = &self.settings;
        let vars = [
            (
                "aws_region",
                "AWS region for all resources",
                "string",
                quoted(&s.region),
            ),
            (
                "project_name",
                "Project name used for resource naming",
                "string",
                quoted(&s.project_name),
            ),
            (
                "environment",
                "Deployment environment",
                "string",
                quoted(&s.environment),
            ),
            (
                "vpc_cidr",
                "CIDR block for the VPC",
                "string",
                quoted(&s.vpc.cidr),
            ),
            (
                "az_count",
                "Number of availability zones",
                "number",
                s.vpc.az_count.to_string(),
            ),
        ];

        let mut out = String::new();
        for (idx, (name, description, ty, default)) in vars.into_iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "variable \"{name}\" {{");
            push_aligned(
                &mut out,
                "  ",
                &[
                    ("description", quoted(description)),
                    ("type", ty.to_string()),
                    ("default", default),
                ],
            );
            out.push_str("}\n");
        }
        out
    }

    fn outputs(modules: &[ModuleKind]) -> String {
        let mut outputs = Vec::new();
        if modules.contains(&ModuleKind::Vpc) {
            outputs.push(("vpc_id", "VPC ID", "module.vpc.vpc_id"));
            outputs.push((
                "private_subnet_ids",
                "Private subnet IDs",
                "module.vpc.private_subnet_ids",
            ));
        }
        if modules.contains(&ModuleKind::Alb) {
            outputs.push((
                "alb_dns_name",
                "Load balancer DNS name",
                "module.alb.alb_dns_name",
            ));
        }

        let mut out = String::new();
        for (idx, (name, description, value)) in outputs.into_iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "output \"{name}\" {{");
            push_aligned(
                &mut out,
                "  ",
                &[
                    ("description", quoted(description)),
                    ("value", value.to_string()),
                ],
            );
            out.push_str("}\n");
        }
        out
    }

    fn backend(&self) -> String {
        let project = escape_hcl(&self.settings.project_name);
        let mut out = String::from("terraform {\n  backend \"s3\" {\n");
        push_aligned(
            &mut out,
            "    ",
            &[
                ("bucket", format!("\"{project}-terraform-state\"")),
                ("key", quoted("terraform.tfstate")),
                ("region", quoted(BACKEND_REGION)),
                ("dynamodb_table", format!("\"{project}-terraform-locks\"")),
                ("encrypt", "true".to_string()),
            ],
        );
        out.push_str("  }\n}\n");
        out
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_hcl(value))
}

/// Write `key = value` lines with the `=` signs aligned, as `terraform fmt` does
fn push_aligned(out: &mut String, indent: &str, pairs: &[(&str, String)]) {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in pairs {
        let _ = writeln!(out, "{indent}{key:<width$} = {value}");
    }
}
