//! Module template library
//!
//! One template per [`ModuleKind`], each rendering a self-contained
//! Terraform module body plus a static [`ModuleContract`] describing the
//! module's inputs (and where the root module sources them from) and its
//! outputs. Templates are minijinja sources compiled once into an
//! [`Environment`] when the library is built.

pub mod alb;
pub mod compute;
pub mod database;
pub mod storage;
pub mod vpc;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::Result;
use crate::ir::{ModuleKind, ModuleSpec};

pub use alb::AlbTemplate;
pub use compute::ComputeTemplate;
pub use database::DatabaseTemplate;
pub use storage::StorageTemplate;
pub use vpc::VpcTemplate;

/// Where the root module takes a module input from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum InputSource {
    /// A root variable of the same name (`var.<name>`)
    Variable,
    /// Another module's output (`module.<module>.<output>`)
    ModuleOutput {
        /// Producing module
        module: ModuleKind,
        /// Output name on the producer
        output: &'static str,
    },
}

/// A declared module input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInput {
    /// Variable name inside the module
    pub name: &'static str,
    /// Source in the root module
    pub source: InputSource,
    /// Optional inputs default to `null` and are omitted when the producer is absent
    pub required: bool,
}

impl ModuleInput {
    const fn variable(name: &'static str) -> Self {
        Self {
            name,
            source: InputSource::Variable,
            required: true,
        }
    }

    const fn from_module(name: &'static str, module: ModuleKind, output: &'static str) -> Self {
        Self {
            name,
            source: InputSource::ModuleOutput { module, output },
            required: true,
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Declared inputs and outputs of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleContract {
    /// Inputs in declaration order
    pub inputs: &'static [ModuleInput],
    /// Output names in declaration order
    pub outputs: &'static [&'static str],
}

impl ModuleContract {
    /// Whether the module declares an output
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains(&name)
    }
}

const PROJECT_NAME: ModuleInput = ModuleInput::variable("project_name");
const ENVIRONMENT: ModuleInput = ModuleInput::variable("environment");

/// Contract of a module kind
pub fn contract(kind: ModuleKind) -> &'static ModuleContract {
    match kind {
        ModuleKind::Vpc => &VpcTemplate::CONTRACT,
        ModuleKind::Alb => &AlbTemplate::CONTRACT,
        ModuleKind::Compute => &ComputeTemplate::CONTRACT,
        ModuleKind::Database => &DatabaseTemplate::CONTRACT,
        ModuleKind::Storage => &StorageTemplate::CONTRACT,
    }
}

fn source(kind: ModuleKind) -> &'static str {
    match kind {
        ModuleKind::Vpc => VpcTemplate::SOURCE,
        ModuleKind::Alb => AlbTemplate::SOURCE,
        ModuleKind::Compute => ComputeTemplate::SOURCE,
        ModuleKind::Database => DatabaseTemplate::SOURCE,
        ModuleKind::Storage => StorageTemplate::SOURCE,
    }
}

fn template_name(kind: ModuleKind) -> String {
    format!("{}.tf", kind.name())
}

/// Escape a value for use inside an HCL quoted string
pub fn escape_hcl(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace("${", "$${")
        .replace("%{", "%%{")
}

/// A rendered module body
#[derive(Debug, Clone)]
pub struct RenderedModule {
    /// Module kind
    pub kind: ModuleKind,
    /// Terraform source text
    pub text: String,
    /// Declared contract
    pub contract: &'static ModuleContract,
}

/// Compiled module templates
#[derive(Debug)]
pub struct TemplateLibrary {
    env: Environment<'static>,
}

impl TemplateLibrary {
    /// Compile the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("hcl", escape_hcl);

        for kind in ModuleKind::ALL {
            env.add_template_owned(template_name(kind), source(kind))?;
        }

        Ok(Self { env })
    }

    /// Replace the template source of one module kind
    pub fn with_template(mut self, kind: ModuleKind, source: impl Into<String>) -> Result<Self> {
        self.env
            .add_template_owned(template_name(kind), source.into())?;
        Ok(self)
    }

    /// Render a module
    pub fn render(&self, spec: &ModuleSpec) -> Result<RenderedModule> {
        let kind = spec.kind();
        let ctx = match spec {
            ModuleSpec::Vpc(settings) => VpcTemplate::context(settings),
            ModuleSpec::Alb => AlbTemplate::context(),
            ModuleSpec::Compute(settings) => ComputeTemplate::context(settings),
            ModuleSpec::Database(settings) => DatabaseTemplate::context(settings),
            ModuleSpec::Storage(settings) => StorageTemplate::context(settings),
        };

        let text = self.env.get_template(&template_name(kind))?.render(ctx)?;
        tracing::debug!(module = %kind, bytes = text.len(), "rendered module");

        Ok(RenderedModule {
            kind,
            text,
            contract: contract(kind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infraforge_core::resources::{
        ComputeSettings, DatabaseSettings, ScalingMode, StorageSettings, VpcSettings,
    };

    fn all_specs() -> Vec<ModuleSpec> {
        vec![
            ModuleSpec::Vpc(VpcSettings::default()),
            ModuleSpec::Alb,
            ModuleSpec::Compute(ComputeSettings {
                instance_type: "t3.medium".to_string(),
                min_size: 2,
                max_size: 10,
                scaling: ScalingMode::Group,
            }),
            ModuleSpec::Database(DatabaseSettings::default()),
            ModuleSpec::Storage(StorageSettings::default()),
        ]
    }

    #[test]
    fn test_escape_hcl() {
        assert_eq!(escape_hcl(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_hcl(r"C:\tmp"), r"C:\\tmp");
        assert_eq!(escape_hcl("${var.x}"), "$${var.x}");
        assert_eq!(escape_hcl("%{ if }"), "%%{ if }");
        assert_eq!(escape_hcl("plain"), "plain");
    }

    #[test]
    fn test_every_contract_is_declared_in_its_template() {
        let library = TemplateLibrary::new().unwrap();
        for spec in all_specs() {
            let rendered = library.render(&spec).unwrap();
            for input in rendered.contract.inputs {
                let decl = format!("variable \"{}\" {{", input.name);
                assert!(
                    rendered.text.contains(&decl),
                    "{} is missing {decl}",
                    rendered.kind
                );
                if !input.required {
                    assert!(rendered.text.contains("default     = null"));
                }
            }
            for output in rendered.contract.outputs {
                let decl = format!("output \"{output}\" {{");
                assert!(
                    rendered.text.contains(&decl),
                    "{} is missing {decl}",
                    rendered.kind
                );
            }
        }
    }

    #[test]
    fn test_producers_declare_consumed_outputs() {
        for kind in ModuleKind::ALL {
            for input in contract(kind).inputs {
                if let InputSource::ModuleOutput { module, output } = input.source {
                    assert!(module < kind, "{kind} consumes later module {module}");
                    assert!(
                        contract(module).has_output(output),
                        "{module} does not declare {output}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let library = TemplateLibrary::new().unwrap();
        for spec in all_specs() {
            assert_eq!(
                library.render(&spec).unwrap().text,
                library.render(&spec).unwrap().text
            );
        }
    }

    #[test]
    fn test_rendered_text_has_no_template_syntax() {
        let library = TemplateLibrary::new().unwrap();
        for spec in all_specs() {
            let text = library.render(&spec).unwrap().text;
            assert!(!text.contains("{{"));
            assert!(!text.contains("{%"));
            assert!(text.ends_with('\n'));
        }
    }

    #[test]
    fn test_with_template_override() {
        let library = TemplateLibrary::new()
            .unwrap()
            .with_template(ModuleKind::Alb, "# custom alb\n")
            .unwrap();
        let rendered = library.render(&ModuleSpec::Alb).unwrap();
        assert_eq!(rendered.text, "# custom alb\n");
    }

    #[test]
    fn test_with_template_rejects_bad_syntax() {
        let result = TemplateLibrary::new()
            .unwrap()
            .with_template(ModuleKind::Alb, "{% if %}");
        assert!(result.is_err());
    }

    #[test]
    fn test_library_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateLibrary>();
    }
}
