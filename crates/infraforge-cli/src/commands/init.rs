//! Initialize a new InfraForge project

use anyhow::{Context, Result};
use infraforge_core::config::{CONFIG_FILE, validate_project_name};
use std::fs;
use std::path::Path;

/// Run the init command
pub fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Nothing is created until the name is known to be valid
    let abs_path = if project_dir.exists() {
        project_dir.canonicalize()?
    } else {
        std::path::absolute(project_dir)?
    };

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| {
                s.to_lowercase()
                    .replace(['_', ' ', '.'], "-")
                    .trim_start_matches(|c: char| !c.is_ascii_lowercase())
                    .trim_end_matches('-')
                    .to_string()
            })
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };
    validate_project_name(&project_name).context("Pass a valid name with --name")?;

    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains an {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new InfraForge project: {}", project_name);

    fs::create_dir_all(project_dir.join("graphs"))?;

    let config = format!(
        r#"# InfraForge Project Configuration
name: {project_name}
version: "0.1.0"
region: us-east-1
output_dir: infra

# Unit prices (USD) used for estimates; omitted keys keep their defaults
# pricing:
#   nat_gateway_hourly: 0.045

profiles:
  staging:
    environment: staging
    output_dir: infra/staging
  production:
    environment: production
    output_dir: infra/production
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)?;

    let example_graph = r#"# Example graph: a load-balanced web tier with a database
nodes:
  - id: network
    component: vpc
    properties:
      cidr: 10.0.0.0/16
      azCount: 3

  - id: load-balancer
    component: alb

  - id: web
    component: asg
    properties:
      instanceType: large
      minSize: 2
      maxSize: 6

  - id: database
    component: rds
    properties:
      engine: postgres
      multiAz: false

connections:
  - id: lb-to-web
    source: load-balancer
    target: web
    type: network
  - id: web-to-db
    source: web
    target: database
    type: data-flow

requirements:
  environment: development
"#;
    fs::write(project_dir.join("graphs/example.yaml"), example_graph)?;

    let gitignore = r#"# Terraform working files
.terraform/
*.tfstate
*.tfstate.backup
.terraform.lock.hcl

# IDE
.idea/
.vscode/
*.swp
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  infraforge validate graphs/example.yaml     # Check the graph");
    tracing::info!("  infraforge estimate graphs/example.yaml     # Monthly cost");
    tracing::info!("  infraforge synthesize graphs/example.yaml   # Write Terraform");

    Ok(())
}
