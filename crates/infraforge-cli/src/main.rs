//! InfraForge CLI
//!
//! Developer tool for turning infrastructure graphs into Terraform bundles
//! and monthly cost estimates.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// InfraForge - infrastructure graphs to Terraform
#[derive(Parser)]
#[command(name = "infraforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file or project directory
    #[arg(short, long, default_value = "infraforge.yaml", env = "INFRAFORGE_CONFIG")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new InfraForge project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Synthesize a Terraform bundle from a graph
    Synthesize {
        /// Graph file (.yaml, .yml or .json)
        graph: String,

        /// Output directory (defaults to `output_dir` from the configuration)
        #[arg(short, long)]
        output: Option<String>,

        /// Target environment (overrides the graph's requirements)
        #[arg(short, long)]
        environment: Option<String>,

        /// Configuration profile to use (e.g., dev, prod)
        #[arg(short, long)]
        profile: Option<String>,

        /// Print the bundle as JSON instead of writing files
        #[arg(long)]
        json: bool,
    },

    /// Estimate the monthly cost of a graph
    Estimate {
        /// Graph file (.yaml, .yml or .json)
        graph: String,

        /// Configuration profile to use (e.g., dev, prod)
        #[arg(short, long)]
        profile: Option<String>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a graph and report advisories without writing anything
    Validate {
        /// Graph file (.yaml, .yml or .json)
        graph: String,

        /// Configuration profile to use (e.g., dev, prod)
        #[arg(short, long)]
        profile: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref())?;
        }
        Commands::Synthesize {
            graph,
            output,
            environment,
            profile,
            json,
        } => {
            commands::synthesize::run(
                &cli.config,
                &graph,
                output.as_deref(),
                environment.as_deref(),
                profile.as_deref(),
                json,
            )?;
        }
        Commands::Estimate {
            graph,
            profile,
            json,
        } => {
            commands::estimate::run(&cli.config, &graph, profile.as_deref(), json)?;
        }
        Commands::Validate { graph, profile } => {
            commands::validate::run(&cli.config, &graph, profile.as_deref())?;
        }
    }

    Ok(())
}
