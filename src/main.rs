//! # Keystone Workloads
//!
//! Renders the workloads the Keystone operator would submit for a `KeystoneAPI`
//! resource, without talking to a cluster.
//!
//! ## Usage
//!
//! ```bash
//! # Render every workload
//! keystone-workloads render --file keystoneapi.yaml
//!
//! # Render the bootstrap job with the endpoints exposed so far
//! keystone-workloads render --file keystoneapi.yaml --workload bootstrap \
//!     --endpoint public=https://keystone-public.example.com \
//!     --endpoint internal=http://keystone-internal.openstack.svc:5000
//!
//! # Print the CRD
//! keystone-workloads crd | kubectl apply -f -
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kube::core::CustomResourceExt;
use tracing::info;

use keystone_workloads::config::{BuilderConfig, OutputFormat};
use keystone_workloads::crd::KeystoneAPI;
use keystone_workloads::observability::logging;
use keystone_workloads::render::{
    load_keystone, parse_endpoint, parse_key_value, render, RenderInputs, WorkloadSelection,
};

/// Keystone workload renderer
#[derive(Parser)]
#[command(name = "keystone-workloads")]
#[command(
    about = "Render the Keystone bootstrap, db-sync and trust flush workloads",
    long_about = None,
    version = env!("BUILD_GIT_HASH")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render workloads for a KeystoneAPI manifest
    Render {
        /// Path to the KeystoneAPI manifest
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Workloads to render
        #[arg(short, long, value_enum, default_value = "all")]
        workload: WorkloadSelection,

        /// Exposed endpoint, as class=url (admin, internal, public)
        #[arg(short, long, value_name = "CLASS=URL")]
        endpoint: Vec<String>,

        /// Label added to every generated object, as key=value
        #[arg(short, long, value_name = "KEY=VALUE")]
        label: Vec<String>,

        /// Annotation added to every generated object, as key=value
        #[arg(short, long, value_name = "KEY=VALUE")]
        annotation: Vec<String>,

        /// Output format (defaults to OUTPUT_FORMAT or yaml)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },
    /// Print the KeystoneAPI CustomResourceDefinition
    Crd,
}

fn main() -> Result<()> {
    let config = BuilderConfig::from_env();
    logging::init(&config);

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            file,
            workload,
            endpoint,
            label,
            annotation,
            output,
        } => {
            info!(
                "Build info: datetime={}, git_hash={}",
                env!("BUILD_DATETIME"),
                env!("BUILD_GIT_HASH")
            );

            let manifest = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let keystone = load_keystone(&manifest)
                .with_context(|| format!("Invalid manifest {}", file.display()))?;

            let inputs = RenderInputs {
                labels: label
                    .iter()
                    .map(|l| parse_key_value(l))
                    .collect::<Result<_>>()
                    .context("Invalid --label")?,
                annotations: annotation
                    .iter()
                    .map(|a| parse_key_value(a))
                    .collect::<Result<_>>()
                    .context("Invalid --annotation")?,
                endpoints: endpoint
                    .iter()
                    .map(|e| parse_endpoint(e))
                    .collect::<Result<_>>()
                    .context("Invalid --endpoint")?,
            };

            let format = output.unwrap_or(config.output_format);
            print!("{}", render(&keystone, &inputs, workload, format)?);
        }
        Commands::Crd => {
            let crd = serde_yaml::to_string(&KeystoneAPI::crd())
                .context("Failed to serialize CRD to YAML")?;
            print!("{crd}");
        }
    }

    Ok(())
}
