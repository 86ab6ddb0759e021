use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prism_config::PrismConfig;

/// Top-level CLI parser for the `prism` binary.
#[derive(Debug, Parser)]
#[command(
    name = "prism",
    version,
    about = "Prism - Power BI embedding and model predictions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load the model registry and serve HTTP.
    Serve(ServeArgs),
    /// Load the model registry and print it as JSON.
    Models(ModelsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Model artifact root (overrides models.root)
    #[arg(long)]
    pub models: Option<PathBuf>,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut PrismConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(root) = &self.models {
            config.models.root.clone_from(root);
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct ModelsArgs {
    /// Model artifact root (overrides models.root)
    #[arg(long)]
    pub models: Option<PathBuf>,
}

impl ModelsArgs {
    pub fn apply(&self, config: &mut PrismConfig) {
        if let Some(root) = &self.models {
            config.models.root.clone_from(root);
        }
    }
}
