//! medsync entry point.

mod app;
mod config;
mod girder_adapter;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Mirror local research files into a Girder folder tree")]
struct Cli {
    /// Configuration file (default: $MEDSYNC_CONFIG or medsync.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: app::Command,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let path = config::config_path(cli.config);
    let config = config::Config::load(&path)?;
    tracing::debug!(path = %path.display(), "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    let code = rt.block_on(app::run(cli.command, config))?;
    Ok(code)
}
