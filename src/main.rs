//! voxdesk CLI entry point.

use anyhow::Context;
use clap::Parser;

use voxdesk::cli::{handle_error, Cli, Commands};
use voxdesk::infrastructure::config::ConfigLoader;
use voxdesk::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli.command, cli.config.as_deref(), cli.json).await;
    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json: bool) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    match command {
        Commands::Agent(args) => voxdesk::cli::commands::agent::execute(args, &config, json).await,
    }
}
