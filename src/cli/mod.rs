//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::errors::DomainError;

pub use output::{create_spinner, ConsoleNotifier, ProgressBarExt};

#[derive(Parser, Debug)]
#[command(name = "voxdesk", version, about = "Manage AI voice-call agents")]
pub struct Cli {
    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of .voxdesk/config.yaml and .voxdesk/local.yaml
    #[arg(long, global = true, env = "VOXDESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage agents
    Agent(commands::agent::AgentArgs),
}

/// Print `err` for humans or as JSON and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let mut body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        if let Some(details) = err
            .downcast_ref::<DomainError>()
            .and_then(DomainError::as_api)
            .and_then(|api| api.details())
        {
            body["details"] = serde_json::Value::String(details.to_string());
        }
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
