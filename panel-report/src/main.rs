use clap::Parser;
use log::{error, info};
use panel_core::{PanelError, QueryFacade};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub mod args;
pub mod report;

use args::Cli;

const DEFAULT_DATA_FILE: &str = "data/constituents.csv";

// Define Main CLI Errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Panel error: {0}")]
    Panel(#[from] PanelError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    UnknownEntity(String),
}

fn main() -> Result<(), CliError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let panel = match cli.panel.load(Path::new(DEFAULT_DATA_FILE)) {
        Ok(panel) => panel,
        Err(e) => {
            error!("Loading failed: {}", e);
            return Err(CliError::Panel(e));
        }
    };
    info!("Loaded {} rows", panel.len());
    let facade = QueryFacade::new(Arc::new(panel));

    let value = report::run(&facade, &cli.command)?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
