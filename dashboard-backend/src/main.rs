mod config;
mod routes;

use anyhow::Context;
use clap::Parser;
use crate::config::ServerConfig;
use log::info;
use panel_core::{PanelArgs, QueryFacade};
use routes::AppState;
use std::path::PathBuf;
use std::sync::Arc;

/// HTTP dashboard over a quarterly constituents panel.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional TOML settings file
    #[arg(long, default_value = "dashboard.toml")]
    config: PathBuf,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Log filter (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,

    #[command(flatten)]
    panel: PanelArgs,
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(path) = self.panel.data_file() {
            config.data_file = path.to_path_buf();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ServerConfig::load(&cli.config)
        .with_context(|| format!("Failed to read settings from {}", cli.config.display()))?;
    cli.apply(&mut config);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    info!("=== Dashboard Backend Starting ===");

    // 1. Load Panel
    let panel = cli
        .panel
        .load(&config.data_file)
        .with_context(|| format!("Failed to load panel from {}", config.data_file.display()))?;
    let facade = Arc::new(QueryFacade::new(Arc::new(panel)));

    let state = AppState {
        facade,
        search_limit: config.search_limit,
    };

    // 2. Setup Routes
    let app = routes::router(state);

    let addr = config.bind_addr();
    info!("Dashboard Backend listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
