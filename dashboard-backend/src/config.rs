use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use panel_core::query::DEFAULT_SEARCH_LIMIT;

/// Runtime settings of the dashboard server.
///
/// Resolved from, in increasing precedence: built-in defaults, an optional
/// TOML file, `DASHBOARD_*` environment variables and command-line flags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub search_limit: usize,
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            data_file: PathBuf::from("data/constituents.csv"),
        }
    }
}

impl ServerConfig {
    /// Layers the config file (if it exists) and the environment over the
    /// defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix("DASHBOARD"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
