//! Command-line arguments shared by every binary that loads a panel.
//!
//! Binaries flatten [`PanelArgs`] into their own `clap` parser so the data
//! source is selected the same way everywhere.

use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::{load_panel, SourceFormat};
use crate::panel::Panel;

/// Location and format of the constituents table.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct PanelArgs {
    /// Path to the constituents table (CSV, JSON array or JSON lines)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Format of the table; inferred from the extension when omitted
    #[arg(long, value_enum)]
    format: Option<SourceFormat>,
}

impl PanelArgs {
    pub fn new(data_file: impl Into<PathBuf>, format: Option<SourceFormat>) -> Self {
        Self {
            data_file: Some(data_file.into()),
            format,
        }
    }

    /// Returns the configured data file, if any.
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    pub fn format(&self) -> Option<SourceFormat> {
        self.format
    }

    /// Loads the panel from `data_file`, or from `fallback` when no data file
    /// was given on the command line.
    pub fn load(&self, fallback: &Path) -> Result<Panel> {
        let path = self.data_file.as_deref().unwrap_or(fallback);
        load_panel(path, self.format)
    }
}
