use clap::{Parser, Subcommand};
use panel::{CategoryField, Weighting};
use panel_core::query::{DEFAULT_SEARCH_LIMIT, DEFAULT_TOP_N};
use panel_core::PanelArgs;

/// Quarterly index-constituent reports on the command line.
#[derive(Parser, Debug)]
#[command(name = "panel-report")]
#[command(about = "Composition and turnover reports over a constituents panel", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub panel: PanelArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available reports. Every report prints JSON to stdout.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List fiscal quarters, optionally for one year.
    Quarters {
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Constituents of a quarter with its headline figures.
    Snapshot {
        #[arg(short, long)]
        year: i32,

        /// Fiscal quarter (1-4); the latest of the year when omitted.
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4))]
        quarter: Option<u8>,
    },
    /// Category distribution of a quarter.
    Distribution {
        #[arg(short, long)]
        year: i32,

        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4))]
        quarter: Option<u8>,

        /// Category field: hq or sector.
        #[arg(short, long)]
        field: CategoryField,

        /// Weighting: equal or cap.
        #[arg(short, long, default_value = "equal")]
        weighting: Weighting,
    },
    /// Top-N cap share and HHI of a quarter.
    Concentration {
        #[arg(short, long)]
        year: i32,

        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4))]
        quarter: Option<u8>,

        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },
    /// Joiners, leavers and leaver tenure for every quarter.
    Turnover,
    /// Find entities by key or name.
    Search {
        #[arg(help = "Case-insensitive key or name fragment")]
        query: String,

        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Profile and quarterly history of one entity.
    Entity {
        #[arg(help = "Entity key as printed by `search`")]
        key: String,
    },
}
