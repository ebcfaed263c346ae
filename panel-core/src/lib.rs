//! # Panel Core Library
//!
//! Point-in-time analytics over a quarterly panel of equity-index
//! constituents.
//!
//! ## Modules
//! - `calendar`: Fiscal quarter labels under the December roll-forward rule.
//! - `schema`: Column resolution and row normalization.
//! - `identity`: Stable entity keys from heterogeneous identifiers.
//! - `fs`: Reading CSV and JSON tables into a `Panel`.
//! - `panel`: The immutable panel store and per-quarter snapshots.
//! - `metrics`: Category distributions, concentration and HHI.
//! - `turnover`: Joiners, leavers and tenure.
//! - `query`: The read-only façade used by the binaries.
//! - `args`: Command-line arguments shared by the binaries.

pub mod args;
pub mod calendar;
pub mod error;
pub mod fs;
pub mod identity;
pub mod metrics;
pub mod panel;
pub mod query;
pub mod schema;
pub mod turnover;

pub use args::PanelArgs;
pub use error::{PanelError, Result};
pub use fs::{load_panel, SourceFormat};
pub use identity::IdentityResolver;
pub use self::panel::{LoadStats, Panel, QuarterSnapshot};
pub use query::{QueryFacade, SnapshotView};
