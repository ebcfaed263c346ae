//! Core data models shared by the analytics engine and its consumers.
//!
//! # Submodules
//! - [`quarter`]: Fiscal quarter labels.
//! - [`constituent`]: The raw input row.
//! - [`entity`]: Entity keys and entity-level records.
//! - [`category`]: Grouping fields and weightings.
//! - [`composition`]: Composition metric records.
//! - [`turnover`]: Turnover records.

use thiserror::Error;

pub mod category;
pub mod composition;
pub mod constituent;
pub mod entity;
pub mod quarter;
pub mod turnover;

pub use category::{CategoryField, Weighting, MISSING_CATEGORY};
pub use constituent::{ConstituentRow, Identifiers};
pub use entity::{EntityKey, EntityMatch, EntityPoint, EntityProfile};
pub use quarter::QuarterLabel;

/// Failure to parse a model value from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid quarter label: {0}")]
    Quarter(String),

    #[error("Unknown category field: {0}")]
    CategoryField(String),

    #[error("Unknown weighting: {0}")]
    Weighting(String),
}
