//! Composition metric records.
//!
//! Plain data returned by the metrics and query layers. Every percentage is in
//! the `0..=100` range and every record serializes to a flat mapping.

use serde::{Deserialize, Serialize};

use crate::model::quarter::QuarterLabel;

/// Distinct-entity count of one category within a quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub n_entities: usize,
    pub share_pct: f64,
}

/// Summed market cap of one category within a quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCap {
    pub category: String,
    pub market_cap: f64,
    pub share_pct: f64,
}

/// A category's share under some weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub share_pct: f64,
}

/// A category's share in one quarter of a panel-wide series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySharePoint {
    pub quarter: QuarterLabel,
    pub category: String,
    pub share_pct: f64,
}

/// One point of a scalar per-quarter series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterValue {
    pub quarter: QuarterLabel,
    pub value: f64,
}

/// Headline figures of one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub quarter: QuarterLabel,
    pub n_rows: usize,
    pub n_entities: usize,
    pub n_countries: usize,
    pub n_sectors: usize,
    pub total_market_cap: f64,
}

/// Concentration figures of one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub quarter: QuarterLabel,
    pub top_n: usize,
    pub top_n_share_pct: f64,
    pub hhi: f64,
}
