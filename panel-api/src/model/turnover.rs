//! Turnover records produced once per quarter boundary.

use serde::{Deserialize, Serialize};

use crate::model::{entity::EntityKey, quarter::QuarterLabel};

/// A constituent that left the index, with the streak it had built up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaverTenure {
    pub key: EntityKey,
    pub tenure_quarters: u32,
}

/// Membership changes between the previous quarter and `quarter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverRecord {
    pub quarter: QuarterLabel,
    pub n_joiners: usize,
    pub n_leavers: usize,
    /// Mean tenure of this quarter's leavers, 0.0 without leavers.
    pub avg_leaver_tenure_quarters: f64,
    pub joiners: Vec<EntityKey>,
    pub leavers: Vec<LeaverTenure>,
}
