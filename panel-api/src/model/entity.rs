//! Entity identity and entity-level query records.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::model::quarter::QuarterLabel;

/// Stable identity of one company across quarters.
///
/// An empty key marks a row that could not be identified.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key of an unidentifiable row.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for EntityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub key: EntityKey,
    /// Display name, empty when the panel has no name for this entity.
    pub name: String,
}

/// An entity's state in one quarter of the panel.
///
/// `present == false` means the entity was not a constituent that quarter;
/// `market_cap` and `rank` are then always `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPoint {
    pub quarter: QuarterLabel,
    pub present: bool,
    pub market_cap: Option<f64>,
    pub rank: Option<u32>,
}

/// Summary of an entity over its whole history in the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProfile {
    pub key: EntityKey,
    pub name: String,
    pub quarters_present: usize,
    /// `quarters_present / 4`.
    pub years_in_index: f64,
    pub best_rank: Option<u32>,
    pub hq_country: Option<String>,
    pub sector: Option<String>,
    pub first_quarter: Option<QuarterLabel>,
    pub last_quarter: Option<QuarterLabel>,
}
