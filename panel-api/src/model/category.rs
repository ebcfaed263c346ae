//! Categorical dimensions of a snapshot and how shares are weighted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::ParseError;

/// Bucket label for entities without a value in the grouped field.
pub const MISSING_CATEGORY: &str = "(Missing)";

/// A categorical field entities can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    #[serde(alias = "hq", alias = "country")]
    HqCountry,
    Sector,
}

impl CategoryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryField::HqCountry => "hq_country",
            CategoryField::Sector => "sector",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hq" | "country" | "hq_country" => Ok(CategoryField::HqCountry),
            "sector" => Ok(CategoryField::Sector),
            _ => Err(ParseError::CategoryField(s.to_string())),
        }
    }
}

/// How a category's share of the index is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// By count of distinct member entities.
    #[default]
    #[serde(alias = "equal")]
    EqualWeighted,
    /// By summed market capitalization.
    #[serde(alias = "cap")]
    CapWeighted,
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weighting::EqualWeighted => f.write_str("equal_weighted"),
            Weighting::CapWeighted => f.write_str("cap_weighted"),
        }
    }
}

impl FromStr for Weighting {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" | "equal_weighted" => Ok(Weighting::EqualWeighted),
            "cap" | "cap_weighted" => Ok(Weighting::CapWeighted),
            _ => Err(ParseError::Weighting(s.to_string())),
        }
    }
}
