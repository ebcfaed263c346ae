//! The raw input unit of the panel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier columns a row may carry, in resolution priority order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifiers {
    /// Primary identifier (e.g. a RIC).
    pub firm_id: Option<String>,
    /// Secondary, ISIN-like identifier.
    pub isin: Option<String>,
}

/// One index constituent on one formation date.
///
/// Only `as_of_date` is mandatory; rows whose date could not be parsed never
/// become a `ConstituentRow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituentRow {
    pub as_of_date: NaiveDate,
    #[serde(default)]
    pub identifiers: Identifiers,
    pub name: Option<String>,
    pub hq_country: Option<String>,
    pub hq_code: Option<String>,
    pub sector: Option<String>,
    pub sector_code: Option<String>,
    /// Market capitalization, finite and non-negative when present.
    pub market_cap: Option<f64>,
    /// Rank by market cap, 1 = largest. Never 0.
    pub rank: Option<u32>,
}

impl ConstituentRow {
    pub fn new(as_of_date: NaiveDate) -> Self {
        Self {
            as_of_date,
            identifiers: Identifiers::default(),
            name: None,
            hq_country: None,
            hq_code: None,
            sector: None,
            sector_code: None,
            market_cap: None,
            rank: None,
        }
    }

    pub fn with_firm_id(mut self, firm_id: impl Into<String>) -> Self {
        self.identifiers.firm_id = Some(firm_id.into());
        self
    }

    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.identifiers.isin = Some(isin.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_hq(mut self, country: impl Into<String>, code: impl Into<String>) -> Self {
        self.hq_country = Some(country.into());
        self.hq_code = Some(code.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}
