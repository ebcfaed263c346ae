//! Column schema resolution.
//!
//! Source tables name their columns inconsistently and carry different subsets
//! of the optional fields. The schema is resolved once, when the table is
//! opened, into column indices plus a [`FieldPresence`] flag set. Nothing
//! downstream looks at raw column names again.

use chrono::NaiveDate;
use log::{info, warn};
use panel::{ConstituentRow, Identifiers};
use serde::{Deserialize, Serialize};

use crate::calendar::parse_date;
use crate::error::{PanelError, Result};

const DATE_ALIASES: &[&str] = &["date", "as_of_date", "formation_date"];
const FIRM_ID_ALIASES: &[&str] = &["firm_id", "ric", "id"];
const ISIN_ALIASES: &[&str] = &["isin"];
const NAME_ALIASES: &[&str] = &["name", "company", "company_name"];
const HQ_COUNTRY_ALIASES: &[&str] = &["hq_country", "country"];
const HQ_CODE_ALIASES: &[&str] = &["hq_code", "country_code"];
const SECTOR_ALIASES: &[&str] = &["sector", "trbc_sector"];
const SECTOR_CODE_ALIASES: &[&str] = &["sector_code", "trbc_sector_code"];
const MARKET_CAP_ALIASES: &[&str] = &["market_cap", "mcap_eur", "mcap"];
const RANK_ALIASES: &[&str] = &["rank", "rank_mcap"];

/// Which optional fields the loaded table carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPresence {
    pub firm_id: bool,
    pub isin: bool,
    pub name: bool,
    pub hq_country: bool,
    pub hq_code: bool,
    pub sector: bool,
    pub sector_code: bool,
    pub market_cap: bool,
    pub rank: bool,
}

impl FieldPresence {
    /// Infers presence from already-normalized rows: a field is present when at
    /// least one row has a value for it.
    pub fn infer(rows: &[ConstituentRow]) -> Self {
        let mut presence = Self::default();
        for row in rows {
            presence.firm_id |= row.identifiers.firm_id.is_some();
            presence.isin |= row.identifiers.isin.is_some();
            presence.name |= row.name.is_some();
            presence.hq_country |= row.hq_country.is_some();
            presence.hq_code |= row.hq_code.is_some();
            presence.sector |= row.sector.is_some();
            presence.sector_code |= row.sector_code.is_some();
            presence.market_cap |= row.market_cap.is_some();
            presence.rank |= row.rank.is_some();
        }
        presence
    }
}

/// Outcome of normalizing one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(ConstituentRow),
    /// The date cell was missing or unparseable.
    Rejected,
}

/// Column indices of every known field in a raw table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    date: usize,
    firm_id: Option<usize>,
    isin: Option<usize>,
    name: Option<usize>,
    hq_country: Option<usize>,
    hq_code: Option<usize>,
    sector: Option<usize>,
    sector_code: Option<usize>,
    market_cap: Option<usize>,
    rank: Option<usize>,
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    // Alias order decides between competing columns, not header order.
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias))
    })
}

impl ColumnSchema {
    /// Resolves the schema of a table from its header row.
    ///
    /// # Returns
    ///
    /// * `Ok(ColumnSchema)` when a date column is present.
    /// * `Err(PanelError::SchemaInvalid)` otherwise.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let date = find_column(headers, DATE_ALIASES).ok_or_else(|| {
            PanelError::SchemaInvalid(format!(
                "dataset must contain a date column (one of {:?}), found {:?}",
                DATE_ALIASES, headers
            ))
        })?;

        let schema = Self {
            date,
            firm_id: find_column(headers, FIRM_ID_ALIASES),
            isin: find_column(headers, ISIN_ALIASES),
            name: find_column(headers, NAME_ALIASES),
            hq_country: find_column(headers, HQ_COUNTRY_ALIASES),
            hq_code: find_column(headers, HQ_CODE_ALIASES),
            sector: find_column(headers, SECTOR_ALIASES),
            sector_code: find_column(headers, SECTOR_CODE_ALIASES),
            market_cap: find_column(headers, MARKET_CAP_ALIASES),
            rank: find_column(headers, RANK_ALIASES),
        };

        let presence = schema.presence();
        info!("Resolved schema: {:?}", presence);
        if !presence.firm_id && !presence.isin && !presence.name {
            warn!("No identifier or name column: every row will be unidentifiable");
        }
        Ok(schema)
    }

    /// Fields whose column exists in the table.
    pub fn presence(&self) -> FieldPresence {
        FieldPresence {
            firm_id: self.firm_id.is_some(),
            isin: self.isin.is_some(),
            name: self.name.is_some(),
            hq_country: self.hq_country.is_some(),
            hq_code: self.hq_code.is_some(),
            sector: self.sector.is_some(),
            sector_code: self.sector_code.is_some(),
            market_cap: self.market_cap.is_some(),
            rank: self.rank.is_some(),
        }
    }

    /// Normalizes one raw record into a row.
    ///
    /// `cells` is indexed like the header row; short records read as missing
    /// values.
    pub fn normalize(&self, cells: &[Option<String>]) -> RowOutcome {
        let text = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| cells.get(i))
                .and_then(|c| c.as_deref())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let as_of_date: NaiveDate = match text(Some(self.date)).as_deref().and_then(parse_date) {
            Some(date) => date,
            None => return RowOutcome::Rejected,
        };

        RowOutcome::Accepted(ConstituentRow {
            as_of_date,
            identifiers: Identifiers {
                firm_id: text(self.firm_id),
                isin: text(self.isin),
            },
            name: text(self.name),
            hq_country: text(self.hq_country),
            hq_code: text(self.hq_code),
            sector: text(self.sector),
            sector_code: text(self.sector_code),
            market_cap: text(self.market_cap).as_deref().and_then(parse_market_cap),
            rank: text(self.rank).as_deref().and_then(parse_rank),
        })
    }
}

/// Finite, non-negative numbers only.
fn parse_market_cap(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Positive integers only; accepts integral floats such as `"3.0"`.
fn parse_rank(raw: &str) -> Option<u32> {
    if let Ok(rank) = raw.parse::<i64>() {
        return u32::try_from(rank).ok().filter(|r| *r >= 1);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}
