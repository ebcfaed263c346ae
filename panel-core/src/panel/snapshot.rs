//! Per-quarter views of the panel.

use panel::{CategoryField, ConstituentRow, EntityKey, QuarterLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::FieldPresence;

/// One entity (or one unidentifiable row) within a quarter.
///
/// When an entity has several rows in the same quarter they are merged: the
/// largest market cap, the best (lowest) rank and the first non-missing
/// categorical values win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMember {
    pub key: EntityKey,
    pub name: Option<String>,
    pub hq_country: Option<String>,
    pub hq_code: Option<String>,
    pub sector: Option<String>,
    pub sector_code: Option<String>,
    pub market_cap: Option<f64>,
    pub rank: Option<u32>,
    pub n_rows: usize,
}

impl SnapshotMember {
    /// The member's value for a categorical field, if any.
    pub fn category(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::HqCountry => self.hq_country.as_deref(),
            CategoryField::Sector => self.sector.as_deref(),
        }
    }

    fn from_row(key: EntityKey, row: &ConstituentRow) -> Self {
        Self {
            key,
            name: row.name.clone(),
            hq_country: row.hq_country.clone(),
            hq_code: row.hq_code.clone(),
            sector: row.sector.clone(),
            sector_code: row.sector_code.clone(),
            market_cap: row.market_cap,
            rank: row.rank,
            n_rows: 1,
        }
    }

    fn merge(&mut self, row: &ConstituentRow) {
        fn fill(slot: &mut Option<String>, value: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }
        fill(&mut self.name, &row.name);
        fill(&mut self.hq_country, &row.hq_country);
        fill(&mut self.hq_code, &row.hq_code);
        fill(&mut self.sector, &row.sector);
        fill(&mut self.sector_code, &row.sector_code);

        self.market_cap = match (self.market_cap, row.market_cap) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.rank = match (self.rank, row.rank) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.n_rows += 1;
    }
}

/// The constituents of one fiscal quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterSnapshot {
    quarter: QuarterLabel,
    /// Identified entities, sorted by key.
    members: Vec<SnapshotMember>,
    /// One entry per row that resolved to the empty key.
    unidentified: Vec<SnapshotMember>,
    presence: FieldPresence,
}

impl QuarterSnapshot {
    pub fn empty(quarter: QuarterLabel, presence: FieldPresence) -> Self {
        Self {
            quarter,
            members: Vec::new(),
            unidentified: Vec::new(),
            presence,
        }
    }

    /// Builds a snapshot from `(key, row)` pairs that all belong to `quarter`.
    pub fn from_rows<'a, I>(quarter: QuarterLabel, presence: FieldPresence, rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a EntityKey, &'a ConstituentRow)>,
    {
        let mut members: BTreeMap<EntityKey, SnapshotMember> = BTreeMap::new();
        let mut unidentified = Vec::new();

        for (key, row) in rows {
            if key.is_empty() {
                unidentified.push(SnapshotMember::from_row(EntityKey::empty(), row));
                continue;
            }
            members
                .entry(key.clone())
                .and_modify(|m| m.merge(row))
                .or_insert_with(|| SnapshotMember::from_row(key.clone(), row));
        }

        Self {
            quarter,
            members: members.into_values().collect(),
            unidentified,
            presence,
        }
    }

    pub fn quarter(&self) -> &QuarterLabel {
        &self.quarter
    }

    pub fn presence(&self) -> FieldPresence {
        self.presence
    }

    pub fn members(&self) -> &[SnapshotMember] {
        &self.members
    }

    pub fn unidentified(&self) -> &[SnapshotMember] {
        &self.unidentified
    }

    pub fn member(&self, key: &str) -> Option<&SnapshotMember> {
        self.members
            .binary_search_by(|m| m.key.as_str().cmp(key))
            .ok()
            .map(|idx| &self.members[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.member(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.members.iter().map(|m| &m.key)
    }

    /// Number of distinct identified entities.
    pub fn n_entities(&self) -> usize {
        self.members.len()
    }

    /// Number of source rows, identified or not.
    pub fn n_rows(&self) -> usize {
        self.members.iter().map(|m| m.n_rows).sum::<usize>() + self.unidentified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.unidentified.is_empty()
    }

    /// Total cap of identified entities, one value per entity.
    pub fn identified_market_cap(&self) -> f64 {
        self.members.iter().filter_map(|m| m.market_cap).sum()
    }

    /// Total cap of the quarter, including unidentifiable rows.
    pub fn total_market_cap(&self) -> f64 {
        self.identified_market_cap()
            + self
                .unidentified
                .iter()
                .filter_map(|m| m.market_cap)
                .sum::<f64>()
    }
}
