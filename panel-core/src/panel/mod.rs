//! The immutable panel store.
//!
//! A [`Panel`] owns every normalized row together with its quarter label and
//! entity key, plus two indices (by quarter, by entity). It is built once and
//! never mutated; reloading means building a new one.

use log::{info, warn};
use panel::{ConstituentRow, EntityKey, QuarterLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::{labels_for, quarter_label};
use crate::identity::IdentityResolver;
use crate::schema::FieldPresence;

pub mod snapshot;

pub use snapshot::{QuarterSnapshot, SnapshotMember};

/// A normalized row annotated with its derived quarter and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    pub row: ConstituentRow,
    pub quarter: QuarterLabel,
    pub key: EntityKey,
}

/// Row accounting of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Records read from the source, including rejected ones.
    pub rows_read: usize,
    /// Records dropped for a missing or unparseable date, or undecodable.
    pub rows_rejected: usize,
    /// Accepted rows that resolved to the empty key.
    pub rows_unidentified: usize,
}

#[derive(Debug)]
pub struct Panel {
    rows: Vec<PanelRow>,
    quarters: Vec<QuarterLabel>,
    by_quarter: HashMap<QuarterLabel, Vec<usize>>,
    by_entity: HashMap<EntityKey, Vec<usize>>,
    presence: FieldPresence,
    stats: LoadStats,
}

impl Panel {
    /// Builds a panel from normalized rows.
    ///
    /// # Arguments
    ///
    /// * `rows` - Rows in source order.
    /// * `presence` - Fields the source table carries.
    /// * `resolver` - Identity chain applied to every row.
    /// * `rejected` - Source records dropped before normalization.
    pub fn new(
        rows: Vec<ConstituentRow>,
        presence: FieldPresence,
        resolver: &IdentityResolver,
        rejected: usize,
    ) -> Self {
        let quarters = labels_for(rows.iter().map(|r| r.as_of_date));

        let mut by_quarter: HashMap<QuarterLabel, Vec<usize>> = HashMap::new();
        let mut by_entity: HashMap<EntityKey, Vec<usize>> = HashMap::new();
        let mut unidentified = 0;

        let rows: Vec<PanelRow> = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let quarter = quarter_label(row.as_of_date);
                let key = resolver.resolve_key(&row);
                by_quarter.entry(quarter.clone()).or_default().push(idx);
                if key.is_empty() {
                    unidentified += 1;
                } else {
                    by_entity.entry(key.clone()).or_default().push(idx);
                }
                PanelRow { row, quarter, key }
            })
            .collect();

        let stats = LoadStats {
            rows_read: rows.len() + rejected,
            rows_rejected: rejected,
            rows_unidentified: unidentified,
        };

        if unidentified > 0 {
            warn!(
                "{} rows could not be identified and are excluded from entity metrics",
                unidentified
            );
        }
        info!(
            "Panel built: {} rows, {} quarters, {} entities ({} rejected)",
            rows.len(),
            quarters.len(),
            by_entity.len(),
            rejected
        );

        Self {
            rows,
            quarters,
            by_quarter,
            by_entity,
            presence,
            stats,
        }
    }

    /// Builds a panel with the standard identity chain, inferring field
    /// presence from the rows themselves.
    pub fn from_rows(rows: Vec<ConstituentRow>) -> Self {
        let presence = FieldPresence::infer(&rows);
        Self::new(rows, presence, &IdentityResolver::default(), 0)
    }

    /// Distinct quarters, chronologically.
    pub fn quarters(&self) -> &[QuarterLabel] {
        &self.quarters
    }

    /// Distinct fiscal years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.quarters.iter().map(|q| q.fiscal_year()).collect();
        years.dedup();
        years
    }

    pub fn quarters_in_year(&self, year: i32) -> Vec<QuarterLabel> {
        self.quarters
            .iter()
            .filter(|q| q.fiscal_year() == year)
            .cloned()
            .collect()
    }

    /// The constituents of one quarter; empty when the quarter is unknown.
    pub fn snapshot(&self, quarter: &QuarterLabel) -> QuarterSnapshot {
        match self.by_quarter.get(quarter) {
            Some(indices) => QuarterSnapshot::from_rows(
                quarter.clone(),
                self.presence,
                indices.iter().map(|&i| (&self.rows[i].key, &self.rows[i].row)),
            ),
            None => QuarterSnapshot::empty(quarter.clone(), self.presence),
        }
    }

    /// All rows of one entity in ascending date order.
    pub fn rows_for_entity(&self, key: &str) -> Vec<&ConstituentRow> {
        let mut rows: Vec<&ConstituentRow> = self
            .by_entity
            .get(key)
            .map(|indices| indices.iter().map(|&i| &self.rows[i].row).collect())
            .unwrap_or_default();
        rows.sort_by_key(|r| r.as_of_date);
        rows
    }

    /// Annotated rows of one entity, in source order.
    pub fn entity_rows(&self, key: &str) -> impl Iterator<Item = &PanelRow> {
        self.by_entity
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.rows[i])
    }

    /// Rows of a fiscal year, optionally narrowed to one fiscal quarter.
    ///
    /// Ordered by quarter, then source order.
    pub fn filter(&self, year: i32, quarter: Option<u8>) -> Vec<&PanelRow> {
        self.quarters
            .iter()
            .filter(|q| q.fiscal_year() == year)
            .filter(|q| quarter.map_or(true, |n| q.fiscal_quarter() == n))
            .filter_map(|q| self.by_quarter.get(q))
            .flatten()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Every identified entity key, sorted.
    pub fn entity_keys(&self) -> Vec<&EntityKey> {
        let mut keys: Vec<&EntityKey> = self.by_entity.keys().collect();
        keys.sort();
        keys
    }

    /// First non-empty name seen for an entity, in date order.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.rows_for_entity(key)
            .into_iter()
            .find_map(|r| r.name.as_deref())
    }

    pub fn presence(&self) -> FieldPresence {
        self.presence
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.by_entity.len()
    }
}

#[cfg(test)]
mod tests;
