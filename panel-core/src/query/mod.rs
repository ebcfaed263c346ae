//! Read-only query surface over a loaded panel.
//!
//! [`QueryFacade`] is what the binaries talk to. Quarter-scoped operations take
//! a fiscal year and an optional fiscal quarter; when the quarter is omitted
//! the latest quarter of that year is used. A selection that matches nothing
//! yields empty or zero-valued results.

use log::debug;
use panel::{
    CategoryCap, CategoryCount, CategoryField, CategoryShare, CategorySharePoint, Concentration,
    EntityKey, EntityMatch, EntityPoint, EntityProfile, QuarterLabel, QuarterValue,
    SnapshotSummary, TurnoverRecord, Weighting, MISSING_CATEGORY,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::metrics;
use crate::panel::{Panel, PanelRow, QuarterSnapshot};
use crate::turnover::{self, TurnoverSeries};

pub mod cache;
pub mod search;

pub use cache::DistributionCache;
pub use search::{EntityDirectory, DEFAULT_SEARCH_LIMIT};

pub const DEFAULT_TOP_N: usize = 10;

/// The rows of one quarter together with its headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotView {
    pub summary: SnapshotSummary,
    /// Sorted by market cap descending (missing last), then entity key.
    pub rows: Vec<PanelRow>,
}

pub struct QueryFacade {
    panel: Arc<Panel>,
    turnover: TurnoverSeries,
    directory: EntityDirectory,
    cache: DistributionCache,
}

impl QueryFacade {
    pub fn new(panel: Arc<Panel>) -> Self {
        let turnover = turnover::track(&panel);
        let directory = EntityDirectory::new(panel.entity_keys().into_iter().map(|key| {
            let name = panel
                .display_name(key.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| key.to_string());
            (key.clone(), name)
        }));
        Self {
            panel,
            turnover,
            directory,
            cache: DistributionCache::new(),
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn list_years(&self) -> Vec<i32> {
        self.panel.years()
    }

    pub fn list_quarters(&self, year: i32) -> Vec<QuarterLabel> {
        self.panel.quarters_in_year(year)
    }

    /// Latest quarter of `year`, if the year has any data.
    pub fn default_quarter(&self, year: i32) -> Option<QuarterLabel> {
        self.panel.quarters_in_year(year).pop()
    }

    /// Resolves a `(year, quarter?)` selection to a label. An explicit quarter
    /// outside `1..=4` resolves to nothing.
    pub fn resolve_quarter(&self, year: i32, quarter: Option<u8>) -> Option<QuarterLabel> {
        match quarter {
            Some(q) => QuarterLabel::new(year, q),
            None => self.default_quarter(year),
        }
    }

    fn snapshot_of(&self, year: i32, quarter: Option<u8>) -> Option<QuarterSnapshot> {
        let label = self.resolve_quarter(year, quarter)?;
        debug!("Resolved {} {:?} to {}", year, quarter, label);
        Some(self.panel.snapshot(&label))
    }

    pub fn snapshot_for(&self, year: i32, quarter: Option<u8>) -> Option<SnapshotView> {
        let label = self.resolve_quarter(year, quarter)?;
        let snapshot = self.panel.snapshot(&label);

        let mut rows: Vec<PanelRow> = self
            .panel
            .filter(label.fiscal_year(), Some(label.fiscal_quarter()))
            .into_iter()
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let by_cap = match (a.row.market_cap, b.row.market_cap) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            by_cap.then_with(|| a.key.cmp(&b.key))
        });

        Some(SnapshotView {
            summary: metrics::summary(&snapshot),
            rows,
        })
    }

    pub fn summary(&self, year: i32, quarter: Option<u8>) -> Option<SnapshotSummary> {
        self.snapshot_of(year, quarter).map(|s| metrics::summary(&s))
    }

    pub fn category_distribution(
        &self,
        year: i32,
        quarter: Option<u8>,
        field: CategoryField,
    ) -> Vec<CategoryCount> {
        self.snapshot_of(year, quarter)
            .map(|s| metrics::category_distribution(&s, field))
            .unwrap_or_default()
    }

    pub fn cap_weighted_distribution(
        &self,
        year: i32,
        quarter: Option<u8>,
        field: CategoryField,
    ) -> Vec<CategoryCap> {
        self.snapshot_of(year, quarter)
            .map(|s| metrics::cap_weighted_distribution(&s, field))
            .unwrap_or_default()
    }

    /// Category shares under `weighting`, memoized per quarter.
    ///
    /// Only quarters present in the panel are memoized; any other selection
    /// yields an empty list.
    pub fn distribution(
        &self,
        year: i32,
        quarter: Option<u8>,
        field: CategoryField,
        weighting: Weighting,
    ) -> Arc<Vec<CategoryShare>> {
        let Some(label) = self.resolve_quarter(year, quarter) else {
            return Arc::new(Vec::new());
        };
        if self.panel.quarters().binary_search(&label).is_err() {
            return Arc::new(Vec::new());
        }
        self.cache.get_or_compute(&label, field, weighting, || {
            metrics::weighted_shares(&self.panel.snapshot(&label), field, weighting)
        })
    }

    pub fn top_n_share(
        &self,
        year: i32,
        quarter: Option<u8>,
        field: CategoryField,
        weighting: Weighting,
        n: usize,
    ) -> Vec<CategoryShare> {
        self.distribution(year, quarter, field, weighting)
            .iter()
            .filter(|s| s.category != MISSING_CATEGORY)
            .take(n)
            .cloned()
            .collect()
    }

    pub fn concentration(&self, year: i32, quarter: Option<u8>, n: usize) -> Option<Concentration> {
        self.snapshot_of(year, quarter)
            .map(|s| metrics::concentration(&s, n))
    }

    pub fn concentration_top_n(&self, year: i32, quarter: Option<u8>, n: usize) -> f64 {
        self.snapshot_of(year, quarter)
            .map(|s| metrics::concentration_top_n(&s, n))
            .unwrap_or(0.0)
    }

    pub fn hhi(&self, year: i32, quarter: Option<u8>) -> f64 {
        self.snapshot_of(year, quarter)
            .map(|s| metrics::hhi(&s))
            .unwrap_or(0.0)
    }

    pub fn turnover_series(&self) -> &[TurnoverRecord] {
        self.turnover.records()
    }

    pub fn average_leaver_tenure(&self, quarter: &QuarterLabel) -> f64 {
        self.turnover.average_leaver_tenure(quarter)
    }

    pub fn top_n_share_series(
        &self,
        field: CategoryField,
        weighting: Weighting,
        n: usize,
    ) -> Vec<CategorySharePoint> {
        metrics::top_n_share_series(&self.panel, field, weighting, n)
    }

    pub fn concentration_series(&self, n: usize) -> Vec<QuarterValue> {
        metrics::concentration_series(&self.panel, n)
    }

    pub fn hhi_series(&self) -> Vec<QuarterValue> {
        metrics::hhi_series(&self.panel)
    }

    pub fn total_market_cap_series(&self) -> Vec<QuarterValue> {
        metrics::total_market_cap_series(&self.panel)
    }

    pub fn distinct_category_series(&self, field: CategoryField) -> Vec<QuarterValue> {
        metrics::distinct_category_series(&self.panel, field)
    }

    pub fn entity_count_series(&self) -> Vec<QuarterValue> {
        metrics::entity_count_series(&self.panel)
    }

    pub fn search_entities(&self, query: &str, limit: usize) -> Vec<EntityMatch> {
        self.directory.search(query, limit)
    }

    /// One point per panel quarter for a known entity; empty for an unknown key.
    ///
    /// Several rows in one quarter collapse to the largest cap and best rank.
    pub fn entity_timeseries(&self, key: &str) -> Vec<EntityPoint> {
        let mut per_quarter: HashMap<&QuarterLabel, (Option<f64>, Option<u32>)> = HashMap::new();
        for r in self.panel.entity_rows(key) {
            let slot = per_quarter.entry(&r.quarter).or_insert((None, None));
            slot.0 = match (slot.0, r.row.market_cap) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
            slot.1 = match (slot.1, r.row.rank) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }
        if per_quarter.is_empty() {
            return Vec::new();
        }

        self.panel
            .quarters()
            .iter()
            .map(|q| match per_quarter.get(q) {
                Some(&(market_cap, rank)) => EntityPoint {
                    quarter: q.clone(),
                    present: true,
                    market_cap,
                    rank,
                },
                None => EntityPoint {
                    quarter: q.clone(),
                    present: false,
                    market_cap: None,
                    rank: None,
                },
            })
            .collect()
    }

    pub fn entity_profile(&self, key: &str) -> Option<EntityProfile> {
        let rows: Vec<&PanelRow> = self.panel.entity_rows(key).collect();
        if rows.is_empty() {
            return None;
        }

        let mut quarters: Vec<&QuarterLabel> = rows.iter().map(|r| &r.quarter).collect();
        quarters.sort();
        quarters.dedup();

        let hq_country = most_common(rows.iter().map(|r| r.row.hq_country.as_deref()))
            .or_else(|| most_common(rows.iter().map(|r| r.row.hq_code.as_deref())));
        let sector = most_common(rows.iter().map(|r| r.row.sector.as_deref()))
            .or_else(|| most_common(rows.iter().map(|r| r.row.sector_code.as_deref())));

        Some(EntityProfile {
            key: EntityKey::new(key),
            name: self
                .panel
                .display_name(key)
                .unwrap_or(key)
                .to_string(),
            quarters_present: quarters.len(),
            years_in_index: quarters.len() as f64 / 4.0,
            best_rank: rows.iter().filter_map(|r| r.row.rank).min(),
            hq_country,
            sector,
            first_quarter: quarters.first().map(|q| (*q).clone()),
            last_quarter: quarters.last().map(|q| (*q).clone()),
        })
    }
}

/// Most frequent non-missing value; ties go to the lexicographically smallest.
fn most_common<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (value, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((value, n)),
        })
        .map(|(value, _)| value.to_string())
}
