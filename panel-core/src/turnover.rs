//! Quarter-over-quarter membership changes and tenure of departing entities.
//!
//! [`TurnoverTracker`] is a forward fold: it is stepped once per quarter in
//! chronological order and carries the active set plus each member's current
//! streak of consecutive quarters.

use log::debug;
use panel::{EntityKey, LeaverTenure, QuarterLabel, TurnoverRecord};
use std::collections::{HashMap, HashSet};

use crate::panel::{Panel, QuarterSnapshot};

#[derive(Debug, Default)]
pub struct TurnoverTracker {
    active: HashSet<EntityKey>,
    tenure: HashMap<EntityKey, u32>,
    started: bool,
}

impl TurnoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the tracker by one quarter.
    ///
    /// The first quarter stepped reports no joiners and no leavers; its members
    /// all start a streak of one.
    pub fn step(&mut self, snapshot: &QuarterSnapshot) -> TurnoverRecord {
        let current: HashSet<EntityKey> = snapshot.keys().cloned().collect();

        let mut joiners: Vec<EntityKey> = Vec::new();
        let mut leavers: Vec<LeaverTenure> = Vec::new();

        if self.started {
            joiners = current.difference(&self.active).cloned().collect();
            leavers = self
                .active
                .difference(&current)
                .map(|key| LeaverTenure {
                    key: key.clone(),
                    tenure_quarters: self.tenure.get(key).copied().unwrap_or(1),
                })
                .collect();
            joiners.sort();
            leavers.sort_by(|a, b| a.key.cmp(&b.key));
        }

        for leaver in &leavers {
            self.tenure.remove(&leaver.key);
        }
        for key in &current {
            *self.tenure.entry(key.clone()).or_insert(0) += 1;
        }
        self.active = current;
        self.started = true;

        let avg_leaver_tenure_quarters = if leavers.is_empty() {
            0.0
        } else {
            leavers.iter().map(|l| l.tenure_quarters as f64).sum::<f64>() / leavers.len() as f64
        };

        debug!(
            "{}: {} joiners, {} leavers",
            snapshot.quarter(),
            joiners.len(),
            leavers.len()
        );

        TurnoverRecord {
            quarter: snapshot.quarter().clone(),
            n_joiners: joiners.len(),
            n_leavers: leavers.len(),
            avg_leaver_tenure_quarters,
            joiners,
            leavers,
        }
    }

    /// Current streak of an active entity, `0` when it is not in the index.
    pub fn tenure_of(&self, key: &str) -> u32 {
        self.tenure.get(key).copied().unwrap_or(0)
    }
}

/// Turnover records for every quarter of a panel, in chronological order.
#[derive(Debug, Clone, Default)]
pub struct TurnoverSeries {
    records: Vec<TurnoverRecord>,
}

impl TurnoverSeries {
    pub fn records(&self) -> &[TurnoverRecord] {
        &self.records
    }

    pub fn get(&self, quarter: &QuarterLabel) -> Option<&TurnoverRecord> {
        self.records
            .binary_search_by(|r| r.quarter.cmp(quarter))
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Mean tenure of the quarter's leavers; `0.0` without leavers or for an
    /// unknown quarter.
    pub fn average_leaver_tenure(&self, quarter: &QuarterLabel) -> f64 {
        self.get(quarter)
            .map(|r| r.avg_leaver_tenure_quarters)
            .unwrap_or(0.0)
    }
}

/// Runs a tracker over the whole panel in a single forward pass.
pub fn track(panel: &Panel) -> TurnoverSeries {
    let mut tracker = TurnoverTracker::new();
    let records = panel
        .quarters()
        .iter()
        .map(|q| tracker.step(&panel.snapshot(q)))
        .collect();
    TurnoverSeries { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use panel::ConstituentRow;

    fn panel_of(quarters: &[&[&str]]) -> Panel {
        // one quarter per calendar year keeps the labels consecutive in order
        let rows = quarters
            .iter()
            .enumerate()
            .flat_map(|(i, keys)| {
                let date = NaiveDate::from_ymd_opt(2001 + i as i32, 3, 31).unwrap();
                keys.iter()
                    .map(move |k| ConstituentRow::new(date).with_firm_id(*k))
            })
            .collect();
        Panel::from_rows(rows)
    }

    fn keys(v: &[EntityKey]) -> Vec<&str> {
        v.iter().map(|k| k.as_str()).collect()
    }

    #[test]
    fn test_joiners_leavers_and_tenure() {
        let panel = panel_of(&[&["A", "B"], &["B", "C"], &["C"]]);
        let series = track(&panel);
        let records = series.records();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].n_joiners, 0);
        assert_eq!(records[0].n_leavers, 0);

        assert_eq!(keys(&records[1].joiners), vec!["C"]);
        assert_eq!(records[1].leavers[0].key.as_str(), "A");
        assert_eq!(records[1].leavers[0].tenure_quarters, 1);

        assert_eq!(records[2].n_joiners, 0);
        assert_eq!(records[2].leavers[0].key.as_str(), "B");
        assert_eq!(records[2].leavers[0].tenure_quarters, 2);
        assert!((series.average_leaver_tenure(&records[2].quarter) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reentry_resets_streak() {
        let panel = panel_of(&[&["A"], &["A"], &[], &["A"], &["B"]]);
        let series = track(&panel);
        // A year without rows yields no label, so A's streak runs across it.
        let records = series.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].n_leavers, 0);
        assert_eq!(records[3].leavers[0].key.as_str(), "A");
        assert_eq!(records[3].leavers[0].tenure_quarters, 3);

        let mut tracker = TurnoverTracker::new();
        let q = |y| QuarterLabel::new(y, 1).unwrap();
        let a = EntityKey::new("A");
        let row = ConstituentRow::new(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        let with_a = QuarterSnapshot::from_rows(q(2001), Default::default(), vec![(&a, &row)]);
        let without_a = QuarterSnapshot::empty(q(2002), Default::default());

        tracker.step(&with_a);
        tracker.step(&with_a);
        assert_eq!(tracker.tenure_of("A"), 2);
        let gone = tracker.step(&without_a);
        assert_eq!(gone.leavers[0].tenure_quarters, 2);
        assert_eq!(tracker.tenure_of("A"), 0);
        let back = tracker.step(&with_a);
        assert_eq!(keys(&back.joiners), vec!["A"]);
        assert_eq!(tracker.tenure_of("A"), 1);
    }

    #[test]
    fn test_unknown_quarter() {
        let series = track(&panel_of(&[&["A"]]));
        let unknown = QuarterLabel::new(1999, 1).unwrap();
        assert!(series.get(&unknown).is_none());
        assert_eq!(series.average_leaver_tenure(&unknown), 0.0);
    }

    #[test]
    fn test_unidentified_rows_ignored() {
        let d = NaiveDate::from_ymd_opt(2001, 3, 31).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2002, 3, 31).unwrap();
        let panel = Panel::from_rows(vec![
            ConstituentRow::new(d).with_firm_id("A"),
            ConstituentRow::new(d).with_market_cap(1.0),
            ConstituentRow::new(d2).with_firm_id("A"),
        ]);
        let series = track(&panel);
        assert!(series.records().iter().all(|r| r.n_joiners == 0 && r.n_leavers == 0));
    }
}
