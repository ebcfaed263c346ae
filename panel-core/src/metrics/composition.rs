//! Per-quarter composition metrics.
//!
//! Every function here is total: an empty snapshot, a missing column or a zero
//! total yields an empty list or `0.0`, never a panic or a NaN.

use panel::{
    CategoryCap, CategoryCount, CategoryField, CategoryShare, Concentration, SnapshotSummary,
    Weighting, MISSING_CATEGORY,
};
use std::collections::{HashMap, HashSet};

use crate::panel::{QuarterSnapshot, SnapshotMember};

fn category_of<'a>(member: &'a SnapshotMember, field: CategoryField) -> &'a str {
    member.category(field).unwrap_or(MISSING_CATEGORY)
}

/// Distinct-entity counts per category.
///
/// Entities without a value are bucketed under `"(Missing)"`. Sorted by count
/// descending, then category ascending.
pub fn category_distribution(snapshot: &QuarterSnapshot, field: CategoryField) -> Vec<CategoryCount> {
    let total = snapshot.n_entities();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for member in snapshot.members() {
        *counts.entry(category_of(member, field)).or_default() += 1;
    }

    let mut distribution: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, n_entities)| CategoryCount {
            category: category.to_string(),
            n_entities,
            share_pct: 100.0 * n_entities as f64 / total as f64,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.n_entities
            .cmp(&a.n_entities)
            .then_with(|| a.category.cmp(&b.category))
    });
    distribution
}

/// Summed market cap per category as a share of the quarter's total cap.
///
/// Identified entities contribute one (maximum) cap each; unidentifiable rows
/// contribute their own cap. Sorted by cap descending, then category ascending.
pub fn cap_weighted_distribution(
    snapshot: &QuarterSnapshot,
    field: CategoryField,
) -> Vec<CategoryCap> {
    if !snapshot.presence().market_cap {
        return Vec::new();
    }
    let total = snapshot.total_market_cap();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut caps: HashMap<&str, f64> = HashMap::new();
    for member in snapshot.members().iter().chain(snapshot.unidentified()) {
        if let Some(cap) = member.market_cap {
            *caps.entry(category_of(member, field)).or_default() += cap;
        }
    }

    let mut distribution: Vec<CategoryCap> = caps
        .into_iter()
        .map(|(category, market_cap)| CategoryCap {
            category: category.to_string(),
            market_cap,
            share_pct: 100.0 * market_cap / total,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.market_cap
            .total_cmp(&a.market_cap)
            .then_with(|| a.category.cmp(&b.category))
    });
    distribution
}

/// Category shares under the given weighting, in ranking order.
pub fn weighted_shares(
    snapshot: &QuarterSnapshot,
    field: CategoryField,
    weighting: Weighting,
) -> Vec<CategoryShare> {
    match weighting {
        Weighting::EqualWeighted => category_distribution(snapshot, field)
            .into_iter()
            .map(|c| CategoryShare {
                category: c.category,
                share_pct: c.share_pct,
            })
            .collect(),
        Weighting::CapWeighted => cap_weighted_distribution(snapshot, field)
            .into_iter()
            .map(|c| CategoryShare {
                category: c.category,
                share_pct: c.share_pct,
            })
            .collect(),
    }
}

/// The `n` categories with the largest total market cap, with their cap share.
pub fn top_n_share_by_cap(
    snapshot: &QuarterSnapshot,
    field: CategoryField,
    n: usize,
) -> Vec<CategoryShare> {
    top_n_share(snapshot, field, Weighting::CapWeighted, n)
}

/// The `n` categories with the most distinct entities, with their count share.
pub fn top_n_share_equal(
    snapshot: &QuarterSnapshot,
    field: CategoryField,
    n: usize,
) -> Vec<CategoryShare> {
    top_n_share(snapshot, field, Weighting::EqualWeighted, n)
}

/// Top `n` categories ranked by the weighting's own criterion. The
/// `"(Missing)"` bucket is never a candidate.
pub fn top_n_share(
    snapshot: &QuarterSnapshot,
    field: CategoryField,
    weighting: Weighting,
    n: usize,
) -> Vec<CategoryShare> {
    weighted_shares(snapshot, field, weighting)
        .into_iter()
        .filter(|s| s.category != MISSING_CATEGORY)
        .take(n)
        .collect()
}

fn entity_caps(snapshot: &QuarterSnapshot) -> Vec<f64> {
    if !snapshot.presence().market_cap {
        return Vec::new();
    }
    snapshot.members().iter().filter_map(|m| m.market_cap).collect()
}

/// Percentage of the quarter's identified cap held by its `n` largest entities.
pub fn concentration_top_n(snapshot: &QuarterSnapshot, n: usize) -> f64 {
    let mut caps = entity_caps(snapshot);
    let total: f64 = caps.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    caps.sort_by(|a, b| b.total_cmp(a));
    let top: f64 = caps.iter().take(n).sum();
    100.0 * top / total
}

/// Herfindahl-Hirschman Index of entity caps, in points (`0..=10000`).
///
/// Entities without cap data carry no weight; weights are normalized against
/// the total of the valid caps only.
pub fn hhi(snapshot: &QuarterSnapshot) -> f64 {
    let caps = entity_caps(snapshot);
    let total: f64 = caps.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let sum_sq: f64 = caps.iter().map(|c| (c / total).powi(2)).sum();
    (10_000.0 * sum_sq).clamp(0.0, 10_000.0)
}

pub fn concentration(snapshot: &QuarterSnapshot, n: usize) -> Concentration {
    Concentration {
        quarter: snapshot.quarter().clone(),
        top_n: n,
        top_n_share_pct: concentration_top_n(snapshot, n),
        hhi: hhi(snapshot),
    }
}

/// Headline figures of a quarter.
///
/// Countries are counted by HQ code when the table has one, by HQ country
/// name otherwise. Unidentifiable rows count towards every figure except
/// `n_entities`.
pub fn summary(snapshot: &QuarterSnapshot) -> SnapshotSummary {
    let presence = snapshot.presence();
    let all = || snapshot.members().iter().chain(snapshot.unidentified());

    let n_countries = if presence.hq_code {
        all()
            .filter_map(|m| m.hq_code.as_deref())
            .collect::<HashSet<_>>()
            .len()
    } else {
        all()
            .filter_map(|m| m.hq_country.as_deref())
            .collect::<HashSet<_>>()
            .len()
    };
    let n_sectors = all()
        .filter_map(|m| m.sector.as_deref())
        .collect::<HashSet<_>>()
        .len();

    SnapshotSummary {
        quarter: snapshot.quarter().clone(),
        n_rows: snapshot.n_rows(),
        n_entities: snapshot.n_entities(),
        n_countries,
        n_sectors,
        total_market_cap: snapshot.total_market_cap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Panel;
    use chrono::NaiveDate;
    use panel::{ConstituentRow, QuarterLabel};

    fn row(key: &str) -> ConstituentRow {
        ConstituentRow::new(NaiveDate::from_ymd_opt(2020, 3, 31).unwrap()).with_firm_id(key)
    }

    fn q2() -> QuarterLabel {
        QuarterLabel::new(2020, 2).unwrap()
    }

    fn create_mock_snapshot() -> QuarterSnapshot {
        Panel::from_rows(vec![
            row("A").with_hq("Germany", "DE").with_sector("Tech").with_market_cap(50.0),
            row("B").with_hq("Germany", "DE").with_sector("Energy").with_market_cap(30.0),
            row("C").with_hq("France", "FR").with_sector("Tech").with_market_cap(15.0),
            row("D").with_sector("Tech").with_market_cap(5.0),
            // duplicate of A within the quarter
            row("A").with_hq("Germany", "DE").with_market_cap(40.0),
        ])
        .snapshot(&q2())
    }

    #[test]
    fn test_category_distribution_counts_entities_once() {
        let snapshot = create_mock_snapshot();
        let dist = category_distribution(&snapshot, CategoryField::HqCountry);
        let view: Vec<(&str, usize)> = dist
            .iter()
            .map(|c| (c.category.as_str(), c.n_entities))
            .collect();
        assert_eq!(
            view,
            vec![("Germany", 2), ("(Missing)", 1), ("France", 1)]
        );
        let total: f64 = dist.iter().map(|c| c.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((dist[0].share_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_and_equal_rankings_differ() {
        let snapshot = Panel::from_rows(vec![
            row("A").with_sector("Tech").with_market_cap(100.0),
            row("B").with_sector("Energy").with_market_cap(1.0),
            row("C").with_sector("Energy").with_market_cap(1.0),
            row("D").with_sector("Energy").with_market_cap(1.0),
            row("E").with_market_cap(2.0),
        ])
        .snapshot(&q2());

        let by_cap = top_n_share_by_cap(&snapshot, CategoryField::Sector, 1);
        let equal = top_n_share_equal(&snapshot, CategoryField::Sector, 1);
        assert_eq!(by_cap[0].category, "Tech");
        assert_eq!(equal[0].category, "Energy");
        assert!((equal[0].share_pct - 60.0).abs() < 1e-9);
        assert!((by_cap[0].share_pct - 100.0 / 105.0 * 100.0).abs() < 1e-9);

        // "(Missing)" is excluded from top-N even when it ranks.
        let all = top_n_share_by_cap(&snapshot, CategoryField::Sector, 10);
        assert!(all.iter().all(|s| s.category != MISSING_CATEGORY));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_cap_weighted_distribution_uses_entity_max() {
        let snapshot = create_mock_snapshot();
        let dist = cap_weighted_distribution(&snapshot, CategoryField::Sector);
        assert_eq!(dist[0].category, "Tech");
        // A (50, max of 50/40) + C (15) + D (5)
        assert!((dist[0].market_cap - 70.0).abs() < 1e-9);
        assert!((dist[0].share_pct - 70.0).abs() < 1e-9);
        let total: f64 = dist.iter().map(|c| c.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_concentration_top_n() {
        let snapshot = create_mock_snapshot();
        assert!((concentration_top_n(&snapshot, 1) - 50.0).abs() < 1e-9);
        assert!((concentration_top_n(&snapshot, 2) - 80.0).abs() < 1e-9);
        assert!((concentration_top_n(&snapshot, 10) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hhi() {
        let snapshot = create_mock_snapshot();
        // 0.5^2 + 0.3^2 + 0.15^2 + 0.05^2 = 0.365
        assert!((hhi(&snapshot) - 3650.0).abs() < 1e-6);
    }

    #[test]
    fn test_hhi_equal_caps_is_lower_bound() {
        let rows = (0..8)
            .map(|i| row(&format!("E{}", i)).with_market_cap(7.0))
            .collect();
        let snapshot = Panel::from_rows(rows).snapshot(&q2());
        assert!((hhi(&snapshot) - 10_000.0 / 8.0).abs() < 1e-6);

        let single = Panel::from_rows(vec![row("A").with_market_cap(3.0)]).snapshot(&q2());
        assert!((hhi(&single) - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_entities_without_cap_are_ignored() {
        let snapshot = Panel::from_rows(vec![
            row("A").with_market_cap(10.0),
            row("B").with_market_cap(10.0),
            row("C"),
        ])
        .snapshot(&q2());
        assert!((hhi(&snapshot) - 5000.0).abs() < 1e-6);
        assert!((concentration_top_n(&snapshot, 1) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_cap_yields_zero() {
        let snapshot = Panel::from_rows(vec![
            row("A").with_market_cap(0.0),
            row("B").with_market_cap(0.0),
        ])
        .snapshot(&q2());
        assert_eq!(concentration_top_n(&snapshot, 10), 0.0);
        assert_eq!(hhi(&snapshot), 0.0);
        assert!(cap_weighted_distribution(&snapshot, CategoryField::Sector).is_empty());
    }

    #[test]
    fn test_missing_cap_column() {
        let snapshot = Panel::from_rows(vec![row("A").with_sector("Tech")]).snapshot(&q2());
        assert_eq!(concentration_top_n(&snapshot, 10), 0.0);
        assert_eq!(hhi(&snapshot), 0.0);
        assert!(top_n_share_by_cap(&snapshot, CategoryField::Sector, 5).is_empty());
        assert_eq!(top_n_share_equal(&snapshot, CategoryField::Sector, 5).len(), 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Panel::from_rows(Vec::new()).snapshot(&q2());
        assert!(category_distribution(&snapshot, CategoryField::HqCountry).is_empty());
        assert!(cap_weighted_distribution(&snapshot, CategoryField::HqCountry).is_empty());
        assert_eq!(concentration_top_n(&snapshot, 10), 0.0);
        assert_eq!(hhi(&snapshot), 0.0);
        let s = summary(&snapshot);
        assert_eq!(s.n_entities, 0);
        assert_eq!(s.total_market_cap, 0.0);
    }

    #[test]
    fn test_summary() {
        let snapshot = create_mock_snapshot();
        let s = summary(&snapshot);
        assert_eq!(s.n_rows, 5);
        assert_eq!(s.n_entities, 4);
        assert_eq!(s.n_countries, 2);
        assert_eq!(s.n_sectors, 2);
        assert!((s.total_market_cap - 100.0).abs() < 1e-9);
    }
}
