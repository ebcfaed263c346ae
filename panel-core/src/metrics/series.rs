//! Metrics computed for every quarter of the panel, in chronological order.

use panel::{CategoryField, CategorySharePoint, QuarterValue, Weighting, MISSING_CATEGORY};
use std::collections::{HashMap, HashSet};

use super::composition::{
    cap_weighted_distribution, category_distribution, concentration_top_n, hhi,
    weighted_shares,
};
use crate::panel::{Panel, QuarterSnapshot};

fn snapshots(panel: &Panel) -> Vec<QuarterSnapshot> {
    panel.quarters().iter().map(|q| panel.snapshot(q)).collect()
}

fn per_quarter<F>(panel: &Panel, metric: F) -> Vec<QuarterValue>
where
    F: Fn(&QuarterSnapshot) -> f64,
{
    snapshots(panel)
        .iter()
        .map(|s| QuarterValue {
            quarter: s.quarter().clone(),
            value: metric(s),
        })
        .collect()
}

/// Categories ranked over the whole panel: by summed cap for cap weighting,
/// by entity-quarters for equal weighting. `"(Missing)"` is never ranked.
fn panel_top_categories(
    snapshots: &[QuarterSnapshot],
    field: CategoryField,
    weighting: Weighting,
    n: usize,
) -> Vec<String> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for snapshot in snapshots {
        match weighting {
            Weighting::CapWeighted => {
                for c in cap_weighted_distribution(snapshot, field) {
                    *totals.entry(c.category).or_default() += c.market_cap;
                }
            }
            Weighting::EqualWeighted => {
                for c in category_distribution(snapshot, field) {
                    *totals.entry(c.category).or_default() += c.n_entities as f64;
                }
            }
        }
    }
    totals.remove(MISSING_CATEGORY);

    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(c, _)| c).collect()
}

/// Quarterly share of the panel-wide top `n` categories.
///
/// A category contributes a point only in the quarters where it appears.
/// Points are ordered by quarter, then by the category's panel-wide rank.
pub fn top_n_share_series(
    panel: &Panel,
    field: CategoryField,
    weighting: Weighting,
    n: usize,
) -> Vec<CategorySharePoint> {
    let snapshots = snapshots(panel);
    let top = panel_top_categories(&snapshots, field, weighting, n);

    let mut points = Vec::new();
    for snapshot in &snapshots {
        let shares: HashMap<String, f64> = weighted_shares(snapshot, field, weighting)
            .into_iter()
            .map(|s| (s.category, s.share_pct))
            .collect();
        for category in &top {
            if let Some(&share_pct) = shares.get(category) {
                points.push(CategorySharePoint {
                    quarter: snapshot.quarter().clone(),
                    category: category.clone(),
                    share_pct,
                });
            }
        }
    }
    points
}

pub fn concentration_series(panel: &Panel, n: usize) -> Vec<QuarterValue> {
    per_quarter(panel, |s| concentration_top_n(s, n))
}

pub fn hhi_series(panel: &Panel) -> Vec<QuarterValue> {
    per_quarter(panel, hhi)
}

pub fn total_market_cap_series(panel: &Panel) -> Vec<QuarterValue> {
    per_quarter(panel, QuarterSnapshot::total_market_cap)
}

/// Number of distinct non-missing values of `field` per quarter, over all rows.
pub fn distinct_category_series(panel: &Panel, field: CategoryField) -> Vec<QuarterValue> {
    per_quarter(panel, |s| {
        s.members()
            .iter()
            .chain(s.unidentified())
            .filter_map(|m| m.category(field))
            .collect::<HashSet<_>>()
            .len() as f64
    })
}

pub fn entity_count_series(panel: &Panel) -> Vec<QuarterValue> {
    per_quarter(panel, |s| s.n_entities() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use panel::ConstituentRow;

    fn row(month: u32, key: &str, country: &str, cap: f64) -> ConstituentRow {
        let day = if month == 6 || month == 9 { 30 } else { 31 };
        ConstituentRow::new(NaiveDate::from_ymd_opt(2020, month, day).unwrap())
            .with_firm_id(key)
            .with_hq(country, country[..2].to_uppercase())
            .with_market_cap(cap)
    }

    fn create_mock_panel() -> Panel {
        Panel::from_rows(vec![
            row(3, "A", "Germany", 90.0),
            row(3, "B", "France", 5.0),
            row(3, "C", "France", 5.0),
            row(6, "A", "Germany", 10.0),
            row(6, "B", "France", 45.0),
            row(6, "C", "France", 45.0),
            row(6, "D", "Italy", 1.0),
        ])
    }

    #[test]
    fn test_top_n_share_series_ranks_over_panel() {
        let panel = create_mock_panel();

        // Cap: Germany 100, France 100, Italy 1 -> tie broken by name.
        let cap = top_n_share_series(&panel, CategoryField::HqCountry, Weighting::CapWeighted, 1);
        assert_eq!(cap.len(), 2);
        assert!(cap.iter().all(|p| p.category == "France"));
        assert!((cap[0].share_pct - 10.0).abs() < 1e-9);

        // Equal: France has 4 entity-quarters.
        let equal =
            top_n_share_series(&panel, CategoryField::HqCountry, Weighting::EqualWeighted, 2);
        let view: Vec<(&str, &str)> = equal
            .iter()
            .map(|p| (p.quarter.as_str(), p.category.as_str()))
            .collect();
        assert_eq!(
            view,
            vec![
                ("2020Q2", "France"),
                ("2020Q2", "Germany"),
                ("2020Q3", "France"),
                ("2020Q3", "Germany"),
            ]
        );
    }

    #[test]
    fn test_absent_category_has_no_point() {
        let panel = create_mock_panel();
        let series =
            top_n_share_series(&panel, CategoryField::HqCountry, Weighting::EqualWeighted, 3);
        let italy: Vec<&str> = series
            .iter()
            .filter(|p| p.category == "Italy")
            .map(|p| p.quarter.as_str())
            .collect();
        assert_eq!(italy, vec!["2020Q3"]);
    }

    #[test]
    fn test_per_quarter_series() {
        let panel = create_mock_panel();
        let entities: Vec<f64> = entity_count_series(&panel).iter().map(|v| v.value).collect();
        assert_eq!(entities, vec![3.0, 4.0]);

        let caps: Vec<f64> = total_market_cap_series(&panel)
            .iter()
            .map(|v| v.value)
            .collect();
        assert_eq!(caps, vec![100.0, 101.0]);

        let countries: Vec<f64> = distinct_category_series(&panel, CategoryField::HqCountry)
            .iter()
            .map(|v| v.value)
            .collect();
        assert_eq!(countries, vec![2.0, 3.0]);

        let top1 = concentration_series(&panel, 1);
        assert!((top1[0].value - 90.0).abs() < 1e-9);
        let hhi = hhi_series(&panel);
        assert_eq!(hhi.len(), 2);
        assert!(hhi.iter().all(|v| v.value > 0.0 && v.value <= 10_000.0));
    }

    #[test]
    fn test_empty_panel() {
        let panel = Panel::from_rows(Vec::new());
        assert!(hhi_series(&panel).is_empty());
        assert!(top_n_share_series(&panel, CategoryField::Sector, Weighting::CapWeighted, 5)
            .is_empty());
    }
}
