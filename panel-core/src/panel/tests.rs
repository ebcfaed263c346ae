use super::*;
use chrono::NaiveDate;
use ::panel::CategoryField;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn q(year: i32, quarter: u8) -> QuarterLabel {
    QuarterLabel::new(year, quarter).unwrap()
}

fn create_mock_panel() -> Panel {
    Panel::from_rows(vec![
        // 2019-12-31 rolls into 2020Q1
        ConstituentRow::new(date(2019, 12, 31))
            .with_firm_id("A")
            .with_name("Alpha")
            .with_market_cap(10.0),
        ConstituentRow::new(date(2019, 12, 31))
            .with_firm_id("B")
            .with_name("Beta")
            .with_market_cap(5.0),
        ConstituentRow::new(date(2020, 3, 31))
            .with_firm_id("A")
            .with_name("Alpha")
            .with_market_cap(11.0),
        ConstituentRow::new(date(2020, 9, 30))
            .with_firm_id("A")
            .with_market_cap(12.0),
        ConstituentRow::new(date(2020, 12, 31))
            .with_firm_id("C")
            .with_market_cap(3.0),
        // unidentifiable
        ConstituentRow::new(date(2020, 3, 31)).with_market_cap(1.0),
    ])
}

#[test]
fn test_quarters_and_years() {
    let panel = create_mock_panel();
    let labels: Vec<&str> = panel.quarters().iter().map(|l| l.as_str()).collect();
    assert_eq!(labels, vec!["2020Q1", "2020Q2", "2020Q4", "2021Q1"]);
    assert_eq!(panel.years(), vec![2020, 2021]);
    assert_eq!(panel.quarters_in_year(2020).len(), 3);
    assert!(panel.quarters_in_year(1990).is_empty());
}

#[test]
fn test_snapshot() {
    let panel = create_mock_panel();
    let snapshot = panel.snapshot(&q(2020, 2));
    assert_eq!(snapshot.n_entities(), 1);
    assert_eq!(snapshot.unidentified().len(), 1);
    assert!(snapshot.contains("A"));

    let missing = panel.snapshot(&q(1999, 1));
    assert!(missing.is_empty());
}

#[test]
fn test_rows_for_entity_sorted_by_date() {
    let rows = Panel::from_rows(vec![
        ConstituentRow::new(date(2020, 9, 30)).with_firm_id("A"),
        ConstituentRow::new(date(2020, 3, 31)).with_firm_id("A"),
        ConstituentRow::new(date(2020, 6, 30)).with_firm_id("B"),
    ]);
    let dates: Vec<NaiveDate> = rows
        .rows_for_entity("A")
        .iter()
        .map(|r| r.as_of_date)
        .collect();
    assert_eq!(dates, vec![date(2020, 3, 31), date(2020, 9, 30)]);
    assert!(rows.rows_for_entity("Z").is_empty());
}

#[test]
fn test_filter_by_year_and_quarter() {
    let panel = create_mock_panel();
    assert_eq!(panel.filter(2020, None).len(), 5);
    assert_eq!(panel.filter(2020, Some(1)).len(), 2);
    assert_eq!(panel.filter(2020, Some(3)).len(), 0);
    assert_eq!(panel.filter(2031, None).len(), 0);

    let ordered: Vec<&str> = panel
        .filter(2020, None)
        .iter()
        .map(|r| r.quarter.as_str())
        .collect();
    assert_eq!(ordered, vec!["2020Q1", "2020Q1", "2020Q2", "2020Q2", "2020Q4"]);
}

#[test]
fn test_stats_and_entities() {
    let panel = create_mock_panel();
    assert_eq!(panel.len(), 6);
    assert_eq!(panel.entity_count(), 3);
    assert_eq!(panel.stats().rows_unidentified, 1);
    assert_eq!(panel.stats().rows_rejected, 0);
    let keys: Vec<&str> = panel.entity_keys().iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
    assert_eq!(panel.display_name("A"), Some("Alpha"));
    assert_eq!(panel.display_name("C"), None);
}

#[test]
fn test_presence_inferred() {
    let panel = create_mock_panel();
    assert!(panel.presence().market_cap);
    assert!(panel.presence().firm_id);
    assert!(!panel.presence().rank);
}

#[test]
fn test_member_category_reads_merged_values() {
    let d = date(2020, 3, 31);
    let panel = Panel::from_rows(vec![
        ConstituentRow::new(d).with_firm_id("A").with_sector("Energy"),
        ConstituentRow::new(d).with_firm_id("A").with_hq("Spain", "ES"),
        ConstituentRow::new(d).with_firm_id("B"),
    ]);
    let snapshot = panel.snapshot(&q(2020, 2));
    let a = &snapshot.members()[0];
    assert_eq!(a.category(CategoryField::Sector), Some("Energy"));
    assert_eq!(a.category(CategoryField::HqCountry), Some("Spain"));
    assert_eq!(snapshot.members()[1].category(CategoryField::Sector), None);
}
