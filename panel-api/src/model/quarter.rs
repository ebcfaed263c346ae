//! Fiscal quarter labels.
//!
//! A `QuarterLabel` is the canonical `"YYYYQn"` bucket a formation date falls
//! into. The mapping from dates lives in `panel-core::calendar`; this type only
//! carries the result and its ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::ParseError;

/// A fiscal quarter, ordered by `(fiscal_year, fiscal_quarter)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "QuarterFields")]
pub struct QuarterLabel {
    fiscal_year: i32,
    fiscal_quarter: u8,
    label: String,
}

/// Wire shape of a [`QuarterLabel`]; decoded values go through [`QuarterLabel::new`].
#[derive(Deserialize)]
struct QuarterFields {
    fiscal_year: i32,
    fiscal_quarter: u8,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<QuarterFields> for QuarterLabel {
    type Error = ParseError;

    fn try_from(fields: QuarterFields) -> Result<Self, Self::Error> {
        let invalid = || {
            ParseError::Quarter(format!("{}Q{}", fields.fiscal_year, fields.fiscal_quarter))
        };
        let quarter =
            QuarterLabel::new(fields.fiscal_year, fields.fiscal_quarter).ok_or_else(invalid)?;
        match fields.label {
            Some(label) if label != quarter.label => Err(ParseError::Quarter(label)),
            _ => Ok(quarter),
        }
    }
}

impl QuarterLabel {
    /// Creates a label, returning `None` when `fiscal_quarter` is outside `1..=4`.
    pub fn new(fiscal_year: i32, fiscal_quarter: u8) -> Option<Self> {
        if !(1..=4).contains(&fiscal_quarter) {
            return None;
        }
        Some(Self {
            fiscal_year,
            fiscal_quarter,
            label: format!("{}Q{}", fiscal_year, fiscal_quarter),
        })
    }

    pub fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    pub fn fiscal_quarter(&self) -> u8 {
        self.fiscal_quarter
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for QuarterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for QuarterLabel {
    type Err = ParseError;

    /// Parses `"2020Q1"` (case-insensitive `q`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Quarter(s.to_string());
        let trimmed = s.trim();
        let split = trimmed.find(['Q', 'q']).ok_or_else(invalid)?;
        let (year, quarter) = trimmed.split_at(split);
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let quarter: u8 = quarter[1..].parse().map_err(|_| invalid())?;
        QuarterLabel::new(year, quarter).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_format() {
        let q = QuarterLabel::new(1999, 1).unwrap();
        assert_eq!(q.as_str(), "1999Q1");
        assert_eq!(q.to_string(), "1999Q1");
        assert_eq!(q.fiscal_year(), 1999);
        assert_eq!(q.fiscal_quarter(), 1);
    }

    #[test]
    fn test_rejects_out_of_range_quarter() {
        assert!(QuarterLabel::new(2020, 0).is_none());
        assert!(QuarterLabel::new(2020, 5).is_none());
    }

    #[test]
    fn test_ordering_matches_label_order() {
        let mut labels = vec![
            QuarterLabel::new(2021, 1).unwrap(),
            QuarterLabel::new(2020, 4).unwrap(),
            QuarterLabel::new(2020, 2).unwrap(),
        ];
        labels.sort();
        let as_str: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
        assert_eq!(as_str, vec!["2020Q2", "2020Q4", "2021Q1"]);

        let mut lexical = as_str.clone();
        lexical.sort();
        assert_eq!(lexical, as_str);
    }

    #[test]
    fn test_deserialize_validates_fields() {
        let q = QuarterLabel::new(2020, 3).unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(serde_json::from_str::<QuarterLabel>(&json).unwrap(), q);

        let short = r#"{"fiscal_year": 2020, "fiscal_quarter": 3}"#;
        assert_eq!(serde_json::from_str::<QuarterLabel>(short).unwrap(), q);

        let out_of_range = r#"{"fiscal_year": 2020, "fiscal_quarter": 7, "label": "2020Q7"}"#;
        assert!(serde_json::from_str::<QuarterLabel>(out_of_range).is_err());

        let mismatched = r#"{"fiscal_year": 2020, "fiscal_quarter": 3, "label": "2019Q1"}"#;
        assert!(serde_json::from_str::<QuarterLabel>(mismatched).is_err());
    }

    #[test]
    fn test_parse() {
        let q: QuarterLabel = "2020q3".parse().unwrap();
        assert_eq!(q, QuarterLabel::new(2020, 3).unwrap());
        assert!("2020Q9".parse::<QuarterLabel>().is_err());
        assert!("Q1".parse::<QuarterLabel>().is_err());
        assert!("garbage".parse::<QuarterLabel>().is_err());
    }
}
