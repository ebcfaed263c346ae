//! Loads the constituents table into a [`Panel`].
//!
//! This is the only place load-time errors can occur. Once a panel exists, no
//! query against it fails.

use log::{info, warn};
use std::fs::File;
use std::path::Path;

use crate::error::{PanelError, Result};
use crate::fs::source::{read_csv, read_json, read_jsonl, RawTable, SourceFormat};
use crate::identity::IdentityResolver;
use crate::panel::Panel;
use crate::schema::{ColumnSchema, RowOutcome};

/// Loads a panel from disk.
///
/// # Arguments
///
/// * `path` - The constituents table.
/// * `format` - Forced format; inferred from the extension when `None`.
///
/// # Returns
///
/// * `Ok(Panel)` on success, even if some rows were rejected.
/// * `Err(PanelError::DataSourceMissing)` if the file does not exist.
/// * `Err(PanelError::SchemaInvalid)` if the table has no date column.
/// * `Err` on IO or decoding failure.
pub fn load_panel(path: &Path, format: Option<SourceFormat>) -> Result<Panel> {
    info!("Loading constituents from {}", path.display());
    if !path.is_file() {
        return Err(PanelError::DataSourceMissing(path.to_path_buf()));
    }

    let format = match format {
        Some(format) => format,
        None => SourceFormat::from_path(path)?,
    };

    let file = File::open(path)?;
    let table = match format {
        SourceFormat::Csv => read_csv(file)?,
        SourceFormat::Json => read_json(file)?,
        SourceFormat::Jsonl => read_jsonl(file)?,
    };

    panel_from_table(table, &IdentityResolver::default())
}

/// Resolves the schema of a raw table and normalizes its rows.
pub fn panel_from_table(table: RawTable, resolver: &IdentityResolver) -> Result<Panel> {
    let schema = ColumnSchema::resolve(&table.headers)?;

    let mut rejected = table.skipped;
    let mut rows = Vec::with_capacity(table.rows.len());
    for cells in &table.rows {
        match schema.normalize(cells) {
            RowOutcome::Accepted(row) => rows.push(row),
            RowOutcome::Rejected => rejected += 1,
        }
    }

    if rejected > 0 {
        warn!("Dropped {} rows without a usable date", rejected);
    }

    Ok(Panel::new(rows, schema.presence(), resolver, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                        .collect()
                })
                .collect(),
            skipped: 0,
        }
    }

    #[test]
    fn test_rejected_rows_are_counted() {
        let t = table(
            &["date", "RIC"],
            &[&["2020-03-31", "A"], &["garbage", "B"], &["", "C"], &["2020-06-30", ""]],
        );
        let panel = panel_from_table(t, &IdentityResolver::default()).unwrap();
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.stats().rows_read, 4);
        assert_eq!(panel.stats().rows_rejected, 2);
        assert_eq!(panel.stats().rows_unidentified, 1);
    }

    #[test]
    fn test_presence_comes_from_schema() {
        let t = table(&["date", "RIC", "mcap_eur"], &[&["2020-03-31", "A", ""]]);
        let panel = panel_from_table(t, &IdentityResolver::default()).unwrap();
        // The column exists even though no row has a value.
        assert!(panel.presence().market_cap);
        assert!(!panel.presence().rank);
    }

    #[test]
    fn test_schema_invalid() {
        let t = table(&["RIC"], &[&["A"]]);
        let err = panel_from_table(t, &IdentityResolver::default()).unwrap_err();
        assert!(matches!(err, PanelError::SchemaInvalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_panel(Path::new("/definitely/not/here.csv"), None).unwrap_err();
        assert!(matches!(err, PanelError::DataSourceMissing(_)));
    }
}
