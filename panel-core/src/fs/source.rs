//! Raw tabular sources.
//!
//! Every supported format is read into the same [`RawTable`]: a header row and
//! string cells. Typing happens later, in [`crate::schema`].

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{PanelError, Result};

/// On-disk format of the constituents table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of objects.
    Json,
    /// One JSON object per line.
    Jsonl,
}

impl SourceFormat {
    /// Infers the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            "jsonl" | "ndjson" => Ok(SourceFormat::Jsonl),
            _ => Err(PanelError::UnsupportedFormat(format!(
                "cannot infer format of {}",
                path.display()
            ))),
        }
    }
}

/// An untyped table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Records that could not be decoded at all.
    pub skipped: usize,
}

/// Reads a CSV table with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable {
        headers,
        ..RawTable::default()
    };

    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => table.rows.push(
                record
                    .iter()
                    .map(|cell| Some(cell.to_string()).filter(|c| !c.trim().is_empty()))
                    .collect(),
            ),
            Err(e) => {
                warn!("Skipping undecodable CSV record {}: {}", line + 1, e);
                table.skipped += 1;
            }
        }
    }

    Ok(table)
}

/// Reads a JSON array of objects.
pub fn read_json<R: Read>(reader: R) -> Result<RawTable> {
    let value: Value = serde_json::from_reader(BufReader::new(reader))?;
    let Value::Array(items) = value else {
        return Err(PanelError::UnsupportedFormat(
            "JSON source must be an array of objects".to_string(),
        ));
    };

    let mut builder = ObjectTableBuilder::default();
    for item in items {
        builder.push(item);
    }
    Ok(builder.finish())
}

/// Reads newline-delimited JSON objects. Blank lines are ignored.
pub fn read_jsonl<R: Read>(reader: R) -> Result<RawTable> {
    let mut builder = ObjectTableBuilder::default();
    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(value) => builder.push(value),
            Err(e) => {
                warn!("Skipping undecodable JSON line {}: {}", line_no + 1, e);
                builder.skipped += 1;
            }
        }
    }
    Ok(builder.finish())
}

/// Collects JSON objects into a table whose columns are the union of all keys.
///
/// Columns appear in the order objects introduce them; keys within a single
/// object are visited in `serde_json::Map` order, which is sorted.
#[derive(Default)]
struct ObjectTableBuilder {
    headers: Vec<String>,
    seen: HashSet<String>,
    objects: Vec<serde_json::Map<String, Value>>,
    skipped: usize,
}

impl ObjectTableBuilder {
    fn push(&mut self, value: Value) {
        let Value::Object(object) = value else {
            self.skipped += 1;
            return;
        };
        for key in object.keys() {
            if self.seen.insert(key.clone()) {
                self.headers.push(key.clone());
            }
        }
        self.objects.push(object);
    }

    fn finish(self) -> RawTable {
        let rows = self
            .objects
            .iter()
            .map(|object| {
                self.headers
                    .iter()
                    .map(|h| object.get(h).and_then(cell_text))
                    .collect()
            })
            .collect();
        RawTable {
            headers: self.headers,
            rows,
            skipped: self.skipped,
        }
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
