// 📂 Record Loader - JSON or CSV files → raw records
// Used by the CLI only; the engine itself never reads files.

use crate::item::RawRecord;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Load raw records; `.csv` files are read as CSV, everything else as a JSON array
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let records = if is_csv {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        load_csv(file).with_context(|| format!("Failed to parse CSV: {}", path.display()))?
    } else {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        load_json(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))?
    };

    debug!(records = records.len(), path = %path.display(), "loaded raw records");
    Ok(records)
}

/// Parse a JSON array of objects
pub fn load_json(content: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(content).context("Expected a JSON array of objects")
}

/// Parse CSV with a header row. Header names become keys; empty cells become null.
pub fn load_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let mut records = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        // +2: 1-indexed plus the header row
        let row = result.with_context(|| format!("Failed to parse CSV line {}", line_num + 2))?;

        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(key, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (key.to_string(), value)
            })
            .collect();

        records.push(record);
    }

    Ok(records)
}
