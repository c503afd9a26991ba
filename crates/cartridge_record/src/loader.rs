//! Record loading from JSON and NDJSON dumps.

use crate::error::{Error, Result};
use crate::record::Record;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Loads records from a file.
///
/// See [`parse_records`] for the accepted layouts.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    info!("Loading records from {}", path.display());

    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Parses records from text.
///
/// Accepted layouts:
/// - A JSON array of objects
/// - A JSON object with a `results` array (a saved page response)
/// - Newline-delimited JSON, one object per line
///
/// # Errors
///
/// Returns an error if the text matches none of these layouts or contains
/// a non-object entry.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let trimmed = text.trim_start();

    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(text)?;
        return values.into_iter().map(Record::try_from).collect();
    }

    // A whole-document object is either a page or a single NDJSON line.
    if let Ok(Value::Object(mut map)) = serde_json::from_str::<Value>(text) {
        if let Some(Value::Array(results)) = map.remove("results") {
            debug!("Parsed page dump with {} results", results.len());
            return results.into_iter().map(Record::try_from).collect();
        }
        return Ok(vec![Record::from(map)]);
    }

    parse_ndjson(text)
}

fn parse_ndjson(text: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .map_err(|e| Error::parse(index + 1, format!("invalid JSON: {e}")))?;
        let record =
            Record::try_from(value).map_err(|e| Error::parse(index + 1, e.to_string()))?;
        records.push(record);
    }

    debug!("Parsed {} NDJSON records", records.len());
    Ok(records)
}
