//! Page response parsing.

use crate::error::{Error, Result};
use cartridge_record::Record;
use serde_json::{Map, Value};

const TOTAL_RESULTS: &str = "number_of_total_results";
const PAGE_RESULTS: &str = "number_of_page_results";
const RESULTS: &str = "results";

/// `status_code` value the API uses for success.
const STATUS_OK: i64 = 1;

/// One page of the platforms collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Server-reported size of the whole collection for this query.
    pub total_results: u64,
    /// Server-reported number of results on this page.
    pub page_results: u64,
    /// The records on this page, in server order.
    pub results: Vec<Record>,
}

impl PageResponse {
    /// Parses a decoded response body.
    ///
    /// Counts may arrive as integers or as numeric strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the body carries a non-OK `status_code`,
    /// and [`Error::MalformedResponse`] if a pagination field is missing or
    /// has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut body) = value else {
            return Err(Error::malformed("response body is not a JSON object"));
        };

        check_status(&body)?;

        let total_results = count_field(&body, TOTAL_RESULTS)?;
        let page_results = count_field(&body, PAGE_RESULTS)?;

        let results = match body.remove(RESULTS) {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    Record::try_from(item)
                        .map_err(|e| Error::malformed(format!("{RESULTS}[{i}]: {e}")))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::malformed(format!("`{RESULTS}` is not an array"))),
            None => return Err(Error::malformed(format!("missing `{RESULTS}`"))),
        };

        Ok(Self {
            total_results,
            page_results,
            results,
        })
    }
}

fn check_status(body: &Map<String, Value>) -> Result<()> {
    let Some(code) = body.get("status_code").and_then(as_integer) else {
        return Ok(());
    };
    if code == STATUS_OK {
        return Ok(());
    }

    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Err(Error::Api { code, message })
}

fn count_field(body: &Map<String, Value>, field: &str) -> Result<u64> {
    let value = body
        .get(field)
        .ok_or_else(|| Error::malformed(format!("missing `{field}`")))?;

    let count = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    count.ok_or_else(|| Error::malformed(format!("`{field}` is not a count: {value}")))
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
