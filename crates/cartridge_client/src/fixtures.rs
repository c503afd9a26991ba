//! In-memory catalog transport for exercising pagination without a server.

use crate::error::{Error, Result};
use crate::transport::Transport;
use cartridge_record::Record;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};

/// Wire shape of a page, as the platforms endpoint sends it.
#[derive(Debug, Serialize)]
struct WirePage<'a> {
    error: &'static str,
    status_code: i64,
    limit: usize,
    offset: usize,
    number_of_total_results: Value,
    number_of_page_results: Value,
    results: &'a [Record],
}

/// Serves a fixed list of records in pages of `page_size`, honoring the
/// `offset` parameter, and records every request it receives.
#[derive(Debug)]
pub struct CatalogTransport {
    records: Vec<Record>,
    page_size: usize,
    fail_at_offset: Option<usize>,
    reported_total: Option<usize>,
    counts_as_strings: bool,
    requests: Mutex<Vec<Vec<(String, String)>>>,
}

impl CatalogTransport {
    /// Creates a catalog over `records`. A zero page size is treated as one.
    #[must_use]
    pub fn new(records: Vec<Record>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            fail_at_offset: None,
            reported_total: None,
            counts_as_strings: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers the request for `offset` with a 503.
    #[must_use]
    pub const fn fail_at_offset(mut self, offset: usize) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    /// Reports `total` as the collection size instead of the real count.
    #[must_use]
    pub const fn inflate_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Sends counts as numeric strings, as the live API sometimes does.
    #[must_use]
    pub const fn counts_as_strings(mut self) -> Self {
        self.counts_as_strings = true;
        self
    }

    /// Every request's parameters, in arrival order.
    pub fn requests(&self) -> Vec<Vec<(String, String)>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The `offset` parameter of every request, in arrival order.
    pub fn offsets(&self) -> Vec<usize> {
        self.requests()
            .iter()
            .map(|params| offset_of(params))
            .collect()
    }

    fn count(&self, n: usize) -> Value {
        if self.counts_as_strings {
            Value::String(n.to_string())
        } else {
            Value::from(n)
        }
    }

    fn page(&self, offset: usize) -> Result<Value> {
        let start = offset.min(self.records.len());
        let end = (start + self.page_size).min(self.records.len());
        let results = &self.records[start..end];

        let page = WirePage {
            error: "OK",
            status_code: 1,
            limit: self.page_size,
            offset,
            number_of_total_results: self.count(self.reported_total.unwrap_or(self.records.len())),
            number_of_page_results: self.count(results.len()),
            results,
        };
        serde_json::to_value(page).map_err(|e| Error::InvalidBody(e.to_string()))
    }
}

impl Transport for CatalogTransport {
    async fn get_json(&self, _url: &str, params: &[(&str, String)]) -> Result<Value> {
        let owned: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        let offset = offset_of(&owned);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(owned);

        if self.fail_at_offset == Some(offset) {
            return Err(Error::HttpStatus {
                status: 503,
                body: "simulated outage".to_string(),
            });
        }
        self.page(offset)
    }
}

fn offset_of(params: &[(String, String)]) -> usize {
    params
        .iter()
        .find(|(k, _)| k == "offset")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or_default()
}
