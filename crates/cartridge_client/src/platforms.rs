//! Lazy, page-at-a-time sequence over the platforms collection.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::page::PageResponse;
use crate::transport::Transport;
use cartridge_record::Record;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use tracing::{debug, info, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// More pages are expected.
    Fetching,
    /// Every result the server reported has been fetched.
    Done,
    /// An error was handed to the consumer; nothing more is produced.
    Failed,
}

/// Records of the platforms collection, fetched one page at a time.
///
/// Pull with [`Platforms::next_record`], or adapt the sequence into a
/// [`Stream`] with [`Platforms::into_stream`]. A page request is issued only
/// when the buffered page is exhausted and another record is asked for, so
/// dropping the sequence early never fetches the remaining pages. A failed
/// page fetch is returned at the pull that needed it and ends the sequence.
pub struct Platforms<'a, T> {
    client: &'a Client<T>,
    url: String,
    params: Vec<(&'static str, String)>,
    buffer: VecDeque<Record>,
    state: State,
    total_results: Option<u64>,
    fetched: u64,
    emitted: u64,
}

impl<'a, T: Transport> Platforms<'a, T> {
    pub(crate) const fn new(
        client: &'a Client<T>,
        url: String,
        params: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            client,
            url,
            params,
            buffer: VecDeque::new(),
            state: State::Fetching,
            total_results: None,
            fetched: 0,
            emitted: 0,
        }
    }

    /// Returns the next record, fetching the next page if needed.
    ///
    /// Returns `None` once the collection is exhausted or after an error
    /// has been returned.
    pub async fn next_record(&mut self) -> Option<Result<Record>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(self.emit(record)));
            }

            if self.state != State::Fetching {
                return None;
            }

            if let Err(e) = self.fetch_page().await {
                self.state = State::Failed;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
    }

    /// Drains the sequence into a vector, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first page fetch error.
    pub async fn collect_all(mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await {
            records.push(record?);
        }
        Ok(records)
    }

    /// Adapts the sequence into a [`Stream`].
    ///
    /// Pages are still requested only as the stream is polled, so
    /// combinators such as `take` stop fetching once they are satisfied.
    #[must_use]
    pub fn into_stream(self) -> impl Stream<Item = Result<Record>> + 'a {
        stream::unfold(self, |mut platforms| async move {
            let item = platforms.next_record().await?;
            Some((item, platforms))
        })
    }

    /// Total results reported by the server, once the first page is in.
    pub const fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    /// Results fetched so far, as reported by the pages.
    pub const fn fetched(&self) -> u64 {
        self.fetched
    }

    /// Records handed to the consumer so far.
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Returns true once no further records will be produced.
    pub fn is_done(&self) -> bool {
        self.state != State::Fetching && self.buffer.is_empty()
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let span = self.client.span();
        let mut params = self.params.clone();
        params.push(("offset", self.fetched.to_string()));

        info!(parent: span, offset = self.fetched, "Fetching platforms page");
        let body = self
            .client
            .transport()
            .get_json(&self.url, &params)
            .instrument(span.clone())
            .await?;
        let page = PageResponse::from_value(body)?;

        let total = *self.total_results.get_or_insert(page.total_results);
        if page.page_results == 0 && self.fetched < total {
            return Err(Error::malformed(format!(
                "empty page at offset {} before reaching {} results",
                self.fetched, total
            )));
        }

        self.fetched = self.fetched.checked_add(page.page_results).ok_or_else(|| {
            Error::malformed(format!(
                "page of {} results at offset {} overflows the result count",
                page.page_results, self.fetched
            ))
        })?;
        if self.fetched >= total {
            self.state = State::Done;
        }

        debug!(
            parent: span,
            page_results = page.page_results,
            fetched = self.fetched,
            total,
            "Fetched platforms page"
        );
        self.buffer.extend(page.results);
        Ok(())
    }

    fn emit(&mut self, mut record: Record) -> Record {
        let span = self.client.span();
        if let Err(e) = record.coerce_price() {
            warn!(parent: span, name = record.name(), "Leaving price as-is: {}", e);
        }

        self.emitted += 1;
        debug!(
            parent: span,
            "Emitting platform {} of {}",
            self.emitted,
            self.total_results.unwrap_or_default()
        );
        record
    }
}
