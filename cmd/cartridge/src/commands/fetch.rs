//! Fetch command implementation.

use anyhow::{bail, Context, Result};
use cartridge_client::{Client, ClientConfig, Platforms, QueryOptions, Transport};
use cartridge_record::record::fields;
use cartridge_record::{validate_record, Record};
use clap::ValueEnum;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};

/// Columns written in CSV mode, in order.
const CSV_COLUMNS: [&str; 4] = [
    fields::NAME,
    fields::ABBREVIATION,
    fields::RELEASE_DATE,
    fields::ORIGINAL_PRICE,
];

/// Export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `name,abbreviation,release_date,original_price`
    Csv,
    /// One JSON object per line, all fields
    Json,
}

/// Arguments of the fetch command.
pub struct FetchArgs {
    /// Giant Bomb API key.
    pub api_key: String,
    /// API root.
    pub base_url: String,
    /// Sort expression.
    pub sort: Option<String>,
    /// Requested fields; empty means all.
    pub fields: Vec<String>,
    /// Filter conditions in argument order.
    pub filters: Vec<(String, String)>,
    /// Maximum records to export.
    pub limit: Option<usize>,
    /// Output path; stdout when absent.
    pub output: Option<String>,
    /// Export format.
    pub format: OutputFormat,
    /// Skip validation.
    pub keep_invalid: bool,
}

impl FetchArgs {
    fn query_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new().field_list(self.fields.iter().cloned());
        if let Some(sort) = &self.sort {
            options = options.sort(sort.clone());
        }
        for (key, value) in &self.filters {
            options = options.filter(key.clone(), value.clone());
        }
        options
    }
}

/// Counts for one export run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Records written.
    pub exported: usize,
    /// Records dropped by validation.
    pub rejected: usize,
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs) -> Result<()> {
    check_api_key(&args.api_key)?;
    let options = args.query_options();
    let config = ClientConfig::with_api_key(args.api_key.clone()).base_url(args.base_url.clone());
    let client = Client::new(config)
        .with_context(|| "Failed to create platforms client")?
        .with_span(tracing::info_span!("fetch", format = ?args.format));

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {path}"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut sink = RecordSink::new(writer, args.format)?;

    let summary = export(
        client.fetch_platforms(&options),
        &mut sink,
        args.limit,
        args.keep_invalid,
    )
    .await?;
    sink.finish()?;

    info!(
        "Exported {} platforms ({} rejected)",
        summary.exported, summary.rejected
    );
    if let Some(path) = &args.output {
        info!("Output written to: {}", path);
    }
    Ok(())
}

/// Pulls records, validates them and writes them to `sink`.
///
/// Stops pulling as soon as `limit` records have been written, so no
/// further pages are requested.
///
/// # Errors
///
/// Returns an error if a page fetch fails or the sink cannot be written.
pub async fn export<T: Transport, W: Write>(
    mut platforms: Platforms<'_, T>,
    sink: &mut RecordSink<W>,
    limit: Option<usize>,
    keep_invalid: bool,
) -> Result<Summary> {
    let mut summary = Summary::default();

    if limit == Some(0) {
        return Ok(summary);
    }

    while let Some(record) = platforms.next_record().await {
        let record = record.with_context(|| {
            format!(
                "Failed to fetch platforms after {} records",
                platforms.emitted()
            )
        })?;

        if !keep_invalid {
            if let Err(rejection) = validate_record(&record) {
                debug!("{}", rejection);
                summary.rejected += 1;
                continue;
            }
        }

        sink.write(&record)?;
        summary.exported += 1;

        if limit.is_some_and(|limit| summary.exported >= limit) {
            info!(
                "Reached limit of {} records; remaining pages not fetched",
                summary.exported
            );
            break;
        }
    }

    Ok(summary)
}

/// Writes records as CSV rows or NDJSON lines.
pub enum RecordSink<W: Write> {
    /// CSV with a fixed header.
    Csv(csv::Writer<W>),
    /// Newline-delimited JSON.
    Json(W),
}

impl<W: Write> RecordSink<W> {
    /// Creates a sink, writing the CSV header if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn new(writer: W, format: OutputFormat) -> Result<Self> {
        match format {
            OutputFormat::Csv => {
                let mut csv = csv::Writer::from_writer(writer);
                csv.write_record(CSV_COLUMNS)
                    .with_context(|| "Failed to write CSV header")?;
                Ok(Self::Csv(csv))
            }
            OutputFormat::Json => Ok(Self::Json(writer)),
        }
    }

    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        match self {
            Self::Csv(csv) => {
                let row = CSV_COLUMNS.map(|column| cell(record.get(column)));
                csv.write_record(&row)
                    .with_context(|| "Failed to write CSV row")?;
            }
            Self::Json(writer) => {
                serde_json::to_writer(&mut *writer, record)
                    .with_context(|| "Failed to write JSON record")?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(self) -> Result<W> {
        match self {
            Self::Csv(csv) => csv
                .into_inner()
                .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error())),
            Self::Json(mut writer) => {
                writer.flush()?;
                Ok(writer)
            }
        }
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Parses a `key:value` filter argument.
///
/// # Errors
///
/// Returns a message if there is no `:` or the key is empty.
pub fn parse_filter(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected `key:value`, got `{arg}`")),
    }
}

/// Rejects an empty credential before any request is made.
///
/// # Errors
///
/// Returns an error if the key is blank.
pub fn check_api_key(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        bail!("GIANTBOMB_API_KEY is empty");
    }
    Ok(())
}
