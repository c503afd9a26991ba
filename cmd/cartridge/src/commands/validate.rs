//! Validate command implementation.

use anyhow::{bail, Context, Result};
use cartridge_record::{loader, validate_record, Field, Record, Rejection};
use tracing::{info, warn};

/// Runs the validate command.
pub fn run(path: &str, strict: bool) -> Result<()> {
    info!("Validating records in: {}", path);

    let records =
        loader::load_file(path).with_context(|| format!("Failed to load records: {path}"))?;
    let report = ValidationReport::from_records(&records);

    for (index, rejection) in &report.rejections {
        warn!("record {}: {}", index, rejection);
    }
    for (field, count) in report.by_field() {
        info!("{} record(s) missing {}", count, field);
    }
    info!(
        "{} of {} records valid",
        report.valid,
        report.valid + report.rejections.len()
    );

    if strict && !report.rejections.is_empty() {
        bail!("{} invalid record(s) in {path}", report.rejections.len());
    }
    Ok(())
}

/// Outcome of validating a batch of records.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Number of valid records.
    pub valid: usize,
    /// Rejections keyed by record position.
    pub rejections: Vec<(usize, Rejection)>,
}

impl ValidationReport {
    /// Validates every record.
    pub fn from_records(records: &[Record]) -> Self {
        let mut report = Self::default();
        for (index, record) in records.iter().enumerate() {
            match validate_record(record) {
                Ok(()) => report.valid += 1,
                Err(rejection) => report.rejections.push((index, rejection)),
            }
        }
        report
    }

    /// Rejection counts per missing field, in check order.
    pub fn by_field(&self) -> Vec<(Field, usize)> {
        Field::REQUIRED
            .into_iter()
            .filter_map(|field| {
                let count = self
                    .rejections
                    .iter()
                    .filter(|(_, rejection)| rejection.field == field)
                    .count();
                (count > 0).then_some((field, count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartridge_record::fixtures::platform_records;

    #[test]
    fn report_counts_valid_and_rejected() {
        let records = vec![
            Record::new()
                .with("release_date", "2001-01-01")
                .with("original_price", 19.99)
                .with("name", "X")
                .with("abbreviation", "X"),
            Record::new(),
            Record::new().with("release_date", "2001-01-01").with("name", "Y"),
        ];

        let report = ValidationReport::from_records(&records);
        assert_eq!(report.valid, 1);
        assert_eq!(report.rejections.len(), 2);
        assert_eq!(report.rejections[0].0, 1);
        assert_eq!(report.rejections[1].1.name.as_deref(), Some("Y"));
        assert_eq!(
            report.by_field(),
            vec![(Field::ReleaseDate, 1), (Field::OriginalPrice, 1)]
        );
    }

    #[test]
    fn fixture_batch_adds_up() {
        let records = platform_records(9, 200);
        let report = ValidationReport::from_records(&records);
        assert_eq!(report.valid + report.rejections.len(), 200);
        let by_field_total: usize = report.by_field().iter().map(|(_, n)| n).sum();
        assert_eq!(by_field_total, report.rejections.len());
    }

    #[test]
    fn strict_mode_fails_on_invalid_dump() {
        let path = std::env::temp_dir()
            .join(format!("cartridge-validate-{}.ndjson", std::process::id()));
        std::fs::write(&path, "{\"name\": \"PC\"}\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        assert!(run(&path_str, false).is_ok());
        assert!(run(&path_str, true).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
