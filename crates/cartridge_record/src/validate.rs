//! Record validation.
//!
//! A record is usable downstream only when it carries a release date, a
//! non-zero price, a name and an abbreviation. Validation is a pure check;
//! the caller decides what to do with rejected records.

use crate::record::{fields, Record};
use std::fmt;
use tracing::debug;

/// A field required for a record to be usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `release_date`
    ReleaseDate,
    /// `original_price`
    OriginalPrice,
    /// `name`
    Name,
    /// `abbreviation`
    Abbreviation,
}

impl Field {
    /// Required fields in the order they are checked.
    pub const REQUIRED: [Self; 4] = [
        Self::ReleaseDate,
        Self::OriginalPrice,
        Self::Name,
        Self::Abbreviation,
    ];

    /// The wire name of this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ReleaseDate => fields::RELEASE_DATE,
            Self::OriginalPrice => fields::ORIGINAL_PRICE,
            Self::Name => fields::NAME,
            Self::Abbreviation => fields::ABBREVIATION,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a record was rejected: the first required field found missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The missing or falsy field.
    pub field: Field,
    /// The record's name, when it has one.
    pub name: Option<String>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "skipping {name}: missing {}", self.field),
            None => write!(f, "skipping unnamed record: missing {}", self.field),
        }
    }
}

/// Checks the required fields in order and reports the first failure.
///
/// # Errors
///
/// Returns a [`Rejection`] naming the first required field that is absent,
/// null, empty or otherwise falsy.
pub fn validate_record(record: &Record) -> Result<(), Rejection> {
    Field::REQUIRED
        .into_iter()
        .find(|field| !record.is_truthy(field.key()))
        .map_or(Ok(()), |field| {
            Err(Rejection {
                field,
                name: record.name().map(str::to_string),
            })
        })
}

/// Returns true if the record has every required field.
///
/// Logs the rejection reason at debug level when it returns false.
pub fn is_valid_record(record: &Record) -> bool {
    match validate_record(record) {
        Ok(()) => true,
        Err(rejection) => {
            debug!(field = rejection.field.key(), "{}", rejection);
            false
        }
    }
}
