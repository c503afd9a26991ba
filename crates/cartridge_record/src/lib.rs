//! Platform record model for Cartridge.
//!
//! This crate provides:
//! - The loosely-typed [`Record`] mapping returned by the platforms API
//! - JSON truthiness rules shared by the client and the validator
//! - Record validation ([`is_valid_record`], [`validate_record`])
//! - Loading record dumps from JSON or NDJSON files
//!
//! # Example
//!
//! ```rust,ignore
//! use cartridge_record::{is_valid_record, Record};
//!
//! let records: Vec<Record> = cartridge_record::loader::parse_records(&dump)?;
//! let usable: Vec<_> = records.into_iter().filter(is_valid_record).collect();
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod fixtures;
pub mod loader;
pub mod record;
pub mod validate;

pub use error::{Error, Result};
pub use record::{is_truthy, Record};
pub use validate::{is_valid_record, validate_record, Field, Rejection};
