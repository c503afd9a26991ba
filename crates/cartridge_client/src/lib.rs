//! Giant Bomb platforms client for Cartridge.
//!
//! This crate provides:
//! - Query option normalization into the API's wire parameters
//! - A lazy, page-at-a-time record sequence ([`Platforms`])
//! - A [`Transport`] seam with a `reqwest` implementation
//!
//! # Example
//!
//! ```rust,ignore
//! use cartridge_client::{Client, ClientConfig, QueryOptions};
//!
//! let client = Client::new(ClientConfig::with_api_key(key))?;
//! let options = QueryOptions::new().sort("name:asc").filter("name", "PC");
//! let mut platforms = client.fetch_platforms(&options);
//! while let Some(record) = platforms.next_record().await {
//!     let record = record?;
//!     // ...
//! }
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod error;
pub mod fixtures;
pub mod page;
pub mod platforms;
pub mod query;
pub mod transport;

pub use cartridge_record::Record;
pub use client::{Client, ClientConfig};
pub use error::{Error, Result};
pub use platforms::Platforms;
pub use query::QueryOptions;
pub use transport::{HttpTransport, Transport};
