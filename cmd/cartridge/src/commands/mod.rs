//! Command implementations.

pub mod fetch;
pub mod validate;
