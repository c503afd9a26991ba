//! Platform record data model.
//!
//! The platforms API imposes no fixed schema on its results, so a record is
//! a plain string-keyed mapping of JSON values. Fields are read by presence
//! and truthiness rather than through a typed struct.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Well-known field names.
pub mod fields {
    /// Platform release date, e.g. `"2000-03-04 00:00:00"`.
    pub const RELEASE_DATE: &str = "release_date";
    /// Launch price. Arrives as a string and is coerced to a float.
    pub const ORIGINAL_PRICE: &str = "original_price";
    /// Display name.
    pub const NAME: &str = "name";
    /// Short name, e.g. `"PS2"`.
    pub const ABBREVIATION: &str = "abbreviation";
}

/// A single platform entity as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`Record::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the field is present, even when null.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns true if the field is present and truthy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Returns the record's display name, if it has a non-empty one.
    pub fn name(&self) -> Option<&str> {
        self.get(fields::NAME)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns `original_price` when it is already numeric.
    pub fn price(&self) -> Option<f64> {
        self.get(fields::ORIGINAL_PRICE).and_then(Value::as_f64)
    }

    /// Replaces a non-empty string `original_price` with its float value.
    ///
    /// Returns `Ok(true)` when the field was converted and `Ok(false)` when
    /// there was nothing to convert (absent, null, empty or already
    /// numeric). The record is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrice`] if the string is not a finite number.
    pub fn coerce_price(&mut self) -> Result<bool> {
        let Some(Value::String(raw)) = self.0.get(fields::ORIGINAL_PRICE) else {
            return Ok(false);
        };
        if raw.is_empty() {
            return Ok(false);
        }

        let number = raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| Error::InvalidPrice { value: raw.clone() })?;

        self.0
            .insert(fields::ORIGINAL_PRICE.to_string(), Value::Number(number));
        Ok(true)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Object(record.0)
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::NotAnObject(kind_of(&other))),
        }
    }
}

/// JSON truthiness: null, `false`, zero, and empty strings, arrays and
/// objects are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn coerces_string_price_to_float() {
        let mut record = Record::new().with("original_price", "19.99");
        assert!(record.coerce_price().unwrap());
        assert_eq!(record.get("original_price"), Some(&json!(19.99)));
        assert_eq!(record.price(), Some(19.99));
    }

    #[test]
    fn leaves_missing_or_empty_price_alone() {
        let mut missing = Record::new().with("name", "PC");
        assert!(!missing.coerce_price().unwrap());
        assert!(!missing.contains("original_price"));

        let mut empty = Record::new().with("original_price", "");
        assert!(!empty.coerce_price().unwrap());
        assert_eq!(empty.get("original_price"), Some(&json!("")));

        let mut null = Record::new().with("original_price", Value::Null);
        assert!(!null.coerce_price().unwrap());
        assert_eq!(null.get("original_price"), Some(&Value::Null));
    }

    #[test]
    fn numeric_price_is_not_reconverted() {
        let mut record = Record::new().with("original_price", 299.0);
        assert!(!record.coerce_price().unwrap());
        assert_eq!(record.price(), Some(299.0));
    }

    #[test]
    fn garbage_price_is_an_error_and_untouched() {
        let mut record = Record::new().with("original_price", "free");
        let err = record.coerce_price().unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { ref value } if value == "free"));
        assert_eq!(record.get("original_price"), Some(&json!("free")));

        let mut infinite = Record::new().with("original_price", "inf");
        assert!(infinite.coerce_price().is_err());
    }

    #[test]
    fn surrounding_whitespace_is_accepted() {
        let mut record = Record::new().with("original_price", " 49.5 ");
        assert!(record.coerce_price().unwrap());
        assert_eq!(record.price(), Some(49.5));
    }

    #[test]
    fn record_from_non_object_fails() {
        let err = Record::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::NotAnObject("array")));
        assert!(Record::try_from(json!({"name": "PC"})).is_ok());
    }

    #[test]
    fn name_ignores_empty_and_non_string() {
        assert_eq!(Record::new().with("name", "Dreamcast").name(), Some("Dreamcast"));
        assert_eq!(Record::new().with("name", "").name(), None);
        assert_eq!(Record::new().with("name", 7).name(), None);
    }

    #[test]
    fn truthiness_table() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([null])));
    }

    proptest! {
        #[test]
        fn nonzero_numbers_are_truthy(n in any::<i64>().prop_filter("nonzero", |n| *n != 0)) {
            prop_assert!(is_truthy(&json!(n)));
        }

        #[test]
        fn non_empty_strings_are_truthy(s in ".+") {
            prop_assert!(is_truthy(&json!(s)));
        }

        #[test]
        fn finite_prices_survive_coercion(price in 0.0f64..10_000.0) {
            let mut record = Record::new().with("original_price", price.to_string());
            prop_assert!(record.coerce_price().unwrap());
            prop_assert_eq!(record.price(), Some(price));
        }
    }
}
