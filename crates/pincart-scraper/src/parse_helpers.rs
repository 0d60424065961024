//! Field coercion for loosely-typed upstream JSON.
//!
//! Backends disagree on whether prices are numbers or strings, whether flags
//! are booleans or `"true"`, and whether IDs are strings or integers. These
//! helpers give every adapter the same answers.

use pincart_core::products::{accept_price, parse_price};
use serde_json::Value;

use crate::error::RecordError;

/// Trimmed, non-empty string at `key`.
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// A string or number value, rendered as a trimmed string. Integral floats are
/// rendered without a fractional part.
pub(crate) fn string_like(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interprets `true`, `"true"` (any case) as set; everything else as unset.
pub(crate) fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Optional price at `key`.
///
/// Absent or `null` is `Ok(None)`. A number or numeric string must be finite
/// and strictly positive, otherwise the whole record is rejected.
pub(crate) fn price_field(
    value: &Value,
    key: &'static str,
    record: &str,
) -> Result<Option<f64>, RecordError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => coerce_price(raw)
            .map(Some)
            .ok_or_else(|| RecordError::new(record, key, format!("is not a positive price: {raw}"))),
    }
}

/// Required price at `key`: absent, `null` and empty string are all errors.
pub(crate) fn required_price_field(
    value: &Value,
    key: &'static str,
    record: &str,
) -> Result<f64, RecordError> {
    price_field(value, key, record)?
        .ok_or_else(|| RecordError::new(record, key, "is missing"))
}

fn coerce_price(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().and_then(accept_price),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn str_field_trims_and_filters_empty() {
        let v = json!({"a": "  milk ", "b": "   ", "c": 3});
        assert_eq!(str_field(&v, "a"), Some("milk"));
        assert_eq!(str_field(&v, "b"), None);
        assert_eq!(str_field(&v, "c"), None);
        assert_eq!(str_field(&v, "missing"), None);
    }

    #[test]
    fn string_like_accepts_numbers() {
        assert_eq!(string_like(&json!(8901262010016_u64)), Some("8901262010016".into()));
        assert_eq!(string_like(&json!("490001")), Some("490001".into()));
        assert_eq!(string_like(&json!(null)), None);
        assert_eq!(string_like(&json!("")), None);
    }

    #[test]
    fn flag_accepts_bool_and_string() {
        assert!(flag(Some(&json!(true))));
        assert!(flag(Some(&json!("true"))));
        assert!(flag(Some(&json!("TRUE"))));
        assert!(!flag(Some(&json!("false"))));
        assert!(!flag(Some(&json!(1))));
        assert!(!flag(None));
    }

    #[test]
    fn price_field_parses_number_and_string() {
        let v = json!({"n": 27, "s": "45.50"});
        assert_eq!(price_field(&v, "n", "r"), Ok(Some(27.0)));
        assert_eq!(price_field(&v, "s", "r"), Ok(Some(45.5)));
    }

    #[test]
    fn price_field_null_or_absent_is_none() {
        let v = json!({"n": null});
        assert_eq!(price_field(&v, "n", "r"), Ok(None));
        assert_eq!(price_field(&v, "missing", "r"), Ok(None));
    }

    #[test]
    fn price_field_garbage_is_error() {
        let v = json!({"s": "N/A", "neg": -1, "b": true});
        assert!(price_field(&v, "s", "r").is_err());
        assert!(price_field(&v, "neg", "r").is_err());
        assert!(price_field(&v, "b", "r").is_err());
    }

    #[test]
    fn required_price_field_missing_is_error() {
        let v = json!({});
        let err = required_price_field(&v, "priceMRP", "sku 1").unwrap_err();
        assert_eq!(err.field, "priceMRP");
        assert_eq!(err.reason, "is missing");
    }
}
