//! Inbound order validation.
//!
//! [`validate`] is a pure function from raw payload bytes to either an [`Order`] or the
//! first [`RejectReason`] found. Checks run in a fixed priority, so a payload that is
//! wrong in several ways always reports the same reason:
//!
//! 1. **parse**: UTF-8, then a JSON object
//! 2. **presence**: `food` and `table` exist and are not falsy
//! 3. **type**: `table` is a positive integer, then `food` is a string
//! 4. **emptiness**: `food` is not blank after trimming

pub mod error;

pub use error::*;

use crate::model::Order;
use serde_json::{Map, Value};
use std::num::NonZeroU64;

pub const FOOD_FIELD: &str = "food";
pub const TABLE_FIELD: &str = "table";

/// Validates an inbound order payload.
pub fn validate(payload: &[u8]) -> Result<Order, RejectReason> {
    let text =
        std::str::from_utf8(payload).map_err(|e| RejectReason::MalformedPayload(e.to_string()))?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| RejectReason::MalformedPayload(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(RejectReason::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    };

    let food = present(&fields, FOOD_FIELD)?;
    let table = present(&fields, TABLE_FIELD)?;

    let table = table
        .as_u64()
        .and_then(NonZeroU64::new)
        .ok_or(RejectReason::WrongType(TABLE_FIELD))?;
    let Value::String(food) = food else {
        return Err(RejectReason::WrongType(FOOD_FIELD));
    };

    let food = food.trim();
    if food.is_empty() {
        return Err(RejectReason::EmptyFood);
    }

    Ok(Order::new(food, table))
}

fn present<'a>(
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, RejectReason> {
    match fields.get(name) {
        Some(value) if !is_falsy(value) => Ok(value),
        _ => Err(RejectReason::MissingField(name)),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(payload: &str) -> RejectReason {
        validate(payload.as_bytes()).unwrap_err()
    }

    #[test]
    fn accepts_valid_order() {
        let order = validate(br#"{"food": "pizza", "table": 5}"#).unwrap();
        assert_eq!(order.food(), "pizza");
        assert_eq!(order.table(), 5);
    }

    #[test]
    fn trims_food_and_ignores_extra_fields() {
        let order = validate(br#"{"food": "  ramen ", "table": 12, "note": "extra"}"#).unwrap();
        assert_eq!(order.food(), "ramen");
        assert_eq!(order.table(), 12);
    }

    #[test]
    fn rejects_unparseable_payloads() {
        assert!(matches!(reject("not a json"), RejectReason::MalformedPayload(_)));
        assert!(matches!(reject(""), RejectReason::MalformedPayload(_)));
        assert!(matches!(reject(r#"["pizza", 5]"#), RejectReason::MalformedPayload(_)));
        assert!(matches!(
            validate(b"{\"food\": \"\xff\", \"table\": 1}").unwrap_err(),
            RejectReason::MalformedPayload(_)
        ));
    }

    #[test]
    fn rejects_missing_or_falsy_fields() {
        assert_eq!(reject(r#"{"food": "burger"}"#), RejectReason::MissingField("table"));
        assert_eq!(reject(r#"{"table": 3}"#), RejectReason::MissingField("food"));
        assert_eq!(reject(r#"{"food": "", "table": 3}"#), RejectReason::MissingField("food"));
        assert_eq!(reject(r#"{"food": null, "table": 3}"#), RejectReason::MissingField("food"));
        assert_eq!(reject(r#"{"food": "tea", "table": 0}"#), RejectReason::MissingField("table"));
        assert_eq!(
            reject(r#"{"food": "tea", "table": false}"#),
            RejectReason::MissingField("table")
        );
    }

    #[test]
    fn rejects_wrong_types() {
        assert_eq!(
            reject(r#"{"food": "burger", "table": "not an int"}"#),
            RejectReason::WrongType("table")
        );
        assert_eq!(reject(r#"{"food": "burger", "table": 2.5}"#), RejectReason::WrongType("table"));
        assert_eq!(reject(r#"{"food": "burger", "table": -4}"#), RejectReason::WrongType("table"));
        assert_eq!(
            reject(r#"{"food": "burger", "table": true}"#),
            RejectReason::WrongType("table")
        );
        assert_eq!(reject(r#"{"food": 42, "table": 4}"#), RejectReason::WrongType("food"));
        assert_eq!(reject(r#"{"food": ["fries"], "table": 4}"#), RejectReason::WrongType("food"));
    }

    #[test]
    fn rejects_blank_food() {
        assert_eq!(reject(r#"{"food": "  ", "table": 4}"#), RejectReason::EmptyFood);
        assert_eq!(reject(r#"{"food": "\t\n", "table": 4}"#), RejectReason::EmptyFood);
    }

    #[test]
    fn reports_checks_in_priority_order() {
        // presence before type
        assert_eq!(reject(r#"{"food": 7}"#), RejectReason::MissingField("table"));
        // table type before food type
        assert_eq!(reject(r#"{"food": 7, "table": "x"}"#), RejectReason::WrongType("table"));
        // type before emptiness
        assert_eq!(reject(r#"{"food": "  ", "table": "x"}"#), RejectReason::WrongType("table"));
    }
}
