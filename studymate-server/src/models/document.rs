//! Schemaless JSON documents
//!
//! Both collections store caller-supplied JSON objects. The storage layer
//! owns the identifier, which is rendered back as `_id`.

use std::cmp::Ordering;

use serde_json::{Map, Value as JsonValue};

use super::ValidationError;

/// A stored JSON object
pub type Document = Map<String, JsonValue>;

/// Field name used for the storage-assigned identifier
pub const ID_FIELD: &str = "_id";

/// Turn a request body into a document ready for insertion.
///
/// The body must be a JSON object. Any caller-supplied `_id` is dropped,
/// since identifiers are assigned by storage.
pub fn into_document(body: JsonValue) -> Result<Document, ValidationError> {
    match body {
        JsonValue::Object(mut doc) => {
            doc.remove(ID_FIELD);
            Ok(doc)
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "body",
            reason: "must be a JSON object",
        }),
    }
}

/// JavaScript-style truthiness of a JSON value.
///
/// `null`, `false`, `0`, and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Order two optional field values the way PostgreSQL orders `jsonb`:
/// missing < null < string < number < boolean < array < object.
///
/// Values of the same container type compare equal.
pub fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    fn rank(value: Option<&JsonValue>) -> u8 {
        match value {
            None => 0,
            Some(JsonValue::Null) => 1,
            Some(JsonValue::String(_)) => 2,
            Some(JsonValue::Number(_)) => 3,
            Some(JsonValue::Bool(_)) => 4,
            Some(JsonValue::Array(_)) => 5,
            Some(JsonValue::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
