//! Request Field Access and Coercion
//!
//! Request bodies arrive as arbitrary JSON. Clients send numbers, numeric
//! strings and occasionally booleans for the same field, so every read goes
//! through a coercion step before a model ever sees the value.

use crate::error::ValidationError;
use serde_json::{Map, Value};
use tracing::debug;

/// Loosely-typed request payload
#[derive(Debug, Clone, Default)]
pub struct RequestFields {
    fields: Map<String, Value>,
}

impl RequestFields {
    /// Wrap an already-parsed JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Accept any JSON value, rejecting everything that is not an object
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ValidationError::InvalidFormat(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::InvalidFormat(e.to_string()))?;
        Self::from_value(value)
    }

    /// Raw value for a field, `None` when absent
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of fields in the payload
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read a field that must be present, non-null and numeric
    pub fn require_f64(&self, name: &'static str) -> Result<f64, ValidationError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => {
                debug!(field = name, "required field missing");
                Err(ValidationError::MissingField(name))
            }
            Some(value) => coerce_f64(value).ok_or_else(|| invalid(name, value)),
        }
    }

    /// Read an optional numeric field.
    ///
    /// An absent field takes `default`. A field that is present but null is
    /// an error, not a default.
    pub fn f64_or(&self, name: &'static str, default: f64) -> Result<f64, ValidationError> {
        match self.fields.get(name) {
            None => Ok(default),
            Some(value) => coerce_f64(value).ok_or_else(|| invalid(name, value)),
        }
    }

    /// Read an optional integer field; fractional numbers are truncated
    pub fn i64_or(&self, name: &'static str, default: i64) -> Result<i64, ValidationError> {
        match self.fields.get(name) {
            None => Ok(default),
            Some(value) => coerce_i64(value).ok_or_else(|| invalid(name, value)),
        }
    }

    /// Read an optional categorical field, rendering non-strings as text
    pub fn text_or(&self, name: &str, default: &str) -> String {
        match self.fields.get(name) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) => "None".to_string(),
            Some(Value::Bool(true)) => "True".to_string(),
            Some(Value::Bool(false)) => "False".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for RequestFields {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Convert a JSON value to `f64` the way a lenient form handler would
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Convert a JSON value to `i64`. Strings must hold an integer literal.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn invalid(field: &'static str, value: &Value) -> ValidationError {
    ValidationError::InvalidNumber {
        field,
        value: value.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
