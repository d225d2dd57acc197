//! `/predict` wire format.
//!
//! Request: `{"image": "<data URI>"}`.
//! Response: `{"error": "..."}` or `{"prediction": <any>, "confidence": <number>}`.
//!
//! The response is interpreted loosely, the way the page script reads it:
//! `error` counts only when truthy, and the prediction / confidence values
//! are stringified the way a JavaScript template literal would show them.

use crate::status::Status;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Route the page posts to, relative to its origin.
pub const PREDICT_PATH: &str = "/predict";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub image: String,
}

impl PredictRequest {
    pub fn to_json(&self) -> String {
        // A single string field cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A well-formed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictResponse {
    /// The server rejected the image.
    Error(String),
    /// The server classified the image.
    Prediction { label: String, confidence: String },
}

impl PredictResponse {
    /// Interpret a raw JSON body.
    ///
    /// # Errors
    /// `TransportError::Malformed` if the body is not a JSON object. Any
    /// object without a truthy `error` is a prediction; missing fields
    /// render as `undefined`.
    pub fn from_body(body: &str) -> Result<Self, TransportError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| TransportError::Malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, TransportError> {
        let Value::Object(map) = value else {
            return Err(TransportError::Malformed(format!(
                "expected a JSON object, got {value}"
            )));
        };

        if let Some(error) = map.get("error")
            && is_truthy(error)
        {
            return Ok(Self::Error(js_string(error)));
        }

        Ok(Self::Prediction {
            label: field_string(map.get("prediction")),
            confidence: field_string(map.get("confidence")),
        })
    }

    /// Status line to show for this response.
    pub fn status(&self) -> Status {
        match self {
            Self::Error(message) => Status::server_error(message),
            Self::Prediction { label, confidence } => Status::prediction(label, confidence),
        }
    }
}

/// Anything that kept a submit from producing a well-formed response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A possibly missing field, as a template literal would show it.
fn field_string(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), js_string)
}

/// Stringify a JSON value the way a template literal would.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                js_number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `Number.prototype.toString`: plain decimals in `[1e-6, 1e21)`,
/// exponent form outside.
fn js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&f.abs()) {
        return f.to_string();
    }
    let exp_form = format!("{f:e}");
    match exp_form.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exp_form,
    }
}
