//! Inbound body decoding.
//!
//! Chat-style integrations send either a JSON body or a form-encoded body
//! whose `payload` field holds the JSON. Both decode to the same
//! [`InboundPayload`]. The raw JSON bytes are kept alongside the parsed
//! value so the mirror receives exactly what the sender produced.

use bytes::Bytes;
use serde_json::Value;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Form data must contain a \"payload\" field with JSON")]
    MissingFormPayload,

    #[error("Invalid JSON in payload field")]
    InvalidFormJson,

    #[error("Request body must be valid JSON")]
    InvalidJson,

    #[error("Request body cannot be empty")]
    Empty,

    #[error("Request body must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone)]
pub struct InboundPayload {
    /// Parsed payload. Always a non-empty JSON object.
    pub value: Value,
    /// The JSON text `value` was parsed from.
    pub raw: Bytes,
}

/// Decode a request body according to its `content-type`.
///
/// Anything that is not form-encoded is parsed as JSON regardless of the
/// declared type, since many senders omit or mislabel it.
pub fn decode(content_type: Option<&str>, body: &Bytes) -> Result<InboundPayload, DecodeError> {
    let is_form = content_type
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(FORM_CONTENT_TYPE));

    let (value, raw) = if is_form {
        let field = form_urlencoded::parse(body)
            .find(|(key, value)| key == "payload" && !value.is_empty())
            .map(|(_, value)| value.into_owned())
            .ok_or(DecodeError::MissingFormPayload)?;
        let value: Value =
            serde_json::from_str(&field).map_err(|_| DecodeError::InvalidFormJson)?;
        (value, Bytes::from(field))
    } else {
        let value: Value = serde_json::from_slice(body).map_err(|_| DecodeError::InvalidJson)?;
        (value, body.clone())
    };

    if is_blank(&value) {
        return Err(DecodeError::Empty);
    }
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    Ok(InboundPayload { value, raw })
}

/// JSON values a sender would consider "nothing": `null`, `false`, `0`, `""`, `[]`, `{}`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
