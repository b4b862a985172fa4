//! Subject/body extraction from loosely-shaped chat webhook payloads.
//!
//! Senders put the interesting text in different places: a top-level
//! `text`, the first of several `attachments`, or a nested `message`. The
//! payload is kept as a [`serde_json::Value`] and read with optional
//! accessors; a field of the wrong JSON type counts as absent.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMessage {
    /// Thread subject. Empty means "post into the target without starting a thread".
    pub subject: String,
    /// Message body, markup not yet normalized. Never empty.
    pub body: String,
}

/// Derive `(subject, body)` from `payload`.
///
/// Fallback order: first attachment text, then the top-level `text` (which
/// clears the subject so the same string is not sent twice), then
/// `message.text`, then the whole payload serialized as JSON.
#[must_use]
pub fn extract(payload: &Value) -> ExtractedMessage {
    let raw_text = str_field(payload, "text").unwrap_or_default();
    let mut subject = heading_subject(raw_text);

    let mut body = first_attachment_text(payload).unwrap_or_default();

    if body.is_empty() {
        body = raw_text;
        subject.clear();
    }

    if body.is_empty() {
        body = payload
            .get("message")
            .and_then(|m| str_field(m, "text"))
            .unwrap_or_default();
    }

    let body = if body.is_empty() {
        payload.to_string()
    } else {
        body.to_string()
    };

    ExtractedMessage { subject, body }
}

/// Trimmed `text` with any markdown heading prefix (`#`, `##`, ...) removed.
fn heading_subject(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix('#') {
        Some(rest) => rest.trim_start_matches('#').trim().to_string(),
        None => trimmed.to_string(),
    }
}

fn first_attachment_text(payload: &Value) -> Option<&str> {
    payload
        .get("attachments")?
        .as_array()?
        .first()
        .and_then(|a| str_field(a, "text"))
        .filter(|t| !t.is_empty())
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
