//! Parse-or-default decoding for device replies.
//!
//! Every reply schema is a plain serde struct with `#[serde(default)]` and
//! one of the lenient field helpers below on each field. A field that is
//! absent, `null`, or of the wrong shape decodes to its default instead of
//! failing the whole reply. A body that is not a JSON object at all decodes
//! to the schema's `Default`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("reply carried no JSON body")]
    MissingBody,
    #[error("malformed JSON body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("JSON body is not an object")]
    NotAnObject,
}

/// Slice a reply text from its first `{` to the end, trimmed.
pub fn extract_json_body(text: &str) -> Option<&str> {
    text.find('{').map(|start| text[start..].trim())
}

/// Strict decode of a body into a reply schema.
pub fn parse<T: DeserializeOwned>(body: Option<&str>) -> Result<T, DecodeError> {
    let body = body.ok_or(DecodeError::MissingBody)?;
    // Derived structs also accept arrays positionally; only objects count.
    match serde_json::from_str::<Value>(body)? {
        object @ Value::Object(_) => Ok(T::deserialize(object)?),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Decode a body, falling back to the schema default on any failure.
pub fn parse_or_default<T: DeserializeOwned + Default>(body: Option<&str>) -> T {
    parse(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "reply decode failed, using defaults");
        T::default()
    })
}

// ── Field helpers ─────────────────────────────────────────────────────────────

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Integer field: numbers or numeric strings; out of range for `T` is default.
pub fn int<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = Value::deserialize(de)?;
    Ok(as_i64(&value)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default())
}

/// Floating-point field: numbers or numeric strings.
pub fn float<'de, D>(de: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.map(|f| f as f32).unwrap_or_default())
}

/// Text field: any non-null value rendered as text.
pub fn text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
