use serde::Deserialize;
use serde_json::Value;

/// Error body sent by the analysis service on a failure status.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    // this describes the reason for the error, can be directly shown to the user
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The `detail` field as display text, if the body carried a usable one.
    pub fn detail(body: &[u8]) -> Option<String> {
        let value: Value = serde_json::from_slice(body).ok()?;
        // a struct would also accept a JSON array positionally
        if !value.is_object() {
            return None;
        }
        let parsed = ErrorBody::deserialize(value).ok()?;
        match parsed.detail? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
