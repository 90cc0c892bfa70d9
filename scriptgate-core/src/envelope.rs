use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// The gateway's uniform JSON response wrapper.
///
/// Every response the gateway authors itself uses this shape. Script output
/// that is forwarded verbatim does not go through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct ApiEnvelope {
    /// `true` only for successful outcomes.
    pub status: bool,
    /// Mirrors the HTTP status code of the response.
    pub code: u16,
    /// Short human-readable summary.
    pub message: String,
    /// Optional payload or error detail, serialized as a `data` or `error` key.
    #[serde(flatten)]
    pub detail: Option<Detail>,
}

/// Mutually exclusive extra field of an [`ApiEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Detail {
    /// Successful payload, serialized as `"data"`.
    #[serde(rename = "data")]
    Data(Value),
    /// Failure description, serialized as `"error"`.
    #[serde(rename = "error")]
    Error(String),
}

impl ApiEnvelope {
    /// A failed envelope with an `error` field.
    ///
    /// An empty `error` string is omitted from the wire form.
    pub fn failure(code: u16, message: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            status: false,
            code,
            message: message.into(),
            detail: (!error.is_empty()).then_some(Detail::Error(error)),
        }
    }

    /// Returns the `error` field, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.detail {
            Some(Detail::Error(e)) => Some(e),
            _ => None,
        }
    }

    /// Serialize to the wire form.
    ///
    /// # Errors
    /// Returns [`CoreError::Serialize`] if the payload cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Serialize)
    }
}

/// Returns `true` if `bytes` hold exactly one well-formed JSON value.
///
/// Leading and trailing whitespace is accepted, trailing garbage is not.
#[must_use]
pub fn is_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde::de::IgnoredAny>(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_value(env: &ApiEnvelope) -> Value {
        match serde_json::to_value(env) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        }
    }

    #[test]
    fn failure_envelope_has_error_and_no_data() {
        let env = ApiEnvelope::failure(401, "Unauthorized", "Invalid token");
        let v = to_value(&env);
        assert_eq!(
            v,
            json!({"status": false, "code": 401, "message": "Unauthorized", "error": "Invalid token"})
        );
    }

    #[test]
    fn success_envelope_has_data_and_no_error() {
        let env = ApiEnvelope {
            status: true,
            code: 200,
            message: "ok".to_owned(),
            detail: Some(Detail::Data(json!({"user": "a"}))),
        };
        let v = to_value(&env);
        assert_eq!(v["data"]["user"], "a");
        assert!(v.get("error").is_none(), "success must not carry an error key");
    }

    #[test]
    fn empty_error_is_omitted() {
        let env = ApiEnvelope::failure(500, "Internal Script Error", "");
        let v = to_value(&env);
        assert!(v.get("error").is_none());
        assert!(v.get("data").is_none());
        assert_eq!(env.error(), None);
    }

    #[test]
    fn wire_form_is_compact_json() {
        let env = ApiEnvelope::failure(504, "Execution timed out", "Script took too long");
        let bytes = match env.to_bytes() {
            Ok(b) => b,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert!(is_json(&bytes));
        assert_eq!(
            String::from_utf8_lossy(&bytes),
            r#"{"status":false,"code":504,"message":"Execution timed out","error":"Script took too long"}"#
        );
    }

    #[test]
    fn is_json_accepts_objects_and_scalars() {
        assert!(is_json(br#"{"ok":true}"#));
        assert!(is_json(b"  [1, 2]\n"));
        assert!(is_json(b"42"));
    }

    #[test]
    fn is_json_rejects_plain_text_and_trailing_garbage() {
        assert!(!is_json(b"plain text oops"));
        assert!(!is_json(b""));
        assert!(!is_json(br#"{"ok":true} trailing"#));
    }
}
