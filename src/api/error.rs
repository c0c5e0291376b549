//! 123pan reply envelope and status codes.
//!
//! Every endpoint answers `{"code": .., "message": .., "data": ..}`.

use serde_json::Value;

use crate::error::{PanError, Result};

/// Status codes with a fixed meaning across endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// Regular success
    Ok,
    /// Success code used by the sign-in endpoint
    SignedIn,
    /// Token missing or expired
    Unauthorized,
    /// Any other code
    Other(i64),
}

impl From<i64> for ApiStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => ApiStatus::Ok,
            200 => ApiStatus::SignedIn,
            401 => ApiStatus::Unauthorized,
            other => ApiStatus::Other(other),
        }
    }
}

impl ApiStatus {
    /// Numeric code as sent by the server.
    pub fn code(&self) -> i64 {
        match self {
            ApiStatus::Ok => 0,
            ApiStatus::SignedIn => 200,
            ApiStatus::Unauthorized => 401,
            ApiStatus::Other(code) => *code,
        }
    }
}

/// Split a reply into its `data` member, or an [`PanError::Api`] if `code`
/// is not one of `accepted`.
pub(crate) fn unwrap_envelope(reply: Value, accepted: &[ApiStatus]) -> Result<Value> {
    let code = reply
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| PanError::InvalidResponse("reply has no code".to_string()))?;

    if !accepted.contains(&ApiStatus::from(code)) {
        let message = reply
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        return Err(PanError::Api { code, message });
    }

    match reply {
        Value::Object(mut map) => Ok(map.remove("data").unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}
