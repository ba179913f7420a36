//! The uniform `{status, code, message, data}` reply shape.
//!
//! Every backend reply, success or failure, is decoded into an [`Envelope`]
//! before the client branches on it. Bodies that are not envelopes are
//! handled as follows:
//! - empty success body: envelope with `data = null`;
//! - undecodable success body: [`RequestError::DecodeJson`];
//! - undecodable failure body: an envelope is synthesised from the HTTP status
//!   and the body text so callers always have one to branch on.

use std::fmt;
use std::hash::{Hash, Hasher};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RequestError;

/// Application-level response code, distinct from the HTTP status.
///
/// The backend sends either numbers or strings. A number and its decimal
/// string form compare equal, so `ApiCode::Number(40101)` matches a reply
/// carrying `"40101"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiCode {
    /// Numeric code, e.g. `40101`.
    Number(i64),
    /// Textual code, e.g. `"ACCESS_TOKEN_EXPIRED"`.
    Text(String),
}

impl ApiCode {
    /// Numeric value of this code, parsing textual codes when possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ApiCode::Number(n) => Some(*n),
            ApiCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl PartialEq for ApiCode {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.to_string() == other.to_string(),
            _ => false,
        }
    }
}

impl Eq for ApiCode {}

impl Hash for ApiCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_i64() {
            Some(n) => n.hash(state),
            None => self.to_string().hash(state),
        }
    }
}

impl fmt::Display for ApiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiCode::Number(n) => write!(f, "{n}"),
            ApiCode::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ApiCode {
    fn from(n: i64) -> Self {
        ApiCode::Number(n)
    }
}

impl From<&str> for ApiCode {
    fn from(s: &str) -> Self {
        ApiCode::Text(s.to_string())
    }
}

/// Uniform reply wrapper: `{ status, code, message, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Status echoed by the server. Defaults to the HTTP status when absent.
    #[serde(default)]
    pub status: u16,
    /// Application code the client branches on.
    #[serde(default)]
    pub code: Option<ApiCode>,
    /// Human-readable message from the server (not localized by the client).
    #[serde(default)]
    pub message: String,
    /// Endpoint specific payload.
    pub data: T,
}

impl Envelope<Value> {
    /// Decode a raw reply body into an envelope with untyped `data`.
    pub(crate) fn decode(status: StatusCode, body: &[u8]) -> Result<Self, RequestError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::synthesize(status, String::new()));
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(raw @ Value::Object(_)) => Ok(Self::from_fields(status, &raw)),
            _ if status.is_success() => Err(RequestError::DecodeJson {
                message: format!("reply is not a response envelope ({status})"),
            }),
            _ => Ok(Self::synthesize(
                status,
                String::from_utf8_lossy(body).trim().to_string(),
            )),
        }
    }

    /// Pick the envelope fields out of a JSON object, tolerating odd types.
    fn from_fields(status: StatusCode, raw: &Value) -> Self {
        let field = |name: &str| raw.get(name).cloned().unwrap_or(Value::Null);
        let code = match field("code") {
            Value::Number(n) => n.as_i64().map(ApiCode::Number),
            Value::String(s) => Some(ApiCode::Text(s)),
            _ => None,
        };
        let message = match field("message") {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let status = field("status")
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
            .filter(|s| *s != 0)
            .unwrap_or(status.as_u16());
        Envelope {
            status,
            code,
            message,
            data: field("data"),
        }
    }

    /// Envelope standing in for a reply that did not carry one.
    fn synthesize(status: StatusCode, text: String) -> Self {
        let message = if text.is_empty() && !status.is_success() {
            status.canonical_reason().unwrap_or("Unknown Error").to_string()
        } else {
            text
        };
        Envelope {
            status: status.as_u16(),
            code: None,
            message,
            data: Value::Null,
        }
    }

    /// Decode `data` into the caller's type, keeping the other fields.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Envelope<T>, RequestError> {
        let data = serde_json::from_value(self.data)?;
        Ok(Envelope {
            status: self.status,
            code: self.code,
            message: self.message,
            data,
        })
    }
}
