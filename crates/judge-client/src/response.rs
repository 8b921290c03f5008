//! Decoding of the judge's JSON envelope
//!
//! Successful calls answer `{"status": "ok", ...}`; failures answer
//! `{"status": "error", "error": "...", "errorname": "..."}`, usually with
//! a 4xx code.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Turn a raw response into its JSON body or an [`Error::Api`].
pub(crate) fn decode(endpoint: &str, http_status: u16, body: &str) -> Result<Value> {
    let success = (200..300).contains(&http_status);
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if success => {
            return Err(Error::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            });
        }
        Err(_) => {
            return Err(Error::Api {
                endpoint: endpoint.to_string(),
                name: http_status.to_string(),
                message: body.trim().to_string(),
                http_status,
            });
        }
    };

    if success && value.get("status").and_then(Value::as_str) != Some("error") {
        return Ok(value);
    }

    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    Err(Error::Api {
        endpoint: endpoint.to_string(),
        name: text("errorname").unwrap_or_else(|| http_status.to_string()),
        message: text("error").unwrap_or_else(|| body.trim().to_string()),
        http_status,
    })
}

/// Deserialize a decoded body into `T`.
pub(crate) fn parse<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
