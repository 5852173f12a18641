use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::services::error::{ApiError, ApiResult};
use crate::utils::constants::CANNOT_CONNECT_MSG;

/// Envelope keys the backend is known to wrap single resources in. A
/// one-key object under any of these unwraps to the inner value; everything
/// else passes through untouched.
pub const ENVELOPE_KEYS: [&str; 11] = [
    "user",
    "token",
    "test_item",
    "test_items",
    "study",
    "studies",
    "facility_doc",
    "facility_docs",
    "data",
    "result",
    "items",
];

/// Decode one HTTP exchange into the uniform result. The body always
/// arrives as raw text so a malformed payload never throws mid-decode.
pub fn decode_response(status: u16, status_text: &str, body: &str) -> ApiResult<Value> {
    let ok = (200..300).contains(&status);

    if body.is_empty() {
        if !ok {
            return Err(ApiError::Http {
                status,
                message: format!("Error: {} {}", status, status_text),
            });
        }
        // success with no body: explicit no-value marker
        return Ok(Value::Null);
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            if !ok {
                return Err(ApiError::Http {
                    status,
                    message: body.to_string(),
                });
            }
            // a 2xx is expected to always carry parseable JSON; this is a
            // server contract violation, not a client bug
            return Err(ApiError::Protocol(
                "Invalid JSON response from server".to_string(),
            ));
        }
    };

    if !ok {
        let message = extract_error_message(&parsed)
            .unwrap_or_else(|| format!("Error: {} {}", status, status_text));
        return Err(ApiError::Http { status, message });
    }

    Ok(unwrap_envelope(parsed))
}

/// Pull the human-readable message out of a failing body, in the priority
/// order the backend has historically used.
fn extract_error_message(parsed: &Value) -> Option<String> {
    for key in ["error", "message", "detail"] {
        if let Some(message) = parsed.get(key).and_then(Value::as_str) {
            return Some(message.to_string());
        }
    }
    None
}

/// Strip a known single-key envelope. Multi-key objects, arrays and
/// scalars are returned unchanged.
pub fn unwrap_envelope(value: Value) -> Value {
    if let Value::Object(map) = value {
        if map.len() == 1 {
            if let Some((key, inner)) = map.into_iter().next() {
                if ENVELOPE_KEYS.contains(&key.as_str()) {
                    return inner;
                }
                let mut original = serde_json::Map::with_capacity(1);
                original.insert(key, inner);
                return Value::Object(original);
            }
            return Value::Object(serde_json::Map::new());
        }
        return Value::Object(map);
    }
    value
}

/// Classify an exception thrown before any response was obtained.
pub fn classify_fetch_error(message: &str) -> ApiError {
    if message.contains("Failed to fetch") || message.contains("NetworkError") {
        return ApiError::Network(CANNOT_CONNECT_MSG.to_string());
    }
    ApiError::Network(message.to_string())
}

/// Decode a normalized value into its domain type. Shape mismatches on a
/// success payload are protocol errors.
pub fn decode_into<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Protocol(format!("Unexpected response shape: {}", e)))
}
