//! Shape checks applied to raw JSON responses

use crate::error::ApiError;
use crate::types::SearchResponse;
use serde_json::Value;

/// A collection response must be a JSON array
pub fn array(value: Value, url: &str) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ApiError::Shape {
            url: url.to_string(),
            expected: "a JSON array",
        }),
    }
}

pub fn search_response(value: Value, url: &str) -> Result<SearchResponse, ApiError> {
    if !value.is_object() {
        return Err(ApiError::Shape {
            url: url.to_string(),
            expected: "a JSON object",
        });
    }
    serde_json::from_value(value).map_err(|e| ApiError::decode(url, e))
}
