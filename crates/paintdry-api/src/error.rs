use thiserror::Error;

/// Everything that can go wrong while talking to the backend.
///
/// Variants map onto the three failure families a fetching view can observe:
/// transport failures, malformed or unexpected payloads, and missing records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} was not found")]
    NotFound { url: String },

    #[error("malformed JSON from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("unexpected response from {url}: expected {expected}")]
    Shape { url: String, expected: &'static str },
}

impl ApiError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(url: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
