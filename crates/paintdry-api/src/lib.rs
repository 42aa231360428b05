//! # paintdry-api
//!
//! Read-only client for the paintdry backend. The backend exposes collections of
//! monitored resources, observations, changes and history, a full-text search
//! endpoint and the (non-secret) configuration document.
//!
//! The [`Backend`] trait is the seam the browser talks through; [`ApiClient`] is the
//! HTTP implementation.

pub mod client;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod types;

pub use client::{ApiClient, Backend};
pub use endpoint::join_endpoint;
pub use error::ApiError;
pub use types::{ResultKind, SearchRequest, SearchResponse, SearchResult};

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "PAINTDRY_API_URL";

/// Base URL used when nothing else is configured (the backend's default listen address)
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

pub const SEARCH_ENDPOINT: &str = "/api/search";
pub const CONFIG_ENDPOINT: &str = "/api/config";
