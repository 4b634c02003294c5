// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for daily-word
//!
//! This module defines all error types used throughout the service.

use thiserror::Error;

/// Main error type for daily-word operations
#[derive(Error, Debug)]
pub enum DailyWordError {
    /// Generative or speech backend errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A single generation attempt produced an unusable scripture
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Generation gave up after exhausting its retry budget
    #[error("Scripture generation failed after {attempts} attempt(s): {last_error}")]
    GenerationFailed { attempts: u32, last_error: String },

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required backend credential or setting is missing
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Durability layer errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// HTTP request errors, stored without their request URL
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
}

/// Upstream (generative / speech backend) error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Backend answered successfully but without any text
    #[error("Empty response from generative backend")]
    EmptyResponse,

    /// Non-success HTTP status
    #[error("Upstream HTTP error ({status}): {body}")]
    UpstreamHttp { status: u16, body: String },

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,
}

/// Validation failures specific to a single generation attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Backend output was not a usable scripture object
    #[error("Invalid scripture response: {0}")]
    InvalidResponseShape(String),

    /// Backend reused a reference already published this month
    #[error("Duplicate scripture reference: {0}")]
    DuplicateReference(String),
}

/// Durability layer errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("storage IO failure: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded
    #[error("storage serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data does not have the expected structure
    #[error("corrupt document '{document}': {reason}")]
    Corrupt { document: String, reason: String },
}

/// Result type alias for daily-word operations
pub type Result<T> = std::result::Result<T, DailyWordError>;

impl From<reqwest::Error> for DailyWordError {
    fn from(err: reqwest::Error) -> Self {
        DailyWordError::Http(err.without_url())
    }
}

impl From<toml::de::Error> for DailyWordError {
    fn from(err: toml::de::Error) -> Self {
        DailyWordError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for DailyWordError {
    fn from(err: toml::ser::Error) -> Self {
        DailyWordError::Toml(err.to_string())
    }
}

impl DailyWordError {
    /// HTTP status equivalent used by the server surface
    pub fn status_code(&self) -> u16 {
        match self {
            DailyWordError::InvalidInput(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failed_display() {
        let err = DailyWordError::GenerationFailed {
            attempts: 3,
            last_error: "Duplicate scripture reference: John 3:16".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("John 3:16"));
    }

    #[test]
    fn test_not_configured_display() {
        let err = DailyWordError::NotConfigured("GENAI_KEY".to_string());
        assert_eq!(err.to_string(), "Not configured: GENAI_KEY");
    }

    #[test]
    fn test_upstream_http_display() {
        let err = ApiError::UpstreamHttp {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn test_generation_error_into_daily_word_error() {
        let err: DailyWordError =
            GenerationError::InvalidResponseShape("missing versions".to_string()).into();
        assert!(matches!(
            err,
            DailyWordError::Generation(GenerationError::InvalidResponseShape(_))
        ));
    }

    #[test]
    fn test_storage_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DailyWordError = StorageError::from(io_err).into();
        assert!(err.to_string().starts_with("Storage error"));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(
            DailyWordError::InvalidInput("empty".to_string()).status_code(),
            400
        );
        assert_eq!(DailyWordError::Api(ApiError::Timeout).status_code(), 500);
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: DailyWordError = parse_err.into();
        assert!(err.to_string().contains("TOML error"));
    }
}
