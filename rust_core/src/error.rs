//! Error types for the BetBuddy core crate.

use thiserror::Error;

/// Errors returned by the API-Football client.
#[derive(Error, Debug)]
pub enum ApiFootballError {
    #[error("API key not configured (set RAPIDAPI_KEY or API_FOOTBALL_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("{endpoint} rate limited (HTTP 429)")]
    RateLimited { endpoint: String },

    #[error("{endpoint} reported errors: {message}")]
    Api { endpoint: String, message: String },

    #[error("{0} returned no response body")]
    MissingResponse(String),

    #[error("failed to decode {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("circuit breaker '{0}' is open")]
    CircuitOpen(String),

    #[error("no data: {0}")]
    NotFound(String),
}

impl ApiFootballError {
    /// Transient failures worth another attempt.
    pub fn is_retriable(&self) -> bool {
        match self {
            ApiFootballError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ApiFootballError::Status { status, .. } => *status >= 500,
            ApiFootballError::RateLimited { .. } => true,
            _ => false,
        }
    }
}

/// Errors from the response cache's JSON persistence.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by prediction models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("invalid team id {0}")]
    InvalidTeam(u32),

    #[error("model produced invalid probabilities: {0}")]
    InvalidProbabilities(String),
}

/// Errors writing prediction tables to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("nothing to export")]
    Empty,
}

pub type ApiResult<T> = std::result::Result<T, ApiFootballError>;
