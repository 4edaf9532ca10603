//! BetBuddy Core - football fixtures, standings and match outcome prediction.
//!
//! This module provides:
//! - API-Football v3 client (RapidAPI or direct) with retry and circuit breaker
//! - TTL response cache with optional file persistence
//! - Poisson, season-average and table-position prediction models
//! - Batch prediction with bounded concurrency and per-fixture fallback
//! - Fixture, standings and analysis tables
//! - Spreadsheet and CSV export

pub mod analysis;
pub mod cache;
pub mod circuit_breaker;
pub mod clients;
pub mod error;
pub mod export;
pub mod league_config;
pub mod models;
pub mod predictor;
pub mod probability;
pub mod retry;

pub use clients::{ApiFootballClient, ApiFootballConfig, CachedDataSource, FootballDataSource};
pub use error::{ApiFootballError, ApiResult};
pub use models::*;
pub use predictor::{Predictor, PredictorConfig};
pub use probability::{PredictionModel, PredictionModelRegistry};
