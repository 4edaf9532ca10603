use anyhow::{anyhow, Context, Result};
use betbuddy_core::clients::Provider;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub provider: Provider,
    pub season: Option<i32>,
    pub max_workers: usize,
    pub rate_limit: Duration,
    pub cache_predictions: bool,
    /// Response cache persisted between runs when set
    pub cache_file: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("API_FOOTBALL_PROVIDER") {
            Some(p) => Provider::from_str(&p).map_err(|e| anyhow!(e))?,
            None => Provider::default(),
        };

        // off by default on hosted dynos
        let cache_predictions = match get("PREDICTION_CACHE") {
            Some(v) => parse_switch("PREDICTION_CACHE", &v)?,
            None => get("DYNO").is_none(),
        };

        Ok(Self {
            api_key: get("RAPIDAPI_KEY").or_else(|| get("API_FOOTBALL_KEY")),
            provider,
            season: parse_var(&get, "FOOTBALL_SEASON")?,
            max_workers: parse_var(&get, "PREDICTION_MAX_WORKERS")?.unwrap_or(3),
            rate_limit: Duration::from_millis(
                parse_var(&get, "PREDICTION_RATE_LIMIT_MS")?.unwrap_or(500),
            ),
            cache_predictions,
            cache_file: get("BETBUDDY_CACHE_FILE").map(PathBuf::from),
            export_dir: get("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            http_timeout: Duration::from_secs(parse_var(&get, "HTTP_TIMEOUT_SECS")?.unwrap_or(10)),
        })
    }

    /// API key, required by every command that talks to API-Football.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("RAPIDAPI_KEY or API_FOOTBALL_KEY must be set"))
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("invalid value for {}", key))
}

fn parse_switch(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        other => Err(anyhow!("invalid value for {}: {} (use on/off)", key, other)),
    }
}
