//! TTL response cache shared by the API client and the predictor.
//!
//! This module provides:
//! - Namespaced entries keyed by ordered request parameters
//! - Max-age checks on read, plus a "not final yet" check for entries that
//!   cover a match whose kickoff is still in the future
//! - JSON persistence so consecutive CLI runs can reuse responses

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::CacheError;

/// Namespaces used by the client and predictor.
pub mod ns {
    pub const FIXTURES: &str = "fixtures";
    pub const STANDINGS: &str = "standings";
    pub const TEAM_STATS: &str = "team_stats";
    pub const TEAM_MATCHES: &str = "team_matches";
    pub const H2H: &str = "h2h_stats";
    pub const PREDICTIONS: &str = "predictions";
}

/// Maximum ages per namespace.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtl {
    pub fixtures: Duration,
    pub standings: Duration,
    pub team_stats: Duration,
    pub h2h: Duration,
    pub predictions: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        const HOUR: u64 = 3600;
        Self {
            fixtures: Duration::from_secs(12 * HOUR),
            standings: Duration::from_secs(12 * HOUR),
            team_stats: Duration::from_secs(24 * HOUR),
            h2h: Duration::from_secs(24 * HOUR),
            predictions: Duration::from_secs(HOUR),
        }
    }
}

impl CacheTtl {
    /// Age past which no namespace would serve an entry.
    pub fn longest(&self) -> Duration {
        [
            self.fixtures,
            self.standings,
            self.team_stats,
            self.h2h,
            self.predictions,
        ]
        .into_iter()
        .max()
        .unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    value: serde_json::Value,
    stored_at: DateTime<Utc>,
    /// Kickoff of the latest match the entry covers. Set by the caller; an
    /// entry whose kickoff is still ahead is never served.
    #[serde(default)]
    last_match_time: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        if let Some(kickoff) = self.last_match_time {
            if kickoff > now {
                return false;
            }
        }
        self.age(now) < max_age
    }

    fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.stored_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Builds the storage key "namespace:k1=v1&k2=v2" with parameters sorted by name.
pub fn cache_key(namespace: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}:{}", namespace.to_lowercase(), joined)
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if it is younger than `max_age` and final.
    pub fn get<T: DeserializeOwned>(
        &self,
        namespace: &str,
        params: &[(&str, String)],
        max_age: Duration,
    ) -> Option<T> {
        let key = cache_key(namespace, params);
        let entries = self.entries.read();
        let entry = entries.get(&key)?;
        if !entry.is_fresh(Utc::now(), max_age) {
            debug!("Cache stale: {}", key);
            return None;
        }
        match serde_json::from_value(entry.value.clone()) {
            Ok(v) => {
                debug!("Cache hit: {}", key);
                Some(v)
            }
            Err(e) => {
                warn!("Cache entry {} has unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Stores (or overwrites) a value.
    pub fn set<T: Serialize>(
        &self,
        namespace: &str,
        params: &[(&str, String)],
        value: &T,
        last_match_time: Option<DateTime<Utc>>,
    ) {
        let key = cache_key(namespace, params);
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.write().insert(
                    key,
                    CacheEntry {
                        value,
                        stored_at: Utc::now(),
                        last_match_time,
                    },
                );
            }
            Err(e) => warn!("Not caching {}: {}", key, e),
        }
    }

    pub fn remove(&self, namespace: &str, params: &[(&str, String)]) -> bool {
        self.entries
            .write()
            .remove(&cache_key(namespace, params))
            .is_some()
    }

    /// Drops every entry in `namespace`. Returns how many were removed.
    pub fn clear(&self, namespace: &str) -> usize {
        let prefix = format!("{}:", namespace.to_lowercase());
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(&prefix));
        before - entries.len()
    }

    /// Drops entries stored more than `max_age` ago. Returns how many went.
    pub fn prune(&self, max_age: Duration) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.age(now) < max_age);
        before - entries.len()
    }

    pub fn clear_all(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Namespaces currently holding entries, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter_map(|k| k.split_once(':').map(|(n, _)| n.to_string()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Loads a cache file. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, CacheEntry> = serde_json::from_str(&content)?;
        debug!("Loaded {} cache entries from {}", entries.len(), path.display());
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    /// Writes the cache to `path`, first dropping entries too old for any
    /// namespace's default max age.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let pruned = self.prune(CacheTtl::default().longest());
        if pruned > 0 {
            debug!("Pruned {} expired cache entries", pruned);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(&*self.entries.read())?;
        fs::write(path, content)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DAY: Duration = Duration::from_secs(86_400);

    fn id(n: u32) -> Vec<(&'static str, String)> {
        vec![("id", n.to_string())]
    }

    #[test]
    fn test_set_and_get() {
        let cache = ResponseCache::new();
        cache.set("test", &id(1), &json!({"value": "test data"}), None);
        let got: Option<serde_json::Value> = cache.get("test", &id(1), DAY);
        assert_eq!(got, Some(json!({"value": "test data"})));
    }

    #[test]
    fn test_set_overwrites() {
        let cache = ResponseCache::new();
        cache.set("test", &id(1), &"first".to_string(), None);
        cache.set("test", &id(1), &"updated".to_string(), None);
        let got: Option<String> = cache.get("test", &id(1), DAY);
        assert_eq!(got.as_deref(), Some("updated"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_future_match_not_served() {
        let cache = ResponseCache::new();
        let kickoff = Utc::now() + chrono::Duration::hours(1);
        cache.set(ns::STANDINGS, &[("league_id", "1".into())], &42u32, Some(kickoff));
        let got: Option<u32> = cache.get(ns::STANDINGS, &[("league_id", "1".into())], DAY);
        assert!(got.is_none());
    }

    #[test]
    fn test_past_match_served() {
        let cache = ResponseCache::new();
        let kickoff = Utc::now() - chrono::Duration::hours(3);
        cache.set(ns::STANDINGS, &[("league_id", "1".into())], &42u32, Some(kickoff));
        let got: Option<u32> = cache.get(ns::STANDINGS, &[("league_id", "1".into())], DAY);
        assert_eq!(got, Some(42));
    }

    #[test]
    fn test_clear_namespace() {
        let cache = ResponseCache::new();
        cache.set("test", &id(1), &1u8, None);
        cache.set("test", &id(2), &2u8, None);
        cache.set("other", &id(1), &3u8, None);

        assert_eq!(cache.clear("test"), 2);
        assert!(cache.get::<u8>("test", &id(1), DAY).is_none());
        assert_eq!(cache.get::<u8>("other", &id(1), DAY), Some(3));
        assert_eq!(cache.namespaces(), vec!["other".to_string()]);
    }

    #[test]
    fn test_zero_max_age_expires_immediately() {
        let cache = ResponseCache::new();
        cache.set("expire_test", &id(1), &"expire data".to_string(), None);
        let got: Option<String> = cache.get("expire_test", &id(1), Duration::ZERO);
        assert!(got.is_none());
    }

    #[test]
    fn test_old_entry_expires() {
        let entry = CacheEntry {
            value: json!(1),
            stored_at: Utc::now() - chrono::Duration::hours(25),
            last_match_time: None,
        };
        assert!(!entry.is_fresh(Utc::now(), DAY));
        assert!(entry.is_fresh(Utc::now(), 2 * DAY));
    }

    #[test]
    fn test_key_ignores_param_order() {
        let a = cache_key("h2h_stats", &[("team1", "1".into()), ("team2", "2".into())]);
        let b = cache_key("h2h_stats", &[("team2", "2".into()), ("team1", "1".into())]);
        assert_eq!(a, b);
        assert_eq!(a, "h2h_stats:team1=1&team2=2");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("responses.json");

        let cache = ResponseCache::new();
        cache.set(ns::TEAM_STATS, &id(50), &json!({"played": 10}), None);
        cache.save(&path).unwrap();

        let loaded = ResponseCache::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let got: Option<serde_json::Value> = loaded.get(ns::TEAM_STATS, &id(50), DAY);
        assert_eq!(got, Some(json!({"played": 10})));
    }

    #[test]
    fn test_save_drops_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");

        let cache = ResponseCache::new();
        cache.set(ns::FIXTURES, &id(1), &json!([]), None);
        cache.entries.write().insert(
            cache_key(ns::FIXTURES, &id(2)),
            CacheEntry {
                value: json!([]),
                stored_at: Utc::now() - chrono::Duration::days(3),
                last_match_time: None,
            },
        );
        assert_eq!(cache.len(), 2);

        cache.save(&path).unwrap();
        assert_eq!(cache.len(), 1);
        let loaded = ResponseCache::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get::<serde_json::Value>(ns::FIXTURES, &id(2), 7 * DAY).is_none());
    }

    #[test]
    fn test_longest_ttl() {
        assert_eq!(CacheTtl::default().longest(), DAY);
        let cache = ResponseCache::new();
        cache.set("test", &id(1), &1u8, None);
        assert_eq!(cache.prune(DAY), 0);
        assert_eq!(cache.prune(Duration::ZERO), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ResponseCache::load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }
}
