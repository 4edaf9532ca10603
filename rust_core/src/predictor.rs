//! Prediction orchestration.
//!
//! This module provides:
//! - Data gathering for a fixture according to what the model needs
//! - Single predictions with an optional one-hour prediction cache
//! - Batch predictions with bounded concurrency and a per-fixture delay
//! - League-wide fixture and standings sweeps used by the CLI

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{ns, CacheTtl, ResponseCache};
use crate::clients::{current_season, fixture_window, FootballDataSource, DEFAULT_H2H_MEETINGS};
use crate::error::ApiResult;
use crate::models::{Fixture, LeagueTable, MatchPrediction, TeamSeasonStats};
use crate::probability::{fallback_prediction, MatchInput, PredictionModel};

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Concurrent predictions in a batch
    pub max_workers: usize,
    /// Delay before each batch prediction starts
    pub rate_limit: Duration,
    pub cache_predictions: bool,
    pub prediction_ttl: Duration,
    /// Fixed season; derived from today's date when `None`
    pub season: Option<i32>,
    /// Seasons of match history, counting back from the current one
    pub history_seasons: u32,
    pub h2h_meetings: u32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_workers: 3,
            rate_limit: Duration::from_millis(500),
            cache_predictions: true,
            prediction_ttl: CacheTtl::default().predictions,
            season: None,
            history_seasons: 2,
            h2h_meetings: DEFAULT_H2H_MEETINGS,
        }
    }
}

pub struct Predictor {
    source: Arc<dyn FootballDataSource>,
    cache: Arc<ResponseCache>,
    model: Box<dyn PredictionModel>,
    config: PredictorConfig,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Predictor {
    pub fn new(
        source: Arc<dyn FootballDataSource>,
        cache: Arc<ResponseCache>,
        model: Box<dyn PredictionModel>,
        config: PredictorConfig,
    ) -> Self {
        Self {
            source,
            cache,
            model,
            config,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub fn source(&self) -> &Arc<dyn FootballDataSource> {
        &self.source
    }

    pub fn season(&self) -> i32 {
        self.config
            .season
            .unwrap_or_else(|| current_season(chrono::Local::now().date_naive()))
    }

    /// Collects everything the model asked for.
    ///
    /// Lookups degrade instead of failing: statistics fall back to the
    /// unavailable defaults, history records its errors, and head-to-head
    /// and standings are left out.
    pub async fn gather(&self, home_id: u32, away_id: u32, league_id: u32) -> Result<MatchInput> {
        let season = self.season();
        let needs = self.model.needs();
        let mut input = MatchInput::new(home_id, away_id, league_id, season);

        if needs.season_stats {
            let (home, away) = tokio::join!(
                self.source.team_statistics(home_id, league_id, season),
                self.source.team_statistics(away_id, league_id, season),
            );
            let or_default = |team_id: u32, stats: ApiResult<TeamSeasonStats>| {
                stats.unwrap_or_else(|e| {
                    warn!("Statistics unavailable for team {}: {}", team_id, e);
                    TeamSeasonStats::unavailable(team_id, league_id, season)
                })
            };
            input.home_stats = or_default(home_id, home);
            input.away_stats = or_default(away_id, away);
        }

        if needs.match_history {
            let seasons: Vec<i32> = (0..self.config.history_seasons as i32)
                .map(|back| season - back)
                .collect();
            let (home, away) = tokio::join!(
                self.source.match_history(home_id, league_id, &seasons),
                self.source.match_history(away_id, league_id, &seasons),
            );
            input.home_history = home;
            input.away_history = away;
        }

        if needs.head_to_head {
            match self
                .source
                .head_to_head(home_id, away_id, self.config.h2h_meetings)
                .await
            {
                Ok(meetings) => input.head_to_head = Some(meetings),
                Err(e) => warn!("H2H stats unavailable for {}-{}: {}", home_id, away_id, e),
            }
        }

        if needs.standings {
            match self.source.standings(league_id, season).await {
                Ok(table) => input.table = Some(table),
                Err(e) => warn!("Standings unavailable for league {}: {}", league_id, e),
            }
        }

        Ok(input)
    }

    /// Runs the model for one fixture.
    pub async fn predict(&self, home_id: u32, away_id: u32, league_id: u32) -> Result<MatchPrediction> {
        let input = self.gather(home_id, away_id, league_id).await?;
        let prediction = self
            .model
            .predict(&input)
            .with_context(|| format!("{} model for {} vs {}", self.model.name(), home_id, away_id))?;
        debug!(
            "{} vs {}: {:.2}/{:.2}/{:.2}",
            home_id,
            away_id,
            prediction.probabilities.home_win,
            prediction.probabilities.draw,
            prediction.probabilities.away_win
        );
        Ok(prediction)
    }

    /// Prediction that never fails: invalid ids and errors give the
    /// fallback prediction. Results are cached when enabled.
    pub async fn cached_prediction(
        &self,
        home_id: u32,
        away_id: u32,
        league_id: u32,
    ) -> MatchPrediction {
        if home_id == 0 || away_id == 0 || league_id == 0 {
            return fallback_prediction(format!(
                "invalid team or league id: {}, {}, {}",
                home_id, away_id, league_id
            ));
        }

        let params = [
            ("home", home_id.to_string()),
            ("away", away_id.to_string()),
            ("league", league_id.to_string()),
            ("model", self.model.name().to_string()),
        ];
        if self.config.cache_predictions {
            if let Some(hit) =
                self.cache
                    .get::<MatchPrediction>(ns::PREDICTIONS, &params, self.config.prediction_ttl)
            {
                return hit;
            }
        }

        match self.predict(home_id, away_id, league_id).await {
            Ok(prediction) => {
                if self.config.cache_predictions {
                    self.cache.set(ns::PREDICTIONS, &params, &prediction, None);
                }
                prediction
            }
            Err(e) => fallback_prediction(format!("{:#}", e)),
        }
    }

    /// Predicts every fixture, at most `max_workers` at a time, in input order.
    pub async fn predict_batch(&self, fixtures: &[Fixture]) -> Vec<MatchPrediction> {
        let workers = self.config.max_workers.max(1);
        info!(
            "Predicting {} fixtures with {} model ({} workers)",
            fixtures.len(),
            self.model.name(),
            workers
        );

        stream::iter(fixtures)
            .map(|fixture| async move {
                tokio::time::sleep(self.config.rate_limit).await;
                self.cached_prediction(fixture.home.id, fixture.away.id, fixture.league_id)
                    .await
            })
            .buffered(workers)
            .collect()
            .await
    }

    /// Upcoming fixtures for several leagues in the 7-day window, sorted by
    /// kickoff. A failing league is logged and skipped.
    pub async fn upcoming_fixtures(&self, league_ids: &[u32], today: NaiveDate) -> Vec<Fixture> {
        let season = self.season();
        let (from, to) = fixture_window(today);
        let mut all = Vec::new();
        for &league in league_ids {
            match self.source.upcoming_fixtures(league, season, from, to).await {
                Ok(fixtures) => {
                    debug!("League {}: {} fixtures", league, fixtures.len());
                    all.extend(fixtures);
                }
                Err(e) => warn!("Error fetching fixtures for league {}: {}", league, e),
            }
        }
        all.sort_by_key(|f| f.kickoff);
        all
    }

    /// Tables keyed by league id; failing leagues are left out.
    pub async fn standings(&self, league_ids: &[u32]) -> HashMap<u32, LeagueTable> {
        let season = self.season();
        let mut tables = HashMap::new();
        for &league in league_ids {
            match self.source.standings(league, season).await {
                Ok(table) => {
                    tables.insert(league, table);
                }
                Err(e) => warn!("Error fetching standings for league {}: {}", league, e),
            }
        }
        tables
    }
}

// ============================================================================
// Tests
// ============================================================================
