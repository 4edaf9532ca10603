//! Caching decorator for any football data source.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

use super::FootballDataSource;
use crate::cache::{ns, CacheTtl, ResponseCache};
use crate::error::ApiResult;
use crate::models::{CompletedMatch, Fixture, LeagueTable, TeamSeasonStats};

/// Wraps a source and serves repeated requests from a [`ResponseCache`].
///
/// Unavailable season statistics are never stored, so a team that gets its
/// first stats mid-day is picked up on the next request.
pub struct CachedDataSource<S> {
    inner: S,
    cache: Arc<ResponseCache>,
    ttl: CacheTtl,
}

impl<S: FootballDataSource> CachedDataSource<S> {
    pub fn new(inner: S, cache: Arc<ResponseCache>) -> Self {
        Self::with_ttl(inner, cache, CacheTtl::default())
    }

    pub fn with_ttl(inner: S, cache: Arc<ResponseCache>, ttl: CacheTtl) -> Self {
        Self { inner, cache, ttl }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// Kickoff stored with match lists. A list holding a match dated in the
/// future (a rescheduled or not-yet-final result) is refetched instead of
/// served until that kickoff has passed.
fn latest_kickoff(matches: &[CompletedMatch]) -> Option<chrono::DateTime<Utc>> {
    matches
        .iter()
        .map(|m| m.date.with_timezone(&Utc))
        .max()
}

#[async_trait]
impl<S: FootballDataSource> FootballDataSource for CachedDataSource<S> {
    async fn upcoming_fixtures(
        &self,
        league_id: u32,
        season: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<Fixture>> {
        let params = [
            ("league", league_id.to_string()),
            ("season", season.to_string()),
            ("from", from.to_string()),
            ("to", to.to_string()),
        ];
        if let Some(hit) = self.cache.get(ns::FIXTURES, &params, self.ttl.fixtures) {
            return Ok(hit);
        }
        let fixtures = self
            .inner
            .upcoming_fixtures(league_id, season, from, to)
            .await?;
        self.cache.set(ns::FIXTURES, &params, &fixtures, None);
        Ok(fixtures)
    }

    async fn standings(&self, league_id: u32, season: i32) -> ApiResult<LeagueTable> {
        let params = [
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ];
        if let Some(hit) = self.cache.get(ns::STANDINGS, &params, self.ttl.standings) {
            return Ok(hit);
        }
        let table = self.inner.standings(league_id, season).await?;
        self.cache.set(ns::STANDINGS, &params, &table, None);
        Ok(table)
    }

    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> ApiResult<TeamSeasonStats> {
        let params = [
            ("team_id", team_id.to_string()),
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ];
        if let Some(hit) = self.cache.get(ns::TEAM_STATS, &params, self.ttl.team_stats) {
            return Ok(hit);
        }
        let stats = self
            .inner
            .team_statistics(team_id, league_id, season)
            .await?;
        if stats.available {
            self.cache.set(ns::TEAM_STATS, &params, &stats, None);
        } else {
            debug!("Not caching unavailable stats for team {}", team_id);
        }
        Ok(stats)
    }

    async fn team_matches(
        &self,
        team_id: u32,
        season: i32,
        league_id: Option<u32>,
    ) -> ApiResult<Vec<CompletedMatch>> {
        let params = [
            ("team", team_id.to_string()),
            ("season", season.to_string()),
            (
                "league",
                league_id.map(|l| l.to_string()).unwrap_or_else(|| "all".to_string()),
            ),
        ];
        if let Some(hit) = self.cache.get(ns::TEAM_MATCHES, &params, self.ttl.team_stats) {
            return Ok(hit);
        }
        let matches = self.inner.team_matches(team_id, season, league_id).await?;
        self.cache
            .set(ns::TEAM_MATCHES, &params, &matches, latest_kickoff(&matches));
        Ok(matches)
    }

    async fn head_to_head(
        &self,
        team1: u32,
        team2: u32,
        last: u32,
    ) -> ApiResult<Vec<CompletedMatch>> {
        let params = [
            ("home_team_id", team1.to_string()),
            ("away_team_id", team2.to_string()),
            ("last", last.to_string()),
        ];
        if let Some(hit) = self.cache.get(ns::H2H, &params, self.ttl.h2h) {
            return Ok(hit);
        }
        let matches = self.inner.head_to_head(team1, team2, last).await?;
        self.cache
            .set(ns::H2H, &params, &matches, latest_kickoff(&matches));
        Ok(matches)
    }
}
