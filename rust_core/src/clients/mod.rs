//! Football data sources.
//!
//! This module provides:
//! - The `FootballDataSource` trait the predictor and CLI are written against
//! - `ApiFootballClient`, the HTTP implementation for API-Football v3
//! - `CachedDataSource`, a TTL-cache decorator over any source

pub mod api_football;
pub mod cached;

pub use api_football::{
    current_season, fixture_window, ApiFootballClient, ApiFootballConfig, Provider,
};
pub use cached::CachedDataSource;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use crate::error::ApiResult;
use crate::models::{CompletedMatch, Fixture, LeagueTable, MatchHistory, TeamSeasonStats};

/// Meetings requested from the head-to-head endpoint.
pub const DEFAULT_H2H_MEETINGS: u32 = 5;

#[async_trait]
pub trait FootballDataSource: Send + Sync {
    /// Fixtures for one league between two dates (inclusive).
    async fn upcoming_fixtures(
        &self,
        league_id: u32,
        season: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<Fixture>>;

    async fn standings(&self, league_id: u32, season: i32) -> ApiResult<LeagueTable>;

    /// Season aggregate; an unavailable placeholder when the API has none.
    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> ApiResult<TeamSeasonStats>;

    /// Finished matches of a team in a season, optionally limited to one league.
    async fn team_matches(
        &self,
        team_id: u32,
        season: i32,
        league_id: Option<u32>,
    ) -> ApiResult<Vec<CompletedMatch>>;

    /// Last `last` finished meetings between two teams.
    async fn head_to_head(
        &self,
        team1: u32,
        team2: u32,
        last: u32,
    ) -> ApiResult<Vec<CompletedMatch>>;

    /// Current-league and other-competition matches across `seasons`.
    ///
    /// Individual request failures are recorded in `errors` rather than
    /// failing the whole history.
    async fn match_history(&self, team_id: u32, league_id: u32, seasons: &[i32]) -> MatchHistory {
        let mut history = MatchHistory {
            team_id,
            league_id,
            seasons: seasons.to_vec(),
            ..Default::default()
        };

        for &season in seasons {
            match self.team_matches(team_id, season, Some(league_id)).await {
                Ok(matches) => {
                    if !matches.is_empty() {
                        history.leagues_played.push(league_id);
                    }
                    history.current_league.extend(matches);
                }
                Err(e) => {
                    warn!("League matches for team {} season {}: {}", team_id, season, e);
                    history.errors.push(format!("season {}: {}", season, e));
                }
            }

            match self.team_matches(team_id, season, None).await {
                Ok(matches) => {
                    for m in matches.into_iter().filter(|m| m.league_id != league_id) {
                        history.leagues_played.push(m.league_id);
                        history.other_leagues.push(m);
                    }
                }
                Err(e) => {
                    warn!("All matches for team {} season {}: {}", team_id, season, e);
                    history.errors.push(format!("all competitions {}: {}", season, e));
                }
            }
        }

        history.finalize();
        history
    }
}
