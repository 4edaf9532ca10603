//! API-Football v3 client
//!
//! Talks to API-Football either through RapidAPI or the direct API-Sports
//! host. Every call goes through the circuit breaker and the retry policy;
//! responses are unwrapped from the `{errors, response}` envelope and turned
//! into domain models.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::FootballDataSource;
use crate::circuit_breaker::{BreakerConfig, BreakerState, CircuitBreaker};
use crate::error::{ApiFootballError, ApiResult};
use crate::models::{
    BiggestStreaks, CompletedMatch, Fixture, LeagueTable, Standing, TeamRef, TeamSeasonStats,
    VenueSplit,
};
use crate::retry::{execute_with_retry, RetryPolicy};

/// Timezone requested for fixture kickoffs.
pub const FIXTURE_TIMEZONE: &str = "Europe/London";

/// Days ahead covered by the upcoming-fixtures window.
pub const FIXTURE_WINDOW_DAYS: i64 = 7;

// ============================================================================
// Provider & configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    RapidApi,
    ApiSports,
}

impl Provider {
    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::RapidApi => "https://api-football-v1.p.rapidapi.com/v3",
            Provider::ApiSports => "https://v3.football.api-sports.io",
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            Provider::RapidApi => "api-football-v1.p.rapidapi.com",
            Provider::ApiSports => "v3.football.api-sports.io",
        }
    }

    fn authorize(&self, req: RequestBuilder, api_key: &str) -> RequestBuilder {
        match self {
            Provider::RapidApi => req
                .header("X-RapidAPI-Key", api_key)
                .header("X-RapidAPI-Host", self.host()),
            Provider::ApiSports => req
                .header("x-apisports-key", api_key)
                .header("x-apisports-host", self.host()),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rapidapi" | "rapid" => Ok(Provider::RapidApi),
            "apisports" | "api-sports" | "direct" => Ok(Provider::ApiSports),
            other => Err(format!("unknown API-Football provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiFootballConfig {
    pub api_key: String,
    pub provider: Provider,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub circuit_breaker: BreakerConfig,
}

impl ApiFootballConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            provider: Provider::default(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            circuit_breaker: BreakerConfig::default(),
        }
    }
}

/// Season that is running on `today`: seasons start in July.
pub fn current_season(today: NaiveDate) -> i32 {
    if today.month() > 6 {
        today.year()
    } else {
        today.year() - 1
    }
}

/// `today ..= today + 7 days`
pub fn fixture_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + ChronoDuration::days(FIXTURE_WINDOW_DAYS))
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct ApiFootballClient {
    client: Client,
    config: ApiFootballConfig,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl std::fmt::Debug for ApiFootballClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiFootballClient")
            .field("provider", &self.config.provider)
            .field("circuit_breaker_state", &self.circuit_breaker.state())
            .finish()
    }
}

impl ApiFootballClient {
    pub fn new(config: ApiFootballConfig) -> ApiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ApiFootballError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("BetBuddy/1.0")
            .build()?;
        let circuit_breaker = Arc::new(CircuitBreaker::new(
            "api-football",
            config.circuit_breaker.clone(),
        ));
        Ok(Self {
            client,
            config,
            circuit_breaker,
        })
    }

    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    /// Check if the API is available (circuit breaker is not open)
    pub fn is_available(&self) -> bool {
        self.circuit_breaker.is_available()
    }

    pub fn circuit_state(&self) -> BreakerState {
        self.circuit_breaker.state()
    }

    /// GET `endpoint` and return the `response` payload.
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiResult<Value> {
        self.circuit_breaker.check()?;

        let result =
            execute_with_retry(endpoint, || self.send(endpoint, params), self.config.retry).await;

        match &result {
            Ok(_) => self.circuit_breaker.record_success(),
            // The API answered; the request itself was wrong
            Err(ApiFootballError::Api { .. }) | Err(ApiFootballError::NotFound(_)) => {
                self.circuit_breaker.record_success()
            }
            Err(_) => self.circuit_breaker.record_failure(),
        }
        result
    }

    async fn send(&self, endpoint: &str, params: &[(&str, String)]) -> ApiResult<Value> {
        let url = format!("{}/{}", self.config.provider.base_url(), endpoint);
        debug!("GET {} {:?}", url, params);

        let resp = self
            .config
            .provider
            .authorize(self.client.get(&url), &self.config.api_key)
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiFootballError::RateLimited {
                endpoint: endpoint.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiFootballError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let text = resp.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|source| ApiFootballError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;
        extract_response(endpoint, body)
    }
}

#[async_trait]
impl FootballDataSource for ApiFootballClient {
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
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", to.format("%Y-%m-%d").to_string()),
            ("timezone", FIXTURE_TIMEZONE.to_string()),
        ];
        let response = self.get("fixtures", &params).await?;
        Ok(parse_fixtures(&response))
    }

    async fn standings(&self, league_id: u32, season: i32) -> ApiResult<LeagueTable> {
        let params = [
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ];
        let response = self.get("standings", &params).await?;
        parse_standings(&response, league_id, season)
    }

    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> ApiResult<TeamSeasonStats> {
        let params = [
            ("team", team_id.to_string()),
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ];
        let response = self.get("teams/statistics", &params).await?;
        Ok(parse_team_statistics(&response, team_id, league_id, season))
    }

    async fn team_matches(
        &self,
        team_id: u32,
        season: i32,
        league_id: Option<u32>,
    ) -> ApiResult<Vec<CompletedMatch>> {
        let mut params = vec![
            ("team", team_id.to_string()),
            ("season", season.to_string()),
            ("status", "FT".to_string()),
        ];
        if let Some(league) = league_id {
            params.push(("league", league.to_string()));
        }
        let response = self.get("fixtures", &params).await?;
        Ok(parse_completed_matches(&response))
    }

    async fn head_to_head(
        &self,
        team1: u32,
        team2: u32,
        last: u32,
    ) -> ApiResult<Vec<CompletedMatch>> {
        let params = [
            ("h2h", format!("{}-{}", team1, team2)),
            ("last", last.to_string()),
            ("status", "FT".to_string()),
        ];
        let response = self.get("fixtures/headtohead", &params).await?;
        let mut matches = parse_completed_matches(&response);
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matches)
    }
}

// ============================================================================
// Envelope & parsing
// ============================================================================

/// Unwraps `{"errors": ..., "response": ...}`.
///
/// `errors` comes back as `[]` or `{}` when empty and as an object of
/// messages otherwise.
pub fn extract_response(endpoint: &str, mut body: Value) -> ApiResult<Value> {
    let has_errors = match &body["errors"] {
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => false,
    };
    if has_errors {
        return Err(ApiFootballError::Api {
            endpoint: endpoint.to_string(),
            message: body["errors"].to_string(),
        });
    }
    match body.get_mut("response") {
        Some(response) if !response.is_null() => Ok(response.take()),
        _ => Err(ApiFootballError::MissingResponse(endpoint.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct WireItem {
    fixture: WireFixture,
    league: WireLeague,
    teams: WireTeams,
    #[serde(default)]
    goals: Option<WireGoals>,
}

#[derive(Debug, Deserialize)]
struct WireFixture {
    id: u64,
    date: String,
    #[serde(default)]
    venue: Option<WireVenue>,
    #[serde(default)]
    status: Option<WireStatus>,
}

#[derive(Debug, Deserialize)]
struct WireVenue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    short: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireLeague {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct WireTeams {
    home: WireTeam,
    away: WireTeam,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireGoals {
    home: Option<u32>,
    away: Option<u32>,
}

fn parse_item(item: &Value) -> Result<(WireItem, DateTime<chrono::FixedOffset>), String> {
    let wire: WireItem = WireItem::deserialize(item).map_err(|e| e.to_string())?;
    let date = DateTime::parse_from_rfc3339(&wire.fixture.date)
        .map_err(|e| format!("bad date '{}': {}", wire.fixture.date, e))?;
    Ok((wire, date))
}

/// Fixtures from a `fixtures` response. Malformed entries are skipped.
pub fn parse_fixtures(response: &Value) -> Vec<Fixture> {
    let Some(items) = response.as_array() else {
        return Vec::new();
    };
    let mut fixtures = Vec::with_capacity(items.len());
    for item in items {
        match parse_item(item) {
            Ok((wire, kickoff)) => fixtures.push(Fixture {
                fixture_id: wire.fixture.id,
                kickoff,
                home: TeamRef::new(wire.teams.home.id, wire.teams.home.name),
                away: TeamRef::new(wire.teams.away.id, wire.teams.away.name),
                league_id: wire.league.id,
                league_name: wire.league.name,
                country: wire.league.country,
                venue: wire.fixture.venue.and_then(|v| v.name),
                status: wire
                    .fixture
                    .status
                    .and_then(|s| s.short)
                    .unwrap_or_else(|| "NS".to_string()),
            }),
            Err(e) => warn!("Skipping malformed fixture: {}", e),
        }
    }
    fixtures
}

/// Finished matches; entries without a final score are skipped.
pub fn parse_completed_matches(response: &Value) -> Vec<CompletedMatch> {
    let Some(items) = response.as_array() else {
        return Vec::new();
    };
    let mut matches = Vec::with_capacity(items.len());
    for item in items {
        let (wire, date) = match parse_item(item) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping malformed match: {}", e);
                continue;
            }
        };
        let Some(WireGoals {
            home: Some(home_goals),
            away: Some(away_goals),
        }) = wire.goals
        else {
            debug!("Skipping fixture {} without final score", wire.fixture.id);
            continue;
        };
        matches.push(CompletedMatch {
            date,
            home_team: wire.teams.home.id,
            away_team: wire.teams.away.id,
            home_goals,
            away_goals,
            league_id: wire.league.id,
            season: wire.league.season,
            venue: wire.fixture.venue.and_then(|v| v.name),
        });
    }
    matches
}

#[derive(Debug, Deserialize)]
struct WireStanding {
    rank: u32,
    team: WireTeam,
    #[serde(default)]
    points: i32,
    #[serde(rename = "goalsDiff", default)]
    goals_diff: i32,
    #[serde(default)]
    form: Option<String>,
    all: WireRecord,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(default)]
    played: Option<u32>,
    #[serde(default)]
    win: Option<u32>,
    #[serde(default)]
    draw: Option<u32>,
    #[serde(default)]
    lose: Option<u32>,
    goals: WireRecordGoals,
}

#[derive(Debug, Deserialize)]
struct WireRecordGoals {
    #[serde(rename = "for", default)]
    scored: Option<u32>,
    #[serde(default)]
    against: Option<u32>,
}

/// First table of a `standings` response.
pub fn parse_standings(response: &Value, league_id: u32, season: i32) -> ApiResult<LeagueTable> {
    let Some(rows) = response[0]["league"]["standings"][0].as_array() else {
        return Err(ApiFootballError::NotFound(format!(
            "standings for league {} season {}",
            league_id, season
        )));
    };

    let mut table = Vec::with_capacity(rows.len());
    for row in rows {
        match WireStanding::deserialize(row) {
            Ok(s) => table.push(Standing {
                rank: s.rank,
                team: TeamRef::new(s.team.id, s.team.name),
                points: s.points,
                goal_difference: s.goals_diff,
                played: s.all.played.unwrap_or(0),
                won: s.all.win.unwrap_or(0),
                drawn: s.all.draw.unwrap_or(0),
                lost: s.all.lose.unwrap_or(0),
                goals_for: s.all.goals.scored.unwrap_or(0),
                goals_against: s.all.goals.against.unwrap_or(0),
                form: s.form.filter(|f| !f.is_empty()),
            }),
            Err(e) => warn!("Skipping malformed standings row: {}", e),
        }
    }
    table.sort_by_key(|s| s.rank);

    Ok(LeagueTable {
        league_id,
        season,
        rows: table,
    })
}

fn count(v: &Value) -> u32 {
    v.as_u64().unwrap_or(0) as u32
}

fn split(v: &Value) -> VenueSplit<u32> {
    VenueSplit {
        home: count(&v["home"]),
        away: count(&v["away"]),
        total: count(&v["total"]),
    }
}

/// Averages come back as strings ("1.7") or numbers.
fn average(v: &Value, default: f64) -> f64 {
    match v {
        Value::String(s) => s.parse().unwrap_or(default),
        Value::Number(n) => n.as_f64().unwrap_or(default),
        _ => default,
    }
}

/// Season aggregate from a `teams/statistics` response.
///
/// An empty response, or one without a played count, yields the
/// unavailable placeholder.
pub fn parse_team_statistics(
    response: &Value,
    team_id: u32,
    league_id: u32,
    season: i32,
) -> TeamSeasonStats {
    let fixtures = &response["fixtures"];
    if !response.is_object() || fixtures["played"]["total"].is_null() {
        debug!("No statistics for team {} league {}", team_id, league_id);
        return TeamSeasonStats::unavailable(team_id, league_id, season);
    }

    let goals_for = &response["goals"]["for"];
    let goals_against = &response["goals"]["against"];
    // The API spells this "clean_sheet"
    let clean_sheets = if response["clean_sheet"].is_object() {
        &response["clean_sheet"]
    } else {
        &response["clean_sheets"]
    };

    let mut stats = TeamSeasonStats {
        available: true,
        team_id,
        league_id,
        season,
        played: split(&fixtures["played"]),
        wins: split(&fixtures["wins"]),
        draws: split(&fixtures["draws"]),
        losses: split(&fixtures["loses"]),
        goals_for: split(&goals_for["total"]),
        goals_against: split(&goals_against["total"]),
        goals_for_average: average(&goals_for["average"]["total"], 0.0),
        goals_against_average: average(&goals_against["average"]["total"], 0.0),
        clean_sheets: split(clean_sheets),
        failed_to_score: split(&response["failed_to_score"]),
        penalties_scored: count(&response["penalty"]["scored"]["total"]),
        penalties_missed: count(&response["penalty"]["missed"]["total"]),
        form: response["form"].as_str().unwrap_or("").to_string(),
        biggest_streak: BiggestStreaks {
            wins: count(&response["biggest"]["streak"]["wins"]),
            draws: count(&response["biggest"]["streak"]["draws"]),
            losses: count(&response["biggest"]["streak"]["loses"]),
        },
        metrics: None,
    };
    stats.compute_metrics();
    stats
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture_json(id: u64, date: &str) -> Value {
        json!({
            "fixture": {
                "id": id,
                "date": date,
                "venue": {"name": "Old Trafford"},
                "status": {"short": "FT"}
            },
            "league": {"id": 39, "name": "Premier League", "country": "England", "season": 2024},
            "teams": {
                "home": {"id": 33, "name": "Manchester United"},
                "away": {"id": 36, "name": "Fulham"}
            },
            "goals": {"home": 1, "away": 0}
        })
    }

    #[test]
    fn test_current_season() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(current_season(d(2024, 8, 1)), 2024);
        assert_eq!(current_season(d(2025, 3, 15)), 2024);
        assert_eq!(current_season(d(2025, 6, 30)), 2024);
        assert_eq!(current_season(d(2025, 7, 1)), 2025);
    }

    #[test]
    fn test_fixture_window() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let (from, to) = fixture_window(today);
        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("RapidAPI".parse::<Provider>(), Ok(Provider::RapidApi));
        assert_eq!("api-sports".parse::<Provider>(), Ok(Provider::ApiSports));
        assert!("espn".parse::<Provider>().is_err());
        assert!(Provider::ApiSports.base_url().starts_with("https://v3.football"));
    }

    #[test]
    fn test_client_requires_key() {
        let err = ApiFootballClient::new(ApiFootballConfig::new("  ")).unwrap_err();
        assert!(matches!(err, ApiFootballError::MissingApiKey));
    }

    #[test]
    fn test_extract_response_envelope() {
        let ok = extract_response("fixtures", json!({"errors": [], "response": [1, 2]})).unwrap();
        assert_eq!(ok, json!([1, 2]));

        let ok = extract_response("standings", json!({"errors": {}, "response": []})).unwrap();
        assert_eq!(ok, json!([]));

        let err =
            extract_response("fixtures", json!({"errors": {"token": "bad key"}, "response": []}))
                .unwrap_err();
        assert!(matches!(err, ApiFootballError::Api { .. }));

        let err = extract_response("fixtures", json!({"errors": []})).unwrap_err();
        assert!(matches!(err, ApiFootballError::MissingResponse(_)));
    }

    #[test]
    fn test_parse_fixtures_skips_malformed() {
        let response = json!([
            fixture_json(1, "2024-08-16T20:00:00+01:00"),
            {"fixture": {"id": 2}},
            fixture_json(3, "not a date"),
        ]);
        let fixtures = parse_fixtures(&response);
        assert_eq!(fixtures.len(), 1);
        let f = &fixtures[0];
        assert_eq!(f.fixture_id, 1);
        assert_eq!(f.title(), "Manchester United vs Fulham");
        assert_eq!(f.venue.as_deref(), Some("Old Trafford"));
        assert_eq!(f.kickoff.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_parse_completed_matches_requires_score() {
        let mut unfinished = fixture_json(2, "2024-08-24T15:00:00+00:00");
        unfinished["goals"] = json!({"home": null, "away": null});
        let response = json!([fixture_json(1, "2024-08-16T20:00:00+00:00"), unfinished]);

        let matches = parse_completed_matches(&response);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].home_team, 33);
        assert_eq!(matches[0].home_goals, 1);
        assert_eq!(matches[0].season, Some(2024));
    }

    #[test]
    fn test_parse_standings() {
        let row = |rank: u32, id: u32, name: &str, points: i32| {
            json!({
                "rank": rank,
                "team": {"id": id, "name": name},
                "points": points,
                "goalsDiff": 5,
                "form": "WWDLW",
                "all": {"played": 10, "win": 6, "draw": 2, "lose": 2,
                        "goals": {"for": 18, "against": 13}}
            })
        };
        let response = json!([{
            "league": {"id": 39, "standings": [[row(2, 40, "Liverpool", 22), row(1, 42, "Arsenal", 24)]]}
        }]);

        let table = parse_standings(&response, 39, 2024).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].team.name, "Arsenal");
        assert_eq!(table.by_team_id(40).map(|s| s.rank), Some(2));
        assert_eq!(table.rows[0].goals_for, 18);

        let err = parse_standings(&json!([]), 39, 2024).unwrap_err();
        assert!(matches!(err, ApiFootballError::NotFound(_)));
    }

    #[test]
    fn test_parse_team_statistics() {
        let response = json!({
            "form": "WDLWW",
            "fixtures": {
                "played": {"home": 5, "away": 5, "total": 10},
                "wins": {"home": 4, "away": 2, "total": 6},
                "draws": {"home": 1, "away": 1, "total": 2},
                "loses": {"home": 0, "away": 2, "total": 2}
            },
            "goals": {
                "for": {"total": {"home": 12, "away": 8, "total": 20}, "average": {"total": "2.0"}},
                "against": {"total": {"home": 3, "away": 7, "total": 10}, "average": {"total": "1.0"}}
            },
            "clean_sheet": {"home": 3, "away": 1, "total": 4},
            "failed_to_score": {"home": 0, "away": 2, "total": 2},
            "penalty": {"scored": {"total": 3}, "missed": {"total": 1}},
            "biggest": {"streak": {"wins": 4, "draws": 1, "loses": 2}}
        });

        let stats = parse_team_statistics(&response, 42, 39, 2024);
        assert!(stats.available);
        assert_eq!(stats.games_played(), 10);
        assert_eq!(stats.clean_sheets.total, 4);
        assert_eq!(stats.biggest_streak.losses, 2);
        assert_eq!(stats.goals_for_average, 2.0);
        let m = stats.metrics.unwrap();
        assert!((m.points_per_game - 2.0).abs() < 1e-9);
        assert!((m.clean_sheet_percentage - 40.0).abs() < 1e-9);
        assert!((m.scoring_rate - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_team_statistics_empty() {
        let stats = parse_team_statistics(&json!([]), 42, 39, 2024);
        assert!(!stats.available);
        assert_eq!(stats.form, "UNKNOWN");
        assert_eq!(stats.metrics_or_default().goals_per_game, 1.5);
    }

    #[tokio::test]
    #[ignore] // Requires network and RAPIDAPI_KEY
    async fn test_live_standings() {
        let key = std::env::var("RAPIDAPI_KEY").unwrap();
        let client = ApiFootballClient::new(ApiFootballConfig::new(key)).unwrap();
        let season = current_season(chrono::Utc::now().date_naive());
        let table = client.standings(39, season).await.unwrap();
        assert!(table.len() >= 18);
    }
}
