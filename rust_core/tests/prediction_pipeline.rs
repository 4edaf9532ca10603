//! Prediction Pipeline Tests
//!
//! Drives fixtures -> predictions -> analysis rows -> export through an
//! in-memory data source. Tests against the live API need `RAPIDAPI_KEY`
//! (or `API_FOOTBALL_KEY`) and should be run with `cargo test --ignored`.

use async_trait::async_trait;
use betbuddy_core::analysis::{analysis_rows, fixture_row};
use betbuddy_core::cache::ResponseCache;
use betbuddy_core::clients::{current_season, CachedDataSource, FootballDataSource};
use betbuddy_core::error::{ApiFootballError, ApiResult};
use betbuddy_core::export::{write_csv, xlsx_bytes};
use betbuddy_core::models::{
    CompletedMatch, Fixture, LeagueTable, Outcome, Standing, TeamRef, TeamSeasonStats,
};
use betbuddy_core::predictor::{Predictor, PredictorConfig};
use betbuddy_core::probability::PredictionModelRegistry;
use betbuddy_core::{ApiFootballClient, ApiFootballConfig};
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, TimeZone};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const LEAGUE: u32 = 39;
const SEASON: i32 = 2024;
const STRONG: u32 = 33;
const WEAK: u32 = 45;
const BROKEN: u32 = 99;

fn kickoff(day_offset: i64) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 9, 14, 15, 0, 0)
        .unwrap()
        + ChronoDuration::days(day_offset)
}

fn team_name(id: u32) -> String {
    match id {
        STRONG => "Manchester United".to_string(),
        WEAK => "Everton".to_string(),
        BROKEN => "Broken FC".to_string(),
        other => format!("Team {}", other),
    }
}

fn fixture(id: u64, home: u32, away: u32, day_offset: i64) -> Fixture {
    Fixture {
        fixture_id: id,
        kickoff: kickoff(day_offset),
        home: TeamRef::new(home, team_name(home)),
        away: TeamRef::new(away, team_name(away)),
        league_id: LEAGUE,
        league_name: "Premier League".into(),
        country: "England".into(),
        venue: None,
        status: "NS".into(),
    }
}

/// In-memory league: STRONG scores freely, WEAK rarely, BROKEN's stats fail.
#[derive(Default)]
struct InMemorySource {
    requests: AtomicU32,
}

impl InMemorySource {
    fn history(&self, team_id: u32) -> Vec<CompletedMatch> {
        let (scored, conceded) = match team_id {
            STRONG => (3, 0),
            WEAK => (0, 2),
            _ => (1, 1),
        };
        (0..12)
            .map(|week| {
                let opponent = 200 + week as u32;
                let home = week % 2 == 0;
                CompletedMatch {
                    date: kickoff(-7 * (12 - week)),
                    home_team: if home { team_id } else { opponent },
                    away_team: if home { opponent } else { team_id },
                    home_goals: if home { scored } else { conceded },
                    away_goals: if home { conceded } else { scored },
                    league_id: LEAGUE,
                    season: Some(SEASON),
                    venue: None,
                }
            })
            .collect()
    }
}

#[async_trait]
impl FootballDataSource for InMemorySource {
    async fn upcoming_fixtures(
        &self,
        league_id: u32,
        _season: i32,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> ApiResult<Vec<Fixture>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if league_id != LEAGUE {
            return Err(ApiFootballError::NotFound(format!("league {}", league_id)));
        }
        // deliberately out of kickoff order
        Ok(vec![
            fixture(3, BROKEN, WEAK, 2),
            fixture(1, STRONG, WEAK, 0),
            fixture(2, WEAK, STRONG, 1),
        ])
    }

    async fn standings(&self, league_id: u32, season: i32) -> ApiResult<LeagueTable> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let row = |rank: u32, id: u32, points: i32| Standing {
            rank,
            team: TeamRef::new(id, team_name(id)),
            points,
            goal_difference: 0,
            played: 12,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            form: None,
        };
        Ok(LeagueTable {
            league_id,
            season,
            rows: vec![row(1, STRONG, 36), row(20, WEAK, 0)],
        })
    }

    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> ApiResult<TeamSeasonStats> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if team_id == BROKEN {
            return Err(ApiFootballError::Status {
                endpoint: "teams/statistics".into(),
                status: 503,
            });
        }
        let mut stats = TeamSeasonStats::unavailable(team_id, league_id, season);
        stats.available = true;
        stats.played.total = 12;
        match team_id {
            STRONG => {
                stats.wins.total = 12;
                stats.goals_for.total = 36;
                stats.clean_sheets.total = 12;
            }
            _ => {
                stats.losses.total = 12;
                stats.goals_for.total = 3;
                stats.goals_against.total = 18;
                stats.failed_to_score.total = 9;
            }
        }
        stats.compute_metrics();
        Ok(stats)
    }

    async fn team_matches(
        &self,
        team_id: u32,
        _season: i32,
        league_id: Option<u32>,
    ) -> ApiResult<Vec<CompletedMatch>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match league_id {
            Some(_) => Ok(self.history(team_id)),
            None => Ok(Vec::new()),
        }
    }

    async fn head_to_head(
        &self,
        team1: u32,
        team2: u32,
        _last: u32,
    ) -> ApiResult<Vec<CompletedMatch>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(vec![CompletedMatch {
            date: kickoff(-200),
            home_team: team1,
            away_team: team2,
            home_goals: 2,
            away_goals: 0,
            league_id: LEAGUE,
            season: Some(SEASON - 1),
            venue: None,
        }])
    }
}

fn predictor(model: &str) -> (Predictor, Arc<ResponseCache>) {
    let cache = Arc::new(ResponseCache::new());
    let source = CachedDataSource::new(InMemorySource::default(), cache.clone());
    let model = PredictionModelRegistry::new()
        .into_model(model)
        .expect("built-in model");
    let predictor = Predictor::new(
        Arc::new(source),
        cache.clone(),
        model,
        PredictorConfig {
            rate_limit: Duration::from_millis(1),
            season: Some(SEASON),
            ..Default::default()
        },
    );
    (predictor, cache)
}

#[tokio::test]
async fn test_full_pipeline() {
    let (predictor, _cache) = predictor("poisson");
    let today = NaiveDate::from_ymd_opt(2024, 9, 14).unwrap();

    let fixtures = predictor.upcoming_fixtures(&[LEAGUE, 140], today).await;
    assert_eq!(fixtures.len(), 3);
    assert!(fixtures.windows(2).all(|w| w[0].kickoff <= w[1].kickoff));
    assert_eq!(fixtures[0].fixture_id, 1);

    let tables = predictor.standings(&[LEAGUE]).await;
    let table = tables.get(&LEAGUE);
    let rows: Vec<_> = fixtures.iter().map(|f| fixture_row(f, table)).collect();
    assert_eq!(rows[0].home_position, "1st");
    assert_eq!(rows[0].away_position, "20th");
    assert_eq!(rows[2].home_position, "N/A");

    let predictions = predictor.predict_batch(&fixtures).await;
    assert_eq!(predictions.len(), 3);

    // results stay in fixture order
    let strong_home = &predictions[0];
    let strong_away = &predictions[1];
    assert!(!strong_home.is_fallback());
    assert!(strong_home.probabilities.is_valid());
    assert!(strong_home.probabilities.home_win > strong_home.probabilities.away_win);
    assert!(strong_away.probabilities.away_win > strong_away.probabilities.home_win);
    assert!(strong_home.team_analysis.is_some());

    // BROKEN's statistics request fails; the model runs on default stats
    let broken = &predictions[2];
    assert!(!broken.is_fallback());
    assert!(broken.probabilities.is_valid());
    assert!(broken
        .metadata
        .notes
        .contains(&"season statistics defaulted".to_string()));

    let analysis = analysis_rows(&rows, &predictions);
    assert_eq!(analysis.len(), 3);
    assert!(analysis.windows(2).all(|w| w[0].highest >= w[1].highest));
    assert_eq!(analysis[0].prediction, Outcome::Home);

    let mut csv = Vec::new();
    write_csv(&mut csv, &analysis).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 4);
    assert!(!xlsx_bytes(&analysis).unwrap().is_empty());
}

#[tokio::test]
async fn test_models_agree_on_favourite() {
    for model in ["poisson", "simple", "standings"] {
        let (predictor, _) = predictor(model);
        let prediction = predictor.predict(STRONG, WEAK, LEAGUE).await.unwrap();
        assert_eq!(prediction.metadata.model, model);
        assert!(
            prediction.probabilities.home_win > prediction.probabilities.away_win,
            "{} favoured the weak side",
            model
        );
    }
}

#[tokio::test]
async fn test_prediction_cache_persists() {
    let (predictor, cache) = predictor("simple");
    let first = predictor.cached_prediction(STRONG, WEAK, LEAGUE).await;
    assert!(!first.is_fallback());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    cache.save(&path).unwrap();

    let restored = ResponseCache::load(&path).unwrap();
    assert_eq!(restored.len(), cache.len());
    assert!(restored
        .namespaces()
        .iter()
        .any(|ns| ns == betbuddy_core::cache::ns::PREDICTIONS));
}

fn live_client() -> Option<ApiFootballClient> {
    let key = std::env::var("RAPIDAPI_KEY")
        .or_else(|_| std::env::var("API_FOOTBALL_KEY"))
        .ok()?;
    ApiFootballClient::new(ApiFootballConfig::new(key)).ok()
}

#[tokio::test]
#[ignore] // Requires network
async fn test_live_premier_league_standings() {
    let Some(client) = live_client() else {
        println!("Warning: no API key set, skipping");
        return;
    };
    let season = current_season(chrono::Local::now().date_naive());
    match client.standings(LEAGUE, season).await {
        Ok(table) => {
            println!("Premier League {}: {} teams", season, table.len());
            assert!(table.rows.windows(2).all(|w| w[0].rank <= w[1].rank));
        }
        Err(e) => println!("Warning: Could not fetch standings: {}", e),
    }
}

#[tokio::test]
#[ignore] // Requires network
async fn test_live_batch_prediction() {
    let Some(client) = live_client() else {
        println!("Warning: no API key set, skipping");
        return;
    };
    let cache = Arc::new(ResponseCache::new());
    let predictor = Predictor::new(
        Arc::new(CachedDataSource::new(client, cache.clone())),
        cache,
        PredictionModelRegistry::new().into_model("poisson").unwrap(),
        PredictorConfig::default(),
    );
    let fixtures = predictor
        .upcoming_fixtures(&[LEAGUE], chrono::Local::now().date_naive())
        .await;
    let predictions = predictor.predict_batch(&fixtures[..fixtures.len().min(3)]).await;
    for (f, p) in fixtures.iter().zip(&predictions) {
        println!(
            "{}: {:.2}/{:.2}/{:.2} ({})",
            f.title(),
            p.probabilities.home_win,
            p.probabilities.draw,
            p.probabilities.away_win,
            p.metadata.model
        );
        assert!(p.probabilities.is_valid());
    }
}
