// Shared domain models for BetBuddy crates
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

mod prediction;

pub use prediction::*;

// ============================================================================
// Teams & Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

impl TeamRef {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An upcoming (or in-progress) fixture as returned by the fixtures endpoint.
///
/// `kickoff` keeps the offset the API answered with; requests ask for
/// `Europe/London` so display formatting happens in that zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: u64,
    pub kickoff: DateTime<FixedOffset>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub league_id: u32,
    pub league_name: String,
    pub country: String,
    pub venue: Option<String>,
    /// Short status code (NS, FT, PST, ...)
    pub status: String,
}

impl Fixture {
    /// "Home vs Away"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }
}

// ============================================================================
// Completed matches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "H")]
    HomeWin,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "A")]
    AwayWin,
}

impl MatchResult {
    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => MatchResult::HomeWin,
            std::cmp::Ordering::Equal => MatchResult::Draw,
            std::cmp::Ordering::Less => MatchResult::AwayWin,
        }
    }
}

/// Outcome of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl TeamOutcome {
    pub fn points(&self) -> u32 {
        match self {
            TeamOutcome::Win => 3,
            TeamOutcome::Draw => 1,
            TeamOutcome::Loss => 0,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            TeamOutcome::Win => 'W',
            TeamOutcome::Draw => 'D',
            TeamOutcome::Loss => 'L',
        }
    }
}

/// A finished match (status FT) used as model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMatch {
    pub date: DateTime<FixedOffset>,
    pub home_team: u32,
    pub away_team: u32,
    pub home_goals: u32,
    pub away_goals: u32,
    pub league_id: u32,
    pub season: Option<i32>,
    pub venue: Option<String>,
}

impl CompletedMatch {
    pub fn result(&self) -> MatchResult {
        MatchResult::from_goals(self.home_goals, self.away_goals)
    }

    pub fn is_home(&self, team_id: u32) -> bool {
        self.home_team == team_id
    }

    /// (goals for, goals against) for `team_id`. A team that is not the home
    /// side is treated as the away side.
    pub fn goals_for_team(&self, team_id: u32) -> (u32, u32) {
        if self.is_home(team_id) {
            (self.home_goals, self.away_goals)
        } else {
            (self.away_goals, self.home_goals)
        }
    }

    pub fn outcome_for(&self, team_id: u32) -> TeamOutcome {
        let (scored, conceded) = self.goals_for_team(team_id);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => TeamOutcome::Win,
            std::cmp::Ordering::Equal => TeamOutcome::Draw,
            std::cmp::Ordering::Less => TeamOutcome::Loss,
        }
    }

    /// Signed goal difference from `team_id`'s point of view.
    pub fn goal_difference_for(&self, team_id: u32) -> i32 {
        let (scored, conceded) = self.goals_for_team(team_id);
        scored as i32 - conceded as i32
    }
}

/// Completed matches for one team, split by competition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchHistory {
    pub team_id: u32,
    pub league_id: u32,
    /// Sorted oldest first
    pub current_league: Vec<CompletedMatch>,
    /// Sorted oldest first
    pub other_leagues: Vec<CompletedMatch>,
    pub seasons: Vec<i32>,
    pub leagues_played: Vec<u32>,
    pub data_quality: DataQuality,
    pub errors: Vec<String>,
}

impl MatchHistory {
    pub fn total_matches(&self) -> usize {
        self.current_league.len() + self.other_leagues.len()
    }

    /// Sorts both lists by date and grades the sample size.
    pub fn finalize(&mut self) {
        self.current_league.sort_by_key(|m| m.date);
        self.other_leagues.sort_by_key(|m| m.date);
        self.leagues_played.sort_unstable();
        self.leagues_played.dedup();
        self.data_quality = DataQuality::from_sample(self.current_league.len());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    #[default]
    Low,
    Medium,
    High,
}

impl DataQuality {
    pub fn from_sample(current_league_matches: usize) -> Self {
        match current_league_matches {
            n if n < 10 => DataQuality::Low,
            n if n < 20 => DataQuality::Medium,
            _ => DataQuality::High,
        }
    }
}

// ============================================================================
// Standings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub rank: u32,
    pub team: TeamRef,
    pub points: i32,
    pub goal_difference: i32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub form: Option<String>,
}

/// Full table for one league and season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueTable {
    pub league_id: u32,
    pub season: i32,
    pub rows: Vec<Standing>,
}

impl LeagueTable {
    pub fn by_team_id(&self, team_id: u32) -> Option<&Standing> {
        self.rows.iter().find(|s| s.team.id == team_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// European / relegation zone of a table position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableZone {
    ChampionsLeague,
    EuropaLeague,
    MidTable,
    Relegation,
}

impl TableZone {
    /// Top four, fifth, bottom three.
    pub fn for_position(rank: u32, table_size: usize) -> Self {
        let size = table_size as u32;
        if rank <= 4 {
            TableZone::ChampionsLeague
        } else if rank == 5 {
            TableZone::EuropaLeague
        } else if size >= 3 && rank >= size.saturating_sub(2) {
            TableZone::Relegation
        } else {
            TableZone::MidTable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TableZone::ChampionsLeague => "Champions League",
            TableZone::EuropaLeague => "Europa League",
            TableZone::MidTable => "",
            TableZone::Relegation => "Relegation",
        }
    }
}

// ============================================================================
// Team season statistics
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueSplit<T> {
    pub home: T,
    pub away: T,
    pub total: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiggestStreaks {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

/// Derived per-game rates. Only present when at least one game was played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonMetrics {
    pub points_per_game: f64,
    pub goals_per_game: f64,
    pub goals_against_per_game: f64,
    pub clean_sheet_percentage: f64,
    pub scoring_rate: f64,
}

impl Default for SeasonMetrics {
    fn default() -> Self {
        Self {
            points_per_game: 1.5,
            goals_per_game: 1.5,
            goals_against_per_game: 1.5,
            clean_sheet_percentage: 30.0,
            scoring_rate: 70.0,
        }
    }
}

/// Season aggregate for one team in one league.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeasonStats {
    pub available: bool,
    pub team_id: u32,
    pub league_id: u32,
    pub season: i32,
    pub played: VenueSplit<u32>,
    pub wins: VenueSplit<u32>,
    pub draws: VenueSplit<u32>,
    pub losses: VenueSplit<u32>,
    pub goals_for: VenueSplit<u32>,
    pub goals_against: VenueSplit<u32>,
    pub goals_for_average: f64,
    pub goals_against_average: f64,
    pub clean_sheets: VenueSplit<u32>,
    pub failed_to_score: VenueSplit<u32>,
    pub penalties_scored: u32,
    pub penalties_missed: u32,
    pub form: String,
    pub biggest_streak: BiggestStreaks,
    pub metrics: Option<SeasonMetrics>,
}

impl TeamSeasonStats {
    /// Placeholder used when the statistics endpoint has nothing for a team.
    pub fn unavailable(team_id: u32, league_id: u32, season: i32) -> Self {
        Self {
            available: false,
            team_id,
            league_id,
            season,
            played: VenueSplit::default(),
            wins: VenueSplit::default(),
            draws: VenueSplit::default(),
            losses: VenueSplit::default(),
            goals_for: VenueSplit::default(),
            goals_against: VenueSplit::default(),
            goals_for_average: 1.5,
            goals_against_average: 1.5,
            clean_sheets: VenueSplit::default(),
            failed_to_score: VenueSplit::default(),
            penalties_scored: 0,
            penalties_missed: 0,
            form: "UNKNOWN".to_string(),
            biggest_streak: BiggestStreaks::default(),
            metrics: None,
        }
    }

    /// Recomputes `metrics` from the raw counts.
    pub fn compute_metrics(&mut self) {
        let played = self.played.total;
        if played == 0 {
            self.metrics = None;
            return;
        }
        let p = played as f64;
        self.metrics = Some(SeasonMetrics {
            points_per_game: (self.wins.total * 3 + self.draws.total) as f64 / p,
            goals_per_game: self.goals_for.total as f64 / p,
            goals_against_per_game: self.goals_against.total as f64 / p,
            clean_sheet_percentage: self.clean_sheets.total as f64 / p * 100.0,
            scoring_rate: (1.0 - self.failed_to_score.total as f64 / p) * 100.0,
        });
    }

    /// Metrics, or league-average defaults when none were computed.
    pub fn metrics_or_default(&self) -> SeasonMetrics {
        self.metrics.unwrap_or_default()
    }

    pub fn games_played(&self) -> u32 {
        self.played.total
    }
}

// ============================================================================
// Confidence
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Grades a sample size against (high, medium) thresholds.
    pub fn from_sample(n: usize, high_at: usize, medium_at: usize) -> Self {
        if n >= high_at {
            Confidence::High
        } else if n >= medium_at {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
