//! Table rows shown to the user and written to exports.
//!
//! This module provides:
//! - Fixture rows with table positions looked up by team name
//! - Standings rows with their European / relegation zone
//! - Prediction analysis rows (rounded percentages, predicted result, details)

use serde::Serialize;
use strsim::jaro_winkler;

use crate::models::{Fixture, LeagueTable, MatchPrediction, Outcome, TableZone};

/// Kickoff format used in fixture keys and exports.
pub const KICKOFF_FORMAT: &str = "%d/%m/%Y %I:%M %p";

/// Minimum Jaro-Winkler score for a fuzzy team name match.
const FUZZY_THRESHOLD: f64 = 0.88;

const NOT_AVAILABLE: &str = "N/A";

/// Analysis rows produced by our own models carry this source label.
pub const MODEL_SOURCE: &str = "Our Model";

// ============================================================================
// Team name matching
// ============================================================================

/// Lowercases, drops punctuation and common club affixes.
fn normalize_team_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| !matches!(*w, "fc" | "afc" | "cf" | "sc" | "ac"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Table position for a team name: exact, then normalized, then fuzzy.
pub fn find_position(table: &LeagueTable, team_name: &str) -> Option<u32> {
    if let Some(row) = table.rows.iter().find(|s| s.team.name == team_name) {
        return Some(row.rank);
    }

    let wanted = normalize_team_name(team_name);
    if wanted.is_empty() {
        return None;
    }
    if let Some(row) = table
        .rows
        .iter()
        .find(|s| normalize_team_name(&s.team.name) == wanted)
    {
        return Some(row.rank);
    }

    table
        .rows
        .iter()
        .map(|s| (jaro_winkler(&wanted, &normalize_team_name(&s.team.name)), s.rank))
        .filter(|(score, _)| *score >= FUZZY_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, rank)| rank)
}

/// "1st", "2nd", "11th", ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

fn position_label(position: Option<u32>) -> String {
    position
        .map(ordinal)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// ============================================================================
// Fixture rows
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FixtureRow {
    /// "Home vs Away (dd/mm/YYYY hh:mm AM)"
    pub key: String,
    pub date: String,
    pub league: String,
    pub home_position: String,
    pub home_team: String,
    pub away_team: String,
    pub away_position: String,
    pub home_id: u32,
    pub away_id: u32,
    pub league_id: u32,
}

pub fn fixture_row(fixture: &Fixture, table: Option<&LeagueTable>) -> FixtureRow {
    let date = fixture.kickoff.format(KICKOFF_FORMAT).to_string();
    let lookup = |name: &str| table.and_then(|t| find_position(t, name));
    FixtureRow {
        key: format!("{} ({})", fixture.title(), date),
        date,
        league: fixture.league_name.clone(),
        home_position: position_label(lookup(&fixture.home.name)),
        home_team: fixture.home.name.clone(),
        away_team: fixture.away.name.clone(),
        away_position: position_label(lookup(&fixture.away.name)),
        home_id: fixture.home.id,
        away_id: fixture.away.id,
        league_id: fixture.league_id,
    }
}

// ============================================================================
// Standings rows
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    pub position: u32,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: i32,
    pub form: String,
    pub zone: TableZone,
}

pub fn standings_rows(table: &LeagueTable) -> Vec<StandingRow> {
    table
        .rows
        .iter()
        .map(|s| StandingRow {
            position: s.rank,
            team: s.team.name.clone(),
            played: s.played,
            won: s.won,
            drawn: s.drawn,
            lost: s.lost,
            goals_for: s.goals_for,
            goals_against: s.goals_against,
            goal_difference: s.goal_difference,
            points: s.points,
            form: s.form.clone().unwrap_or_default(),
            zone: TableZone::for_position(s.rank, table.len()),
        })
        .collect()
}

// ============================================================================
// Analysis rows
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRow {
    pub date: String,
    pub league: String,
    pub home_position: String,
    pub home_team: String,
    pub away_team: String,
    pub away_position: String,
    /// Whole-number percentages
    pub home_win: u32,
    pub draw: u32,
    pub away_win: u32,
    pub highest: u32,
    pub prediction: Outcome,
    pub details: String,
    pub alternative_bet: String,
    pub source: String,
}

fn details(prediction: &MatchPrediction) -> String {
    format!(
        "Expected Goals: {:.2} - {:.2}\nExpected Cards: {:.1}\nConfidence: {}",
        prediction.expected_goals.home,
        prediction.expected_goals.away,
        prediction.cards.total,
        prediction.metadata.confidence
    )
}

pub fn analysis_row(fixture: &FixtureRow, prediction: &MatchPrediction) -> AnalysisRow {
    let (home_win, draw, away_win) = prediction.probabilities.rounded_percentages();
    let (outcome, highest) = prediction.probabilities.predicted();
    AnalysisRow {
        date: fixture.date.clone(),
        league: fixture.league.clone(),
        home_position: fixture.home_position.clone(),
        home_team: fixture.home_team.clone(),
        away_team: fixture.away_team.clone(),
        away_position: fixture.away_position.clone(),
        home_win,
        draw,
        away_win,
        highest,
        prediction: outcome,
        details: details(prediction),
        alternative_bet: prediction.alternative_bet(),
        source: MODEL_SOURCE.to_string(),
    }
}

/// Pairs fixtures with predictions and sorts by highest probability.
pub fn analysis_rows(fixtures: &[FixtureRow], predictions: &[MatchPrediction]) -> Vec<AnalysisRow> {
    let mut rows: Vec<AnalysisRow> = fixtures
        .iter()
        .zip(predictions)
        .map(|(f, p)| analysis_row(f, p))
        .collect();
    sort_by_highest(&mut rows);
    rows
}

/// Highest probability first; stable for equal values.
pub fn sort_by_highest(rows: &mut [AnalysisRow]) {
    rows.sort_by(|a, b| b.highest.cmp(&a.highest));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Standing, TeamRef};
    use crate::probability::fallback_prediction;
    use chrono::{FixedOffset, TimeZone};

    fn table(names: &[&str]) -> LeagueTable {
        LeagueTable {
            league_id: 39,
            season: 2024,
            rows: names
                .iter()
                .enumerate()
                .map(|(i, name)| Standing {
                    rank: i as u32 + 1,
                    team: TeamRef::new(100 + i as u32, *name),
                    points: 40 - i as i32,
                    goal_difference: 0,
                    played: 20,
                    won: 10,
                    drawn: 5,
                    lost: 5,
                    goals_for: 30,
                    goals_against: 30,
                    form: None,
                })
                .collect(),
        }
    }

    fn fixture(home: &str, away: &str) -> Fixture {
        Fixture {
            fixture_id: 1,
            kickoff: FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2024, 9, 14, 17, 30, 0)
                .unwrap(),
            home: TeamRef::new(33, home),
            away: TeamRef::new(40, away),
            league_id: 39,
            league_name: "Premier League".into(),
            country: "England".into(),
            venue: None,
            status: "NS".into(),
        }
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn test_find_position() {
        let t = table(&["Arsenal", "Manchester United", "Brighton & Hove Albion", "AFC Bournemouth"]);
        assert_eq!(find_position(&t, "Manchester United"), Some(2));
        assert_eq!(find_position(&t, "Bournemouth"), Some(4));
        assert_eq!(find_position(&t, "Brighton & Hove Albion FC"), Some(3));
        assert_eq!(find_position(&t, "Manchester Utd"), Some(2));
        assert_eq!(find_position(&t, "Real Madrid"), None);
        assert_eq!(find_position(&t, ""), None);
    }

    #[test]
    fn test_fixture_row_key_and_positions() {
        let t = table(&["Arsenal", "Liverpool"]);
        let row = fixture_row(&fixture("Liverpool", "Everton"), Some(&t));
        assert_eq!(row.key, "Liverpool vs Everton (14/09/2024 05:30 PM)");
        assert_eq!(row.home_position, "2nd");
        assert_eq!(row.away_position, "N/A");

        let row = fixture_row(&fixture("Liverpool", "Everton"), None);
        assert_eq!(row.home_position, "N/A");
    }

    #[test]
    fn test_standings_zones() {
        let names: Vec<String> = (1..=20).map(|i| format!("Team {}", i)).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let rows = standings_rows(&table(&refs));
        assert_eq!(rows[0].zone, TableZone::ChampionsLeague);
        assert_eq!(rows[4].zone, TableZone::EuropaLeague);
        assert_eq!(rows[9].zone, TableZone::MidTable);
        assert_eq!(rows[17].zone, TableZone::Relegation);
    }

    #[test]
    fn test_analysis_row() {
        let row = fixture_row(&fixture("Liverpool", "Everton"), None);
        let analysis = analysis_row(&row, &fallback_prediction("test"));
        assert_eq!((analysis.home_win, analysis.draw, analysis.away_win), (40, 25, 35));
        assert_eq!(analysis.highest, 40);
        assert_eq!(analysis.prediction, Outcome::Home);
        assert_eq!(analysis.source, "Our Model");
        assert!(analysis.details.starts_with("Expected Goals: 1.50 - 1.30\n"));
        assert!(analysis.details.ends_with("Confidence: low"));
    }

    #[test]
    fn test_rows_sorted_by_highest() {
        let fixtures = vec![
            fixture_row(&fixture("A", "B"), None),
            fixture_row(&fixture("C", "D"), None),
        ];
        let low = fallback_prediction("x");
        let mut high = fallback_prediction("y");
        high.probabilities = crate::models::OutcomeProbabilities::new(0.2, 0.2, 0.6);
        let rows = analysis_rows(&fixtures, &[low, high]);
        assert_eq!(rows[0].home_team, "C");
        assert_eq!(rows[0].highest, 60);
        assert_eq!(rows[0].prediction, Outcome::Away);
    }
}
