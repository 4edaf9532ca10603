//! Team performance aggregated from completed matches.

use serde::{Deserialize, Serialize};

use crate::models::{CompletedMatch, MatchHistory, TeamOutcome};

/// Weight applied to results from other competitions when a team has no
/// games in the league being predicted.
pub const OTHER_LEAGUE_ADJUSTMENT: f64 = 0.85;

/// Size of the recent-form window.
pub const RECENT_WINDOW: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueRecord {
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub clean_sheets: u32,
    pub failed_to_score: u32,
    pub home: VenueRecord,
    pub away: VenueRecord,
}

impl LeagueRecord {
    fn add(&mut self, m: &CompletedMatch, team_id: u32) {
        let (scored, conceded) = m.goals_for_team(team_id);
        let outcome = m.outcome_for(team_id);

        self.games_played += 1;
        self.goals_scored += scored;
        self.goals_conceded += conceded;
        if conceded == 0 {
            self.clean_sheets += 1;
        }
        if scored == 0 {
            self.failed_to_score += 1;
        }

        let venue = if m.is_home(team_id) {
            &mut self.home
        } else {
            &mut self.away
        };
        venue.games += 1;
        venue.goals_scored += scored;
        venue.goals_conceded += conceded;

        match outcome {
            TeamOutcome::Win => {
                self.wins += 1;
                venue.wins += 1;
            }
            TeamOutcome::Draw => {
                self.draws += 1;
                venue.draws += 1;
            }
            TeamOutcome::Loss => {
                self.losses += 1;
                venue.losses += 1;
            }
        }
    }
}

/// Results of the most recent league games, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    pub results: Vec<TeamOutcome>,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub points: u32,
    /// Points won as a share of points available, 0-100.
    pub form_rating: f64,
    pub clean_sheets: u32,
    pub failed_to_score: u32,
}

impl RecentForm {
    /// "WDLWW" style string, oldest first.
    pub fn sequence(&self) -> String {
        self.results.iter().map(|r| r.letter()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    CurrentLeague,
    OtherLeagues,
    LeagueAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub points_per_game: f64,
    pub goals_scored_per_game: f64,
    pub goals_conceded_per_game: f64,
    pub clean_sheet_percentage: f64,
    pub win_percentage: f64,
    pub home_win_percentage: f64,
    pub away_win_percentage: f64,
    pub scoring_consistency: f64,
    pub defensive_stability: f64,
}

impl PerformanceMetrics {
    /// League-average defaults for a team with no matches at all.
    pub fn league_average() -> Self {
        Self {
            points_per_game: 1.5,
            goals_scored_per_game: 1.5,
            goals_conceded_per_game: 1.5,
            clean_sheet_percentage: 30.0,
            win_percentage: 33.0,
            home_win_percentage: 40.0,
            away_win_percentage: 26.0,
            scoring_consistency: 70.0,
            defensive_stability: 30.0,
        }
    }

    fn from_current(r: &LeagueRecord) -> Self {
        let games = r.games_played as f64;
        let pct = |n: u32, d: u32| if d > 0 { n as f64 / d as f64 * 100.0 } else { 0.0 };
        Self {
            points_per_game: (r.wins * 3 + r.draws) as f64 / games,
            goals_scored_per_game: r.goals_scored as f64 / games,
            goals_conceded_per_game: r.goals_conceded as f64 / games,
            clean_sheet_percentage: pct(r.clean_sheets, r.games_played),
            win_percentage: pct(r.wins, r.games_played),
            home_win_percentage: pct(r.home.wins, r.home.games),
            away_win_percentage: pct(r.away.wins, r.away.games),
            scoring_consistency: (1.0 - r.failed_to_score as f64 / games) * 100.0,
            defensive_stability: pct(r.clean_sheets, r.games_played),
        }
    }

    /// Other-competition results scaled down for the change of league.
    /// Venue win rates are not tracked there and keep their averages.
    fn from_other(r: &LeagueRecord) -> Self {
        let games = r.games_played as f64;
        let adj = OTHER_LEAGUE_ADJUSTMENT;
        let defaults = Self::league_average();
        Self {
            points_per_game: (r.wins * 3 + r.draws) as f64 / games * adj,
            goals_scored_per_game: r.goals_scored as f64 / games * adj,
            goals_conceded_per_game: r.goals_conceded as f64 / games / adj,
            clean_sheet_percentage: r.clean_sheets as f64 / games * 100.0 * adj,
            win_percentage: r.wins as f64 / games * 100.0 * adj,
            home_win_percentage: defaults.home_win_percentage,
            away_win_percentage: defaults.away_win_percentage,
            scoring_consistency: (1.0 - r.failed_to_score as f64 / games) * 100.0 * adj,
            defensive_stability: r.clean_sheets as f64 / games * 100.0 * adj,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformance {
    pub team_id: u32,
    pub current_league: LeagueRecord,
    pub other_leagues: LeagueRecord,
    /// Every current-league result, oldest first.
    pub form_sequence: Vec<TeamOutcome>,
    pub recent_form: RecentForm,
    pub metrics: PerformanceMetrics,
    pub metrics_source: MetricsSource,
}

/// Aggregates a team's match history into records, recent form and
/// per-game metrics.
pub fn calculate_team_stats(team_id: u32, history: &MatchHistory) -> TeamPerformance {
    let mut current: Vec<&CompletedMatch> = history.current_league.iter().collect();
    current.sort_by_key(|m| m.date);

    let mut current_league = LeagueRecord::default();
    let mut form_sequence = Vec::with_capacity(current.len());
    for m in &current {
        current_league.add(m, team_id);
        form_sequence.push(m.outcome_for(team_id));
    }

    let mut other_leagues = LeagueRecord::default();
    for m in &history.other_leagues {
        other_leagues.add(m, team_id);
    }

    let window = &current[current.len().saturating_sub(RECENT_WINDOW)..];
    let mut recent_form = RecentForm::default();
    for m in window {
        let (scored, conceded) = m.goals_for_team(team_id);
        let outcome = m.outcome_for(team_id);
        recent_form.goals_scored += scored;
        recent_form.goals_conceded += conceded;
        if conceded == 0 {
            recent_form.clean_sheets += 1;
        }
        if scored == 0 {
            recent_form.failed_to_score += 1;
        }
        recent_form.points += outcome.points();
        recent_form.results.push(outcome);
    }
    if !window.is_empty() {
        recent_form.form_rating = recent_form.points as f64 / (window.len() * 3) as f64 * 100.0;
    }

    let (metrics, metrics_source) = if current_league.games_played > 0 {
        (
            PerformanceMetrics::from_current(&current_league),
            MetricsSource::CurrentLeague,
        )
    } else if other_leagues.games_played > 0 {
        (
            PerformanceMetrics::from_other(&other_leagues),
            MetricsSource::OtherLeagues,
        )
    } else {
        (PerformanceMetrics::league_average(), MetricsSource::LeagueAverage)
    };

    TeamPerformance {
        team_id,
        current_league,
        other_leagues,
        form_sequence,
        recent_form,
        metrics,
        metrics_source,
    }
}

/// Average goals across a set of matches; typical league values when empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverages {
    pub goals_per_game: f64,
    pub home_goals: f64,
    pub away_goals: f64,
}

impl Default for LeagueAverages {
    fn default() -> Self {
        Self {
            goals_per_game: 2.5,
            home_goals: 1.4,
            away_goals: 1.1,
        }
    }
}

pub fn calculate_league_averages(matches: &[CompletedMatch]) -> LeagueAverages {
    if matches.is_empty() {
        return LeagueAverages::default();
    }
    let n = matches.len() as f64;
    let home: u32 = matches.iter().map(|m| m.home_goals).sum();
    let away: u32 = matches.iter().map(|m| m.away_goals).sum();
    LeagueAverages {
        goals_per_game: (home + away) as f64 / n,
        home_goals: home as f64 / n,
        away_goals: away as f64 / n,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    /// Builds a history for team 1 from (home?, scored, conceded), oldest first.
    pub(crate) fn history(results: &[(bool, u32, u32)]) -> Vec<CompletedMatch> {
        let start = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 8, 10, 15, 0, 0)
            .unwrap();
        results
            .iter()
            .enumerate()
            .map(|(i, &(home, scored, conceded))| CompletedMatch {
                date: start + Duration::days(7 * i as i64),
                home_team: if home { 1 } else { 100 + i as u32 },
                away_team: if home { 100 + i as u32 } else { 1 },
                home_goals: if home { scored } else { conceded },
                away_goals: if home { conceded } else { scored },
                league_id: 39,
                season: Some(2024),
                venue: None,
            })
            .collect()
    }

    fn match_history(current: Vec<CompletedMatch>, other: Vec<CompletedMatch>) -> MatchHistory {
        MatchHistory {
            team_id: 1,
            league_id: 39,
            current_league: current,
            other_leagues: other,
            ..Default::default()
        }
    }

    #[test]
    fn test_current_league_record() {
        let h = match_history(
            history(&[(true, 2, 0), (false, 1, 1), (true, 0, 3), (false, 2, 1)]),
            vec![],
        );
        let perf = calculate_team_stats(1, &h);

        let r = &perf.current_league;
        assert_eq!((r.wins, r.draws, r.losses), (2, 1, 1));
        assert_eq!((r.goals_scored, r.goals_conceded), (5, 5));
        assert_eq!(r.clean_sheets, 1);
        assert_eq!(r.failed_to_score, 1);
        assert_eq!((r.home.games, r.home.wins, r.home.losses), (2, 1, 1));
        assert_eq!((r.away.games, r.away.wins, r.away.draws), (2, 1, 1));
        assert_eq!(perf.recent_form.sequence(), "WDLW");

        let m = perf.metrics;
        assert_eq!(perf.metrics_source, MetricsSource::CurrentLeague);
        assert!((m.points_per_game - 7.0 / 4.0).abs() < 1e-9);
        assert!((m.home_win_percentage - 50.0).abs() < 1e-9);
        assert!((m.scoring_consistency - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_form_uses_last_eight() {
        let mut results = vec![(true, 0, 1); 4];
        results.extend(vec![(true, 2, 0); 8]);
        let perf = calculate_team_stats(1, &match_history(history(&results), vec![]));

        assert_eq!(perf.recent_form.results.len(), 8);
        assert_eq!(perf.recent_form.points, 24);
        assert!((perf.recent_form.form_rating - 100.0).abs() < 1e-9);
        assert_eq!(perf.recent_form.clean_sheets, 8);
        assert_eq!(perf.form_sequence.len(), 12);
    }

    #[test]
    fn test_other_league_fallback_is_scaled() {
        let other = history(&[(true, 2, 1), (false, 2, 1)]);
        let perf = calculate_team_stats(1, &match_history(vec![], other));

        assert_eq!(perf.metrics_source, MetricsSource::OtherLeagues);
        assert!((perf.metrics.goals_scored_per_game - 2.0 * 0.85).abs() < 1e-9);
        assert!((perf.metrics.goals_conceded_per_game - 1.0 / 0.85).abs() < 1e-9);
        assert!((perf.metrics.points_per_game - 3.0 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_no_matches_uses_league_average() {
        let perf = calculate_team_stats(1, &match_history(vec![], vec![]));
        assert_eq!(perf.metrics_source, MetricsSource::LeagueAverage);
        assert_eq!(perf.metrics, PerformanceMetrics::league_average());
        assert_eq!(perf.recent_form.form_rating, 0.0);
    }

    #[test]
    fn test_league_averages() {
        let matches = history(&[(true, 2, 0), (true, 1, 1)]);
        let avg = calculate_league_averages(&matches);
        assert!((avg.goals_per_game - 2.0).abs() < 1e-9);
        assert!((avg.home_goals - 1.5).abs() < 1e-9);
        assert_eq!(calculate_league_averages(&[]), LeagueAverages::default());
    }
}
