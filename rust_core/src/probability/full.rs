//! Full Poisson Model
//!
//! Season scoring rates adjusted by match-history strength, table proximity
//! and head-to-head record, then run through a 0-10 goal grid. Outcome
//! probabilities are capped and floored so a single lopsided input cannot
//! produce a near-certain result.

use tracing::debug;

use super::cards::{analyze_cards, predict_match_cards};
use super::form::calculate_form_factor;
use super::h2h::{analyze_head_to_head, HeadToHead};
use super::markets::{alternative_markets, calculate_volatility, identify_value_bets};
use super::poisson::ScoreMatrix;
use super::strength::{calculate_strength_index, StrengthIndex};
use super::team_stats::calculate_team_stats;
use super::{DataNeeds, MatchInput, PredictionModel};
use crate::error::PredictionError;
use crate::models::{
    CompletedMatch, ExpectedGoals, MatchHistory, MatchPrediction, OutcomeProbabilities,
    PredictionMetadata, TeamAnalysis, TeamReport, TeamSeasonStats,
};

const MAX_GOALS: u32 = 10;

const HOME_CAP: f64 = 0.75;
const AWAY_CAP: f64 = 0.65;
const DRAW_FLOOR: f64 = 0.15;
const AWAY_FLOOR: f64 = 0.10;

/// Share of a capped excess that moves to the draw; the rest goes to the
/// other side.
const EXCESS_TO_DRAW: f64 = 0.6;

const CLOSE_ATTACK_GAP: f64 = 0.2;
const CLOSE_POSITION_GAP: u32 = 5;
const CLOSE_POINTS_GAP: i32 = 10;

/// Venue multipliers and attack/defence ratio bounds for one match type.
#[derive(Debug, Clone, Copy)]
struct Adjustment {
    home: f64,
    away: f64,
    ratio_min: f64,
    ratio_max: f64,
}

const CLOSE_MATCH: Adjustment = Adjustment {
    home: 1.01,
    away: 0.99,
    ratio_min: 0.9,
    ratio_max: 1.1,
};

const OPEN_MATCH: Adjustment = Adjustment {
    home: 1.02,
    away: 0.98,
    ratio_min: 0.8,
    ratio_max: 1.2,
};

/// Full model: needs season stats, match history, head-to-head and the table.
#[derive(Debug, Clone, Default)]
pub struct PoissonModel;

impl PoissonModel {
    pub fn new() -> Self {
        Self
    }
}

/// Table rank and points for a team, (0, 0) when the table does not list it.
fn table_entry(input: &MatchInput, team_id: u32) -> (u32, i32) {
    input
        .table
        .as_ref()
        .and_then(|t| t.by_team_id(team_id))
        .map(|s| (s.rank, s.points))
        .unwrap_or((0, 0))
}

fn is_close_match(input: &MatchInput, home: &StrengthIndex, away: &StrengthIndex) -> bool {
    let (home_rank, home_points) = table_entry(input, input.home_team_id);
    let (away_rank, away_points) = table_entry(input, input.away_team_id);
    (home.attack - away.attack).abs() < CLOSE_ATTACK_GAP
        && home_rank.abs_diff(away_rank) <= CLOSE_POSITION_GAP
        && (home_points - away_points).abs() <= CLOSE_POINTS_GAP
}

fn safe_ratio(attack: f64, defense: f64) -> f64 {
    if defense > 0.0 {
        attack / defense
    } else {
        1.0
    }
}

/// Expected goals for both sides.
pub fn expected_goals(
    home_stats: &TeamSeasonStats,
    away_stats: &TeamSeasonStats,
    home: &StrengthIndex,
    away: &StrengthIndex,
    close: bool,
    h2h_factor: f64,
) -> ExpectedGoals {
    let adj = if close { CLOSE_MATCH } else { OPEN_MATCH };

    let mut home_xg = home_stats.metrics_or_default().goals_per_game * adj.home;
    let mut away_xg = away_stats.metrics_or_default().goals_per_game * adj.away;

    home_xg *= safe_ratio(home.attack, away.defense).clamp(adj.ratio_min, adj.ratio_max);
    away_xg *= safe_ratio(away.attack, home.defense).clamp(adj.ratio_min, adj.ratio_max);

    let h2h = h2h_factor.clamp(0.9, 1.1);
    home_xg *= h2h;
    away_xg /= h2h;

    ExpectedGoals::new(home_xg, away_xg)
}

/// Caps, floors and renormalises raw grid probabilities.
pub fn bound_probabilities(raw: OutcomeProbabilities) -> OutcomeProbabilities {
    let OutcomeProbabilities {
        mut home_win,
        mut draw,
        mut away_win,
    } = raw;

    if home_win > HOME_CAP {
        let excess = home_win - HOME_CAP;
        home_win = HOME_CAP;
        draw += excess * EXCESS_TO_DRAW;
        away_win += excess * (1.0 - EXCESS_TO_DRAW);
    }
    if away_win > AWAY_CAP {
        let excess = away_win - AWAY_CAP;
        away_win = AWAY_CAP;
        draw += excess * EXCESS_TO_DRAW;
        home_win += excess * (1.0 - EXCESS_TO_DRAW);
    }

    if draw < DRAW_FLOOR {
        let shortage = DRAW_FLOOR - draw;
        draw = DRAW_FLOOR;
        if home_win > away_win {
            home_win -= shortage;
        } else {
            away_win -= shortage;
        }
    }
    if away_win < AWAY_FLOOR {
        let shortage = AWAY_FLOOR - away_win;
        away_win = AWAY_FLOOR;
        home_win -= shortage;
    }

    OutcomeProbabilities::new(home_win.max(0.0), draw, away_win).normalized()
}

fn team_report(
    team_id: u32,
    stats: &TeamSeasonStats,
    history: &MatchHistory,
    strength: StrengthIndex,
    h2h: &[CompletedMatch],
) -> TeamReport {
    let matches = &history.current_league;
    TeamReport {
        form: stats.form.clone(),
        recent_form: calculate_form_factor(matches, team_id),
        strength,
        cards: analyze_cards(team_id, matches, h2h),
    }
}

impl PredictionModel for PoissonModel {
    fn name(&self) -> &'static str {
        "poisson"
    }

    fn needs(&self) -> DataNeeds {
        DataNeeds {
            season_stats: true,
            match_history: true,
            head_to_head: true,
            standings: true,
        }
    }

    fn predict(&self, input: &MatchInput) -> Result<MatchPrediction, PredictionError> {
        input.validate()?;

        let home_perf = calculate_team_stats(input.home_team_id, &input.home_history);
        let away_perf = calculate_team_stats(input.away_team_id, &input.away_history);
        let home_strength = calculate_strength_index(&home_perf);
        let away_strength = calculate_strength_index(&away_perf);

        let meetings = input.head_to_head.as_deref().unwrap_or(&[]);
        let h2h = if meetings.is_empty() {
            HeadToHead::neutral()
        } else {
            analyze_head_to_head(meetings, input.home_team_id, input.away_team_id)
        };

        let close = is_close_match(input, &home_strength, &away_strength);
        let xg = expected_goals(
            &input.home_stats,
            &input.away_stats,
            &home_strength,
            &away_strength,
            close,
            h2h.h2h_factor,
        );
        debug!(
            "poisson {} vs {}: close={} xg {:.2}-{:.2}",
            input.home_team_id, input.away_team_id, close, xg.home, xg.away
        );

        let raw = ScoreMatrix::new(xg.home, xg.away, MAX_GOALS).outcome_split();
        let probabilities = bound_probabilities(raw);
        if !probabilities.is_valid() {
            return Err(PredictionError::InvalidProbabilities(format!(
                "{:.4}/{:.4}/{:.4}",
                probabilities.home_win, probabilities.draw, probabilities.away_win
            )));
        }

        let confidence = home_strength.confidence.min(away_strength.confidence);
        let volatility = calculate_volatility(
            home_strength.variability,
            away_strength.variability,
            home_perf.recent_form.form_rating,
            away_perf.recent_form.form_rating,
        );

        let home = team_report(
            input.home_team_id,
            &input.home_stats,
            &input.home_history,
            home_strength,
            meetings,
        );
        let away = team_report(
            input.away_team_id,
            &input.away_stats,
            &input.away_history,
            away_strength,
            meetings,
        );

        let mut notes = Vec::new();
        if input.head_to_head.is_none() {
            notes.push("head-to-head unavailable".to_string());
        }
        if !input.home_stats.available || !input.away_stats.available {
            notes.push("season statistics defaulted".to_string());
        }

        Ok(MatchPrediction {
            probabilities,
            expected_goals: xg,
            cards: predict_match_cards(&xg),
            metadata: PredictionMetadata {
                confidence,
                model: self.name().to_string(),
                home_games_analyzed: input.home_stats.games_played(),
                away_games_analyzed: input.away_stats.games_played(),
                fallback: false,
                data_quality: Some(
                    input
                        .home_history
                        .data_quality
                        .min(input.away_history.data_quality),
                ),
                notes,
            },
            team_analysis: Some(TeamAnalysis {
                home,
                away,
                head_to_head: h2h,
            }),
            markets: Some(alternative_markets(&xg)),
            value_bets: identify_value_bets(&probabilities, &xg),
            volatility: Some(volatility),
            suggested_bet: None,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
