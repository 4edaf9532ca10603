//! Recent-form analysis over the last eight matches.

use serde::{Deserialize, Serialize};

use super::{mean, std_dev};
use crate::models::{CompletedMatch, Confidence, TeamOutcome};

/// Weights for the last eight matches, most recent first.
const RECENCY_WEIGHTS: [f64; 8] = [1.3, 1.25, 1.2, 1.15, 1.1, 1.05, 1.0, 0.95];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StronglyImproving,
    SlightlyImproving,
    Stable,
    SlightlyDeclining,
    StronglyDeclining,
    /// Nothing to compare
    Neutral,
}

impl Trend {
    /// Classifies a second-half minus first-half difference against a
    /// "strong" threshold.
    pub fn classify(diff: i64, strong_above: i64) -> Self {
        if diff > strong_above {
            Trend::StronglyImproving
        } else if diff > 0 {
            Trend::SlightlyImproving
        } else if diff < -strong_above {
            Trend::StronglyDeclining
        } else if diff < 0 {
            Trend::SlightlyDeclining
        } else {
            Trend::Stable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::StronglyImproving => "strongly improving",
            Trend::SlightlyImproving => "slightly improving",
            Trend::Stable => "stable",
            Trend::SlightlyDeclining => "slightly declining",
            Trend::StronglyDeclining => "strongly declining",
            Trend::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FormMetrics {
    pub weighted_points: f64,
    pub points_per_game: f64,
    pub goals_scored_avg: f64,
    pub goals_conceded_avg: f64,
    pub clean_sheet_ratio: f64,
    pub failed_to_score_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormResults {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub clean_sheets: u32,
    pub failed_to_score: u32,
    /// Oldest first
    pub goal_differences: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAnalysis {
    /// Multiplier centred on 1.0
    pub form_factor: f64,
    /// 0-100
    pub form_rating: f64,
    pub metrics: FormMetrics,
    pub results: FormResults,
    pub trend: Trend,
    pub goals_trend: Trend,
    /// Per-match performance scores (0-100), oldest first
    pub performances: Vec<f64>,
    pub consistency: f64,
    pub momentum: f64,
    pub confidence: Confidence,
    pub matches_analyzed: usize,
}

impl FormAnalysis {
    /// Neutral analysis for a team without matches.
    pub fn neutral() -> Self {
        Self {
            form_factor: 1.0,
            form_rating: 50.0,
            metrics: FormMetrics::default(),
            results: FormResults::default(),
            trend: Trend::Neutral,
            goals_trend: Trend::Neutral,
            performances: Vec::new(),
            consistency: 0.0,
            momentum: 0.0,
            confidence: Confidence::Low,
            matches_analyzed: 0,
        }
    }
}

/// Performance score of one match: 75+ for a win (bonus up to 15 for the
/// margin), 60 for a draw, 40 minus up to 30 for a loss.
fn match_performance(goal_diff: i32) -> f64 {
    match goal_diff {
        d if d > 0 => 75.0 + (d * 3).min(15) as f64,
        0 => 60.0,
        d => 40.0 + (d * 3).max(-30) as f64,
    }
}

/// Analyses the last eight of `matches` (any order) for `team_id`.
pub fn calculate_form_factor(matches: &[CompletedMatch], team_id: u32) -> FormAnalysis {
    if matches.is_empty() {
        return FormAnalysis::neutral();
    }

    let mut sorted: Vec<&CompletedMatch> = matches.iter().collect();
    sorted.sort_by_key(|m| m.date);
    let last = &sorted[sorted.len().saturating_sub(RECENCY_WEIGHTS.len())..];
    let n = last.len();

    let mut results = FormResults::default();
    let mut performances = Vec::with_capacity(n);
    let (mut points, mut scored, mut conceded, mut total_weight) = (0.0, 0.0, 0.0, 0.0);

    for (age, m) in last.iter().rev().enumerate() {
        let weight = RECENCY_WEIGHTS[age];
        total_weight += weight;

        let (gf, ga) = m.goals_for_team(team_id);
        scored += gf as f64 * weight;
        conceded += ga as f64 * weight;
        match m.outcome_for(team_id) {
            TeamOutcome::Win => {
                results.wins += 1;
                points += 3.0 * weight;
            }
            TeamOutcome::Draw => {
                results.draws += 1;
                points += weight;
            }
            TeamOutcome::Loss => results.losses += 1,
        }
        if ga == 0 {
            results.clean_sheets += 1;
        }
        if gf == 0 {
            results.failed_to_score += 1;
        }
    }

    for m in last {
        let gd = m.goal_difference_for(team_id);
        results.goal_differences.push(gd);
        performances.push(match_performance(gd));
    }

    let weighted_points = points / total_weight;
    let form_rating = weighted_points / 3.0 * 100.0;

    let performance_std = if n > 1 { std_dev(&performances) } else { 0.0 };
    let consistency = (100.0 - performance_std / 2.0).max(0.0);

    let recent = if n >= 3 {
        mean(&performances[n - 3..])
    } else {
        mean(&performances)
    };
    let earlier = if n >= 6 {
        mean(&performances[..n - 3])
    } else {
        mean(&performances)
    };
    let momentum = recent - earlier;

    let form_factor = 0.8
        + form_rating / 100.0 * 0.4
        + (momentum / 200.0).clamp(-0.1, 0.1)
        + consistency / 100.0 * 0.1;

    let (first, second) = last.split_at(n / 2);
    let half_points = |half: &[&CompletedMatch]| -> i64 {
        half.iter().map(|m| m.outcome_for(team_id).points() as i64).sum()
    };
    let half_goals = |half: &[&CompletedMatch]| -> i64 {
        half.iter().map(|m| m.goals_for_team(team_id).0 as i64).sum()
    };
    let trend = Trend::classify(half_points(second) - half_points(first), 3);
    let goals_trend = Trend::classify(half_goals(second) - half_goals(first), 2);

    FormAnalysis {
        form_factor,
        form_rating,
        metrics: FormMetrics {
            weighted_points,
            points_per_game: points / n as f64,
            goals_scored_avg: scored / total_weight,
            goals_conceded_avg: conceded / total_weight,
            clean_sheet_ratio: results.clean_sheets as f64 / n as f64,
            failed_to_score_ratio: results.failed_to_score as f64 / n as f64,
        },
        results,
        trend,
        goals_trend,
        performances,
        consistency,
        momentum,
        confidence: Confidence::from_sample(n, 6, 4),
        matches_analyzed: n,
    }
}
