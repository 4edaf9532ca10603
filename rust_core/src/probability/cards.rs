//! Card estimates.
//!
//! The fixtures feed carries no booking data, so per-match yellows are
//! estimated from the result: a base of two, one more after a defeat and half
//! a card more in games with four or more goals.

use serde::{Deserialize, Serialize};

use super::poisson;
use crate::models::{CardsPrediction, CompletedMatch, ExpectedGoals, TeamOutcome};

/// League-wide average cards per match.
pub const BASE_MATCH_CARDS: f64 = 3.5;
const HOME_CARD_SHARE: f64 = 0.45;
const AWAY_CARD_SHARE: f64 = 0.55;
const BASE_YELLOWS: f64 = 2.0;

/// Fifteen-minute buckets in the order cards are spread across them.
pub const MINUTE_BUCKETS: [(&str, f64); 6] = [
    ("61-75", 0.4),
    ("76-90", 0.4),
    ("31-45", 0.3),
    ("46-60", 0.3),
    ("0-15", 0.2),
    ("16-30", 0.2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTrend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAnalysis {
    pub yellow_cards: f64,
    pub matches_analyzed: usize,
    pub yellow_per_game: f64,
    /// (bucket, estimated cards)
    pub cards_by_minute: Vec<(String, f64)>,
    pub h2h_yellow_cards: f64,
    pub h2h_matches_analyzed: usize,
    pub h2h_yellow_per_game: f64,
    pub trend: CardTrend,
    pub high_risk_periods: Vec<String>,
}

fn estimated_yellows(m: &CompletedMatch, team_id: u32) -> f64 {
    let (scored, conceded) = m.goals_for_team(team_id);
    let mut yellows = BASE_YELLOWS;
    if scored < conceded {
        yellows += 1.0;
    }
    if scored + conceded >= 4 {
        yellows += 0.5;
    }
    yellows
}

/// Rougher per-match weight used only for the trend comparison.
fn trend_weight(m: &CompletedMatch, team_id: u32) -> f64 {
    if m.outcome_for(team_id) == TeamOutcome::Loss {
        2.0
    } else {
        1.5
    }
}

/// Card pattern for `team_id` over its last eight matches (oldest first) and
/// optional head-to-head meetings.
pub fn analyze_cards(team_id: u32, matches: &[CompletedMatch], h2h: &[CompletedMatch]) -> CardAnalysis {
    let recent = &matches[matches.len().saturating_sub(8)..];
    let mut by_minute: Vec<(String, f64)> = MINUTE_BUCKETS
        .iter()
        .map(|(bucket, _)| (bucket.to_string(), 0.0))
        .collect();

    let mut yellow_cards = 0.0;
    for m in recent {
        let mut left = estimated_yellows(m, team_id);
        yellow_cards += left;
        for (slot, (_, share)) in by_minute.iter_mut().zip(MINUTE_BUCKETS.iter()) {
            if left > 0.0 {
                slot.1 += share;
                left -= share;
            }
        }
    }

    let mut high_risk_periods = Vec::new();
    let yellow_per_game = if recent.is_empty() {
        0.0
    } else {
        let per_period = yellow_cards / MINUTE_BUCKETS.len() as f64;
        for (bucket, count) in &by_minute {
            if *count >= per_period * 1.5 {
                high_risk_periods.push(bucket.clone());
            }
        }
        yellow_cards / recent.len() as f64
    };

    let h2h_yellow_cards: f64 = h2h.iter().map(|m| estimated_yellows(m, team_id)).sum();
    let h2h_yellow_per_game = if h2h.is_empty() {
        0.0
    } else {
        h2h_yellow_cards / h2h.len() as f64
    };

    let mut trend = CardTrend::Stable;
    if recent.len() >= 4 {
        let n = matches.len();
        let last4: f64 = matches[n - 4..].iter().map(|m| trend_weight(m, team_id)).sum();
        let prev4: f64 = matches[n.saturating_sub(8)..n - 4]
            .iter()
            .map(|m| trend_weight(m, team_id))
            .sum();
        if last4 > prev4 * 1.3 {
            trend = CardTrend::Increasing;
        } else if last4 * 1.3 < prev4 {
            trend = CardTrend::Decreasing;
        }
    }

    CardAnalysis {
        yellow_cards,
        matches_analyzed: recent.len(),
        yellow_per_game,
        cards_by_minute: by_minute,
        h2h_yellow_cards,
        h2h_matches_analyzed: h2h.len(),
        h2h_yellow_per_game,
        trend,
        high_risk_periods,
    }
}

/// Expected cards for a fixture. Tight games (xG gap under 0.5) run 20%
/// above the base rate, lopsided ones (gap over 1.0) 10% below.
pub fn predict_match_cards(xg: &ExpectedGoals) -> CardsPrediction {
    let gap = (xg.home - xg.away).abs();
    let intensity = if gap < 0.5 {
        1.2
    } else if gap > 1.0 {
        0.9
    } else {
        1.0
    };
    let total = BASE_MATCH_CARDS * intensity;
    CardsPrediction {
        total,
        home: total * HOME_CARD_SHARE,
        away: total * AWAY_CARD_SHARE,
        over_2_5: 1.0 - poisson::cdf(2, total),
        over_3_5: 1.0 - poisson::cdf(3, total),
        over_4_5: 1.0 - poisson::cdf(4, total),
    }
}
