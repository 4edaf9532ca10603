//! Attack / defence / form strength index.

use serde::{Deserialize, Serialize};

use super::std_dev;
use super::team_stats::{TeamPerformance, RECENT_WINDOW};
use crate::models::Confidence;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackComponents {
    /// Goals per game relative to 1.5, capped at 2
    pub scoring_rate: f64,
    pub consistency: f64,
    pub venue_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenseComponents {
    /// 1.5 over goals conceded per game, capped at 2
    pub defensive_solidity: f64,
    pub clean_sheet_ratio: f64,
    pub stability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormComponents {
    /// Absent when there are no recent matches
    pub recent_points: Option<f64>,
    pub recent_defense: f64,
    pub recent_attack: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthIndex {
    pub overall: f64,
    pub attack: f64,
    pub defense: f64,
    pub attack_components: AttackComponents,
    pub defense_components: DefenseComponents,
    pub form_components: FormComponents,
    pub attack_score: f64,
    pub defense_score: f64,
    pub form_score: f64,
    pub variability: f64,
    pub confidence: Confidence,
}

impl StrengthIndex {
    /// Neutral index used when no performance data exists.
    pub fn neutral() -> Self {
        Self {
            overall: 1.0,
            attack: 1.0,
            defense: 1.0,
            attack_components: AttackComponents {
                scoring_rate: 1.0,
                consistency: 0.7,
                venue_balance: 0.33,
            },
            defense_components: DefenseComponents {
                defensive_solidity: 1.0,
                clean_sheet_ratio: 0.3,
                stability: 0.3,
            },
            form_components: FormComponents {
                recent_points: None,
                recent_defense: 0.0,
                recent_attack: 1.0,
            },
            attack_score: 0.0,
            defense_score: 0.0,
            form_score: 0.0,
            variability: 0.5,
            confidence: Confidence::Low,
        }
    }
}

/// Builds the strength index from aggregated team performance.
pub fn calculate_strength_index(perf: &TeamPerformance) -> StrengthIndex {
    let m = &perf.metrics;
    let window = RECENT_WINDOW as f64;

    let attack_components = AttackComponents {
        scoring_rate: (m.goals_scored_per_game / 1.5).min(2.0),
        consistency: m.scoring_consistency / 100.0,
        venue_balance: (m.home_win_percentage / 100.0 + m.away_win_percentage / 100.0) / 2.0,
    };
    let defense_components = DefenseComponents {
        defensive_solidity: (1.5 / m.goals_conceded_per_game.max(0.5)).min(2.0),
        clean_sheet_ratio: m.clean_sheet_percentage / 100.0,
        stability: m.defensive_stability / 100.0,
    };

    let recent = &perf.recent_form;
    let recent_points = if recent.results.is_empty() {
        None
    } else {
        Some(recent.points as f64 / (recent.results.len() * 3) as f64)
    };
    let form_components = FormComponents {
        recent_points,
        recent_defense: recent.clean_sheets as f64 / window,
        recent_attack: 1.0 - recent.failed_to_score as f64 / window,
    };

    let attack_score = attack_components.scoring_rate * 0.5
        + attack_components.consistency * 0.3
        + attack_components.venue_balance * 0.2;
    let defense_score = defense_components.defensive_solidity * 0.5
        + defense_components.clean_sheet_ratio * 0.3
        + defense_components.stability * 0.2;
    let form_score = recent_points.unwrap_or(0.5) * 0.4
        + form_components.recent_defense * 0.3
        + form_components.recent_attack * 0.3;

    let attack = 0.5 + attack_score * 0.6 + form_score * 0.4;
    let defense = 0.5 + defense_score * 0.6 + form_score * 0.4;

    let recent_variance = std_dev(&[
        recent_points.unwrap_or(0.5),
        form_components.recent_attack,
        form_components.recent_defense,
    ]);
    let season_variance = std_dev(&[
        attack_components.scoring_rate - 1.0,
        attack_components.consistency,
        defense_components.defensive_solidity - 1.0,
        defense_components.stability,
    ]);

    StrengthIndex {
        overall: (attack + defense) / 2.0,
        attack,
        defense,
        attack_components,
        defense_components,
        form_components,
        attack_score,
        defense_score,
        form_score,
        variability: (recent_variance + season_variance) / 2.0,
        confidence: Confidence::from_sample(perf.current_league.games_played as usize, 10, 5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchHistory;
    use crate::probability::team_stats::calculate_team_stats;
    use crate::probability::team_stats::tests::history;

    fn index_for(results: &[(bool, u32, u32)]) -> StrengthIndex {
        let h = MatchHistory {
            team_id: 1,
            league_id: 39,
            current_league: history(results),
            ..Default::default()
        };
        calculate_strength_index(&calculate_team_stats(1, &h))
    }

    #[test]
    fn test_strong_team_beats_weak_team() {
        let strong = index_for(&[(true, 3, 0), (false, 2, 0), (true, 2, 1), (false, 3, 1)]);
        let weak = index_for(&[(true, 0, 2), (false, 0, 3), (true, 1, 2), (false, 0, 1)]);
        assert!(strong.attack > weak.attack);
        assert!(strong.defense > weak.defense);
        assert!(strong.overall > weak.overall);
    }

    #[test]
    fn test_components_capped() {
        let idx = index_for(&[(true, 9, 0); 3]);
        assert_eq!(idx.attack_components.scoring_rate, 2.0);
        // conceded floor of 0.5 caps solidity at 2
        assert_eq!(idx.defense_components.defensive_solidity, 2.0);
    }

    #[test]
    fn test_confidence_by_games_played() {
        assert_eq!(index_for(&[(true, 1, 1); 4]).confidence, Confidence::Low);
        assert_eq!(index_for(&[(true, 1, 1); 5]).confidence, Confidence::Medium);
        assert_eq!(index_for(&[(true, 1, 1); 10]).confidence, Confidence::High);
    }

    #[test]
    fn test_league_average_team() {
        let idx = index_for(&[]);
        assert_eq!(idx.form_components.recent_points, None);
        assert!((idx.attack_components.scoring_rate - 1.0).abs() < 1e-9);
        assert!((idx.defense_components.defensive_solidity - 1.0).abs() < 1e-9);
        assert!(idx.variability > 0.0);
    }
}
