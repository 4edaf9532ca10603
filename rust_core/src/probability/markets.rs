//! Side markets derived from expected goals: scorelines, totals, BTTS,
//! value bets and a volatility score.

use super::poisson::{self, ScoreMatrix};
use crate::models::{
    AlternativeMarkets, BetMarket, Confidence, ExpectedGoals, GoalLines, OutcomeProbabilities,
    ScoreLine, ValueBet,
};

/// Top `n` scorelines on a 0-4 goal grid.
pub fn exact_score_probabilities(home_xg: f64, away_xg: f64, n: usize) -> Vec<ScoreLine> {
    ScoreMatrix::new(home_xg, away_xg, 4).top_scores(n)
}

/// P(total <= floor(threshold)), i.e. under a half-goal line.
pub fn under_probability(expected: f64, threshold: f64) -> f64 {
    poisson::cdf(threshold.floor().max(0.0) as u32, expected)
}

pub fn over_probability(expected: f64, threshold: f64) -> f64 {
    1.0 - under_probability(expected, threshold)
}

pub fn btts_probability(home_xg: f64, away_xg: f64) -> f64 {
    (1.0 - poisson::pmf(0, home_xg)) * (1.0 - poisson::pmf(0, away_xg))
}

pub fn alternative_markets(xg: &ExpectedGoals) -> AlternativeMarkets {
    let total = xg.home + xg.away;
    AlternativeMarkets {
        exact_scores: exact_score_probabilities(xg.home, xg.away, 5),
        total_goals: GoalLines {
            under_1_5: under_probability(total, 1.5),
            over_1_5: over_probability(total, 1.5),
            under_2_5: under_probability(total, 2.5),
            over_2_5: over_probability(total, 2.5),
            under_3_5: under_probability(total, 3.5),
            over_3_5: over_probability(total, 3.5),
        },
        both_teams_to_score: btts_probability(xg.home, xg.away),
    }
}

/// Flags outcomes the model is notably confident about.
pub fn identify_value_bets(p: &OutcomeProbabilities, xg: &ExpectedGoals) -> Vec<ValueBet> {
    let mut bets = Vec::new();
    let bet = |market, confidence, reason: &str| ValueBet {
        market,
        confidence,
        reason: reason.to_string(),
    };

    if p.home_win > 0.6 {
        let c = if p.home_win > 0.7 {
            Confidence::High
        } else {
            Confidence::Medium
        };
        bets.push(bet(BetMarket::HomeWin, c, "Strong home team advantage and form"));
    }
    if p.away_win > 0.45 {
        let c = if p.away_win > 0.55 {
            Confidence::High
        } else {
            Confidence::Medium
        };
        bets.push(bet(
            BetMarket::AwayWin,
            c,
            "Superior away team strength despite venue disadvantage",
        ));
    }
    if (p.home_win - p.away_win).abs() < 0.1 && p.draw > 0.25 {
        bets.push(bet(
            BetMarket::Draw,
            Confidence::Medium,
            "Evenly matched teams with balanced strengths",
        ));
    }

    if xg.total > 3.0 {
        let c = if xg.total > 3.5 {
            Confidence::High
        } else {
            Confidence::Medium
        };
        bets.push(bet(BetMarket::Over2_5, c, "High expected goals"));
    } else if xg.total < 2.0 {
        let c = if xg.total < 1.5 {
            Confidence::High
        } else {
            Confidence::Medium
        };
        bets.push(bet(BetMarket::Under2_5, c, "Low expected goals"));
    }

    bets
}

/// Prediction volatility in [0.1, 1.0]: 40% strength variability, 60% lack
/// of recent form (form ratings are 0-100).
pub fn calculate_volatility(
    home_variability: f64,
    away_variability: f64,
    home_form_rating: f64,
    away_form_rating: f64,
) -> f64 {
    let home_consistency = home_form_rating / 100.0;
    let away_consistency = away_form_rating / 100.0;
    let v = ((home_variability + away_variability) * 0.4
        + (2.0 - home_consistency - away_consistency) * 0.6)
        / 2.0;
    v.clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_over_complement() {
        let under = under_probability(2.6, 2.5);
        let over = over_probability(2.6, 2.5);
        assert!((under + over - 1.0).abs() < 1e-12);
        // P(X <= 2)
        let expected = poisson::pmf(0, 2.6) + poisson::pmf(1, 2.6) + poisson::pmf(2, 2.6);
        assert!((under - expected).abs() < 1e-12);
    }

    #[test]
    fn test_btts() {
        let p = btts_probability(1.5, 1.2);
        let expected = (1.0 - (-1.5f64).exp()) * (1.0 - (-1.2f64).exp());
        assert!((p - expected).abs() < 1e-12);
        assert_eq!(btts_probability(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_markets_lines_ordered() {
        let m = alternative_markets(&ExpectedGoals::new(1.6, 1.1));
        assert_eq!(m.exact_scores.len(), 5);
        let g = m.total_goals;
        assert!(g.under_1_5 < g.under_2_5 && g.under_2_5 < g.under_3_5);
        assert!(g.over_1_5 > g.over_2_5 && g.over_2_5 > g.over_3_5);
    }

    #[test]
    fn test_value_bets_home_and_over() {
        let bets = identify_value_bets(
            &OutcomeProbabilities::new(0.72, 0.18, 0.10),
            &ExpectedGoals::new(2.6, 0.8),
        );
        let markets: Vec<BetMarket> = bets.iter().map(|b| b.market).collect();
        assert_eq!(markets, vec![BetMarket::HomeWin, BetMarket::Over2_5]);
        assert_eq!(bets[0].confidence, Confidence::High);
        assert_eq!(bets[1].confidence, Confidence::Medium);
    }

    #[test]
    fn test_value_bets_draw_and_under() {
        let bets = identify_value_bets(
            &OutcomeProbabilities::new(0.36, 0.30, 0.34),
            &ExpectedGoals::new(0.7, 0.7),
        );
        let markets: Vec<BetMarket> = bets.iter().map(|b| b.market).collect();
        assert_eq!(markets, vec![BetMarket::Draw, BetMarket::Under2_5]);
        assert_eq!(bets[1].confidence, Confidence::High);
    }

    #[test]
    fn test_value_bets_none_for_middling_match() {
        let bets = identify_value_bets(
            &OutcomeProbabilities::new(0.48, 0.27, 0.25),
            &ExpectedGoals::new(1.5, 1.0),
        );
        assert!(bets.is_empty());
    }

    #[test]
    fn test_volatility_bounds() {
        assert!((calculate_volatility(0.5, 0.5, 50.0, 50.0) - 0.5).abs() < 1e-12);
        assert_eq!(calculate_volatility(0.0, 0.0, 100.0, 100.0), 0.1);
        assert_eq!(calculate_volatility(2.0, 2.0, 0.0, 0.0), 1.0);
    }
}
