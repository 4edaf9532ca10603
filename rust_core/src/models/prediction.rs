//! Prediction output types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Confidence, DataQuality};
use crate::probability::{CardAnalysis, FormAnalysis, HeadToHead, StrengthIndex};

/// Match outcome from the home side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Home => "Home Win",
            Outcome::Draw => "Draw",
            Outcome::Away => "Away Win",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    pub fn new(home_win: f64, draw: f64, away_win: f64) -> Self {
        Self {
            home_win,
            draw,
            away_win,
        }
    }

    pub fn sum(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }

    /// Scales the three values to sum to 1. A zero total yields an even split.
    pub fn normalized(self) -> Self {
        let total = self.sum();
        if total <= 0.0 || !total.is_finite() {
            return Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        }
        Self::new(self.home_win / total, self.draw / total, self.away_win / total)
    }

    /// All finite, non-negative and summing to one.
    pub fn is_valid(&self) -> bool {
        [self.home_win, self.draw, self.away_win]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
            && (self.sum() - 1.0).abs() < 1e-6
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home_win,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away_win,
        }
    }

    /// Whole-number percentages (home, draw, away).
    pub fn rounded_percentages(&self) -> (u32, u32, u32) {
        let pct = |p: f64| (p * 100.0).round().max(0.0) as u32;
        (pct(self.home_win), pct(self.draw), pct(self.away_win))
    }

    /// Most likely outcome on rounded percentages; ties resolve Home, Draw, Away.
    pub fn predicted(&self) -> (Outcome, u32) {
        let (h, d, a) = self.rounded_percentages();
        let highest = h.max(d).max(a);
        let outcome = if h == highest {
            Outcome::Home
        } else if d == highest {
            Outcome::Draw
        } else {
            Outcome::Away
        };
        (outcome, highest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
    pub total: f64,
}

impl ExpectedGoals {
    pub fn new(home: f64, away: f64) -> Self {
        Self {
            home,
            away,
            total: home + away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardsPrediction {
    pub total: f64,
    pub home: f64,
    pub away: f64,
    pub over_2_5: f64,
    pub over_3_5: f64,
    pub over_4_5: f64,
}

impl Default for CardsPrediction {
    fn default() -> Self {
        Self {
            total: 3.5,
            home: 1.6,
            away: 1.9,
            over_2_5: 0.70,
            over_3_5: 0.45,
            over_4_5: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetadata {
    pub confidence: Confidence,
    pub model: String,
    pub home_games_analyzed: u32,
    pub away_games_analyzed: u32,
    /// Set when the fallback prediction replaced a model result.
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home_goals: u32,
    pub away_goals: u32,
    pub probability: f64,
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home_goals, self.away_goals)
    }
}

/// Total-goals lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalLines {
    pub under_1_5: f64,
    pub over_1_5: f64,
    pub under_2_5: f64,
    pub over_2_5: f64,
    pub under_3_5: f64,
    pub over_3_5: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeMarkets {
    /// Most likely scorelines, highest first.
    pub exact_scores: Vec<ScoreLine>,
    pub total_goals: GoalLines,
    pub both_teams_to_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetMarket {
    HomeWin,
    AwayWin,
    Draw,
    Over2_5,
    Under2_5,
    BothTeamsToScore,
}

impl BetMarket {
    pub fn label(&self) -> &'static str {
        match self {
            BetMarket::HomeWin => "Home Win",
            BetMarket::AwayWin => "Away Win",
            BetMarket::Draw => "Draw",
            BetMarket::Over2_5 => "Over 2.5 Goals",
            BetMarket::Under2_5 => "Under 2.5 Goals",
            BetMarket::BothTeamsToScore => "Both Teams to Score",
        }
    }
}

impl fmt::Display for BetMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub market: BetMarket,
    pub confidence: Confidence,
    pub reason: String,
}

/// Per-team inputs that fed a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamReport {
    /// Season form string from the statistics endpoint, "UNKNOWN" if absent.
    pub form: String,
    pub recent_form: FormAnalysis,
    pub strength: StrengthIndex,
    pub cards: CardAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAnalysis {
    pub home: TeamReport,
    pub away: TeamReport,
    pub head_to_head: HeadToHead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPrediction {
    pub probabilities: OutcomeProbabilities,
    pub expected_goals: ExpectedGoals,
    pub cards: CardsPrediction,
    pub metadata: PredictionMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_analysis: Option<TeamAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markets: Option<AlternativeMarkets>,
    #[serde(default)]
    pub value_bets: Vec<ValueBet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Heuristic side bet from table positions (standings model only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_bet: Option<String>,
}

impl MatchPrediction {
    /// Bare prediction with default cards and no optional sections.
    pub fn basic(
        probabilities: OutcomeProbabilities,
        expected_goals: ExpectedGoals,
        metadata: PredictionMetadata,
    ) -> Self {
        Self {
            probabilities,
            expected_goals,
            cards: CardsPrediction::default(),
            metadata,
            team_analysis: None,
            markets: None,
            value_bets: Vec::new(),
            volatility: None,
            suggested_bet: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.metadata.fallback
    }

    /// Side bet shown next to the 1X2 prediction.
    ///
    /// The first value bet wins; otherwise the heuristic suggestion, then
    /// BTTS when likely, then whichever side of 2.5 goals is more likely.
    pub fn alternative_bet(&self) -> String {
        if let Some(bet) = self.value_bets.first() {
            return bet.market.label().to_string();
        }
        if let Some(s) = &self.suggested_bet {
            return s.clone();
        }
        match &self.markets {
            Some(m) if m.both_teams_to_score > 0.5 => BetMarket::BothTeamsToScore.label().to_string(),
            Some(m) if m.total_goals.over_2_5 >= m.total_goals.under_2_5 => {
                BetMarket::Over2_5.label().to_string()
            }
            Some(_) => BetMarket::Under2_5.label().to_string(),
            None if self.expected_goals.total > 2.5 => BetMarket::Over2_5.label().to_string(),
            None => BetMarket::Under2_5.label().to_string(),
        }
    }
}
