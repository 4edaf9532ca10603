//! Head-to-head record between the two sides of a fixture.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{CompletedMatch, Confidence, TeamOutcome};

const RECENT_MEETINGS: usize = 5;
const CONSISTENCY_MEETINGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

/// One past meeting seen from team 1's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub date: DateTime<FixedOffset>,
    pub team1_goals: u32,
    pub team2_goals: u32,
    pub venue: Venue,
    pub goal_difference: i32,
    /// 1 for a team 1 win, 0.5 for a draw, 0 for a loss
    pub dominance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    /// Multiplier applied to team 1's expected goals
    pub h2h_factor: f64,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub draws: u32,
    pub total_matches: usize,
    pub avg_team1_goals: f64,
    pub avg_team2_goals: f64,
    pub weighted_dominance: f64,
    pub recent_dominance: f64,
    pub overall_dominance: f64,
    pub result_consistency: f64,
    pub venue_advantage: f64,
    /// Most recent meetings, newest first
    pub recent_meetings: Vec<Meeting>,
    pub confidence: Confidence,
}

impl HeadToHead {
    /// No meetings on record, or the lookup failed.
    pub fn neutral() -> Self {
        Self {
            h2h_factor: 1.0,
            team1_wins: 0,
            team2_wins: 0,
            draws: 0,
            total_matches: 0,
            avg_team1_goals: 0.0,
            avg_team2_goals: 0.0,
            weighted_dominance: 0.5,
            recent_dominance: 0.5,
            overall_dominance: 0.5,
            result_consistency: 0.5,
            venue_advantage: 1.0,
            recent_meetings: Vec::new(),
            confidence: Confidence::Low,
        }
    }
}

/// Summarises past meetings (any order) between `team1` (the side at home in
/// the fixture being predicted) and `team2`.
pub fn analyze_head_to_head(meetings: &[CompletedMatch], team1: u32, team2: u32) -> HeadToHead {
    let mut sorted: Vec<&CompletedMatch> = meetings
        .iter()
        .filter(|m| {
            (m.home_team == team1 && m.away_team == team2)
                || (m.home_team == team2 && m.away_team == team1)
        })
        .collect();
    if sorted.is_empty() {
        return HeadToHead::neutral();
    }
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let total = sorted.len();

    let (mut team1_wins, mut team2_wins, mut draws) = (0u32, 0u32, 0u32);
    let (mut team1_goals, mut team2_goals) = (0u32, 0u32);
    for m in &sorted {
        let (g1, g2) = m.goals_for_team(team1);
        team1_goals += g1;
        team2_goals += g2;
        match m.outcome_for(team1) {
            TeamOutcome::Win => team1_wins += 1,
            TeamOutcome::Loss => team2_wins += 1,
            TeamOutcome::Draw => draws += 1,
        }
    }

    let team1_won = |m: &CompletedMatch| m.outcome_for(team1) == TeamOutcome::Win;

    let recent = &sorted[..total.min(RECENT_MEETINGS)];
    let recent_dominance =
        recent.iter().filter(|m| team1_won(m)).count() as f64 / recent.len() as f64;
    let overall_dominance = team1_wins as f64 / total as f64;
    let weighted_dominance = recent_dominance * 0.6 + overall_dominance * 0.4;

    let at_home: Vec<&&CompletedMatch> = sorted.iter().filter(|m| m.home_team == team1).collect();
    let venue_advantage = if at_home.is_empty() {
        1.0
    } else {
        let wins = at_home.iter().filter(|m| m.home_goals > m.away_goals).count();
        wins as f64 / at_home.len() as f64 * 2.0
    };

    let result_consistency = if total >= CONSISTENCY_MEETINGS {
        let results: Vec<bool> = sorted[..CONSISTENCY_MEETINGS]
            .iter()
            .map(|m| team1_won(m))
            .collect();
        let same = results.windows(2).filter(|w| w[0] == w[1]).count();
        same as f64 / (results.len() - 1) as f64
    } else {
        0.5
    };

    let h2h_factor =
        (weighted_dominance * 0.4 + venue_advantage * 0.4 + result_consistency * 0.2) * 1.5;

    let recent_meetings = recent
        .iter()
        .map(|m| {
            let (g1, g2) = m.goals_for_team(team1);
            Meeting {
                date: m.date,
                team1_goals: g1,
                team2_goals: g2,
                venue: if m.home_team == team1 {
                    Venue::Home
                } else {
                    Venue::Away
                },
                goal_difference: g1 as i32 - g2 as i32,
                dominance: match m.outcome_for(team1) {
                    TeamOutcome::Win => 1.0,
                    TeamOutcome::Draw => 0.5,
                    TeamOutcome::Loss => 0.0,
                },
            }
        })
        .collect();

    HeadToHead {
        h2h_factor,
        team1_wins,
        team2_wins,
        draws,
        total_matches: total,
        avg_team1_goals: team1_goals as f64 / total as f64,
        avg_team2_goals: team2_goals as f64 / total as f64,
        weighted_dominance,
        recent_dominance,
        overall_dominance,
        result_consistency,
        venue_advantage,
        recent_meetings,
        confidence: Confidence::from_sample(total, 5, 3),
    }
}
