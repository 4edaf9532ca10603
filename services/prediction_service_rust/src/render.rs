//! Terminal output for the CLI.

use betbuddy_core::analysis::{AnalysisRow, FixtureRow, StandingRow};
use betbuddy_core::league_config::LeagueConfig;
use betbuddy_core::models::{MatchPrediction, TeamSeasonStats};
use betbuddy_core::probability::{FormAnalysis, HeadToHead};

const RULE: &str = "────────────────────────────────────────────────────────────────────────";

fn pct(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

/// Cuts `s` to `width` characters for fixed-width columns.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

pub fn leagues(configs: &[&LeagueConfig]) {
    println!("{:<14} {:>5}  {:<28} {}", "Code", "Id", "League", "Country");
    println!("{}", RULE);
    for c in configs {
        println!(
            "{:<14} {:>5}  {:<28} {}{}",
            c.code,
            c.api_id,
            c.name,
            c.country,
            if c.default { "  *" } else { "" }
        );
    }
    println!("\n* part of the default sweep");
}

/// "2024/25" style label for a season starting in `season`.
fn season_label(season: i32) -> String {
    format!("{}/{:02}", season, (season + 1) % 100)
}

pub fn standings(league: &str, season: i32, rows: &[StandingRow]) {
    println!("{} {}", league, season_label(season));
    println!("{}", RULE);
    println!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}  {:<6} {}",
        "Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Form", "Zone"
    );
    for r in rows {
        println!(
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}  {:<6} {}",
            r.position,
            fit(&r.team, 24),
            r.played,
            r.won,
            r.drawn,
            r.lost,
            r.goals_for,
            r.goals_against,
            r.goal_difference,
            r.points,
            r.form,
            r.zone.label()
        );
    }
}

pub fn fixtures(rows: &[FixtureRow]) {
    if rows.is_empty() {
        println!("No fixtures found in the next seven days.");
        return;
    }
    println!(
        "{:<20} {:<18} {:>5}  {:<22} {:<22} {:>5}",
        "Date", "League", "Pos", "Home", "Away", "Pos"
    );
    println!("{}", RULE);
    for r in rows {
        println!(
            "{:<20} {:<18} {:>5}  {:<22} {:<22} {:>5}",
            r.date,
            fit(&r.league, 18),
            r.home_position,
            fit(&r.home_team, 22),
            fit(&r.away_team, 22),
            r.away_position
        );
    }
    println!("\n{} fixtures", rows.len());
}

pub fn prediction(title: &str, p: &MatchPrediction) {
    let (outcome, highest) = p.probabilities.predicted();
    println!("{}", title);
    println!("{}", RULE);
    println!(
        "  Home {}   Draw {}   Away {}",
        pct(p.probabilities.home_win),
        pct(p.probabilities.draw),
        pct(p.probabilities.away_win)
    );
    println!("  Prediction:      {} ({}%)", outcome, highest);
    println!(
        "  Expected goals:  {:.2} - {:.2}",
        p.expected_goals.home, p.expected_goals.away
    );
    println!(
        "  Expected cards:  {:.1} (over 3.5: {})",
        p.cards.total,
        pct(p.cards.over_3_5)
    );
    println!("  Alternative bet: {}", p.alternative_bet());
    println!(
        "  Model:           {} ({} confidence)",
        p.metadata.model, p.metadata.confidence
    );

    if let Some(markets) = &p.markets {
        let scores: Vec<String> = markets
            .exact_scores
            .iter()
            .take(3)
            .map(|s| format!("{} ({})", s, pct(s.probability)))
            .collect();
        println!("  Likely scores:   {}", scores.join(", "));
        println!(
            "  Over 2.5:        {}   BTTS: {}",
            pct(markets.total_goals.over_2_5),
            pct(markets.both_teams_to_score)
        );
    }
    for bet in &p.value_bets {
        println!("  Value: {} [{}] {}", bet.market, bet.confidence, bet.reason);
    }
    if let Some(v) = p.volatility {
        println!("  Volatility:      {:.2}", v);
    }
    for note in &p.metadata.notes {
        println!("  Note: {}", note);
    }
}

pub fn analysis(rows: &[AnalysisRow]) {
    println!(
        "{:<20} {:<22} {:<22} {:>5} {:>5} {:>5}  {:<9} {}",
        "Date", "Home", "Away", "H", "D", "A", "Pick", "Alternative"
    );
    println!("{}", RULE);
    for r in rows {
        println!(
            "{:<20} {:<22} {:<22} {:>4}% {:>4}% {:>4}%  {:<9} {}",
            r.date,
            fit(&format!("{} ({})", r.home_team, r.home_position), 22),
            fit(&format!("{} ({})", r.away_team, r.away_position), 22),
            r.home_win,
            r.draw,
            r.away_win,
            r.prediction.label(),
            r.alternative_bet
        );
    }
}

pub fn head_to_head(team1: u32, team2: u32, h2h: &HeadToHead) {
    println!("Head to head: {} vs {}", team1, team2);
    println!("{}", RULE);
    if h2h.total_matches == 0 {
        println!("  No meetings on record.");
        return;
    }
    println!(
        "  {} meetings: {} wins / {} draws / {} wins",
        h2h.total_matches, h2h.team1_wins, h2h.draws, h2h.team2_wins
    );
    println!(
        "  Average goals:   {:.2} - {:.2}",
        h2h.avg_team1_goals, h2h.avg_team2_goals
    );
    println!(
        "  Dominance:       {:.2} weighted, {:.2} recent",
        h2h.weighted_dominance, h2h.recent_dominance
    );
    println!("  Factor:          {:.3} ({} confidence)", h2h.h2h_factor, h2h.confidence);
    for m in &h2h.recent_meetings {
        println!(
            "  {}  {:>2}-{:<2}",
            m.date.format("%d/%m/%Y"),
            m.team1_goals,
            m.team2_goals
        );
    }
}

pub fn team(stats: &TeamSeasonStats, form: &FormAnalysis) {
    println!("Team {} - league {} season {}", stats.team_id, stats.league_id, stats.season);
    println!("{}", RULE);
    if stats.available {
        println!(
            "  Played {} (home {}, away {})  W{} D{} L{}",
            stats.played.total,
            stats.played.home,
            stats.played.away,
            stats.wins.total,
            stats.draws.total,
            stats.losses.total
        );
        println!(
            "  Goals {} - {}  (avg {:.2} - {:.2})",
            stats.goals_for.total,
            stats.goals_against.total,
            stats.goals_for_average,
            stats.goals_against_average
        );
        println!(
            "  Clean sheets {}  Failed to score {}",
            stats.clean_sheets.total, stats.failed_to_score.total
        );
        if let Some(m) = stats.metrics {
            println!(
                "  {:.2} pts/game, scores in {:.0}% of games",
                m.points_per_game, m.scoring_rate
            );
        }
        println!("  Season form: {}", stats.form);
    } else {
        println!("  Season statistics unavailable.");
    }

    println!();
    println!(
        "  Recent form ({} matches): W{} D{} L{}",
        form.matches_analyzed, form.results.wins, form.results.draws, form.results.losses
    );
    println!(
        "  Rating {:.0}/100, factor {:.3}, trend {}",
        form.form_rating,
        form.form_factor,
        form.trend.label()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("Arsenal", 10), "Arsenal");
        assert_eq!(fit("Wolverhampton Wanderers", 8), "Wolverh…");
    }

    #[test]
    fn test_season_label() {
        assert_eq!(season_label(2024), "2024/25");
        assert_eq!(season_label(2008), "2008/09");
        assert_eq!(season_label(1999), "1999/00");
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(0.456), "46%");
        assert_eq!(pct(0.0), "0%");
    }
}
