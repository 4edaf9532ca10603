use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "betbuddy")]
#[command(about = "Football fixtures, standings and match predictions", long_about = None)]
pub struct Cli {
    /// Prediction model: poisson, simple or standings
    #[arg(short, long, global = true, default_value = "poisson")]
    pub model: String,

    /// Season start year (defaults to FOOTBALL_SEASON, then the running season)
    #[arg(long, global = true)]
    pub season: Option<i32>,

    /// Skip the response cache file for this run
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported leagues
    Leagues {
        /// Only the default sweep
        #[arg(long)]
        default: bool,
    },
    /// League table with European and relegation zones
    Standings {
        /// League code, name or API id (e.g. epl, "La Liga", 140)
        league: String,
    },
    /// Fixtures in the next seven days
    Fixtures {
        /// League(s); defaults to the default sweep
        #[arg(short, long)]
        league: Vec<String>,
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Predict a single match by team ids
    Predict {
        home_id: u32,
        away_id: u32,
        #[arg(short, long)]
        league: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Fixtures -> predictions -> analysis table, optionally exported
    Analyze {
        #[arg(short, long)]
        league: Vec<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only the first N fixtures by kickoff
        #[arg(long)]
        limit: Option<usize>,
        /// Write the analysis to an .xlsx workbook
        #[arg(long)]
        export: bool,
        /// Write the analysis to a CSV file as well
        #[arg(long)]
        csv: bool,
        /// Output path (defaults to EXPORT_DIR/football_predictions_YYYY-MM-DD.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Head-to-head record between two teams
    H2h {
        team1: u32,
        team2: u32,
        /// Number of past meetings
        #[arg(long, default_value_t = 5)]
        last: u32,
    },
    /// Season statistics and recent form for a team
    Team {
        team_id: u32,
        #[arg(short, long)]
        league: String,
    },
    /// Response cache management
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove cached entries
    Clear {
        /// Only this namespace (fixtures, standings, team_stats, team_matches, h2h_stats, predictions)
        namespace: Option<String>,
    },
    /// Show cached namespaces and entry count
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "betbuddy", "--model", "simple", "analyze", "-l", "epl", "-l", "laliga", "--export",
        ])
        .unwrap();
        assert_eq!(cli.model, "simple");
        match cli.command {
            Commands::Analyze {
                league,
                export,
                csv,
                ..
            } => {
                assert_eq!(league, vec!["epl", "laliga"]);
                assert!(export);
                assert!(!csv);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_predict_and_cache() {
        let cli = Cli::try_parse_from([
            "betbuddy", "predict", "33", "40", "--league", "39", "--format", "json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Predict {
                home_id: 33,
                away_id: 40,
                format: OutputFormat::Json,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["betbuddy", "cache", "clear", "fixtures"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheCommands::Clear { namespace: Some(_) }
            }
        ));
    }

    #[test]
    fn test_fixture_date_parsed() {
        let cli = Cli::try_parse_from(["betbuddy", "fixtures", "--date", "2024-09-14"]).unwrap();
        match cli.command {
            Commands::Fixtures { date, league } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 9, 14));
                assert!(league.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
