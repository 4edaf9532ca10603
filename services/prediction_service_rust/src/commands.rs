use anyhow::{anyhow, Context, Result};
use betbuddy_core::analysis::{analysis_rows, fixture_row, standings_rows};
use betbuddy_core::cache::ResponseCache;
use betbuddy_core::clients::{
    current_season, ApiFootballClient, ApiFootballConfig, CachedDataSource, FootballDataSource,
};
use betbuddy_core::export;
use betbuddy_core::league_config::{
    default_leagues, get_all_league_codes, get_all_league_configs, resolve_league, LeagueConfig,
};
use betbuddy_core::predictor::{Predictor, PredictorConfig};
use betbuddy_core::probability::{
    analyze_head_to_head, calculate_form_factor, HeadToHead, PredictionModelRegistry,
};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{CacheCommands, Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::render;

/// Shared state for one CLI invocation.
pub struct App {
    config: Config,
    model: String,
    cache: Arc<ResponseCache>,
    cache_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config, model: String, no_cache: bool) -> Self {
        let cache_path = if no_cache {
            None
        } else {
            config.cache_file.clone()
        };
        let cache = match &cache_path {
            Some(path) => ResponseCache::load(path).unwrap_or_else(|e| {
                warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                ResponseCache::new()
            }),
            None => ResponseCache::new(),
        };
        Self {
            config,
            model,
            cache: Arc::new(cache),
            cache_path,
        }
    }

    fn season(&self) -> i32 {
        self.config
            .season
            .unwrap_or_else(|| current_season(Local::now().date_naive()))
    }

    fn source(&self) -> Result<Arc<dyn FootballDataSource>> {
        let api_key = self.config.require_api_key()?;
        let client = ApiFootballClient::new(ApiFootballConfig {
            provider: self.config.provider,
            timeout: self.config.http_timeout,
            ..ApiFootballConfig::new(api_key)
        })
        .context("Failed to create API-Football client")?;
        Ok(Arc::new(CachedDataSource::new(client, self.cache.clone())))
    }

    fn predictor(&self) -> Result<Predictor> {
        let registry = PredictionModelRegistry::new();
        let names = registry.names().join(", ");
        let model = registry
            .into_model(&self.model)
            .ok_or_else(|| anyhow!("unknown model '{}' (available: {})", self.model, names))?;
        Ok(Predictor::new(
            self.source()?,
            self.cache.clone(),
            model,
            PredictorConfig {
                max_workers: self.config.max_workers,
                rate_limit: self.config.rate_limit,
                cache_predictions: self.config.cache_predictions,
                season: Some(self.season()),
                ..Default::default()
            },
        ))
    }

    /// Persists the response cache when a cache file is configured.
    pub fn finish(&self) -> Result<()> {
        if let Some(path) = &self.cache_path {
            self.cache
                .save(path)
                .with_context(|| format!("Failed to save cache to {}", path.display()))?;
            info!("Saved {} cache entries to {}", self.cache.len(), path.display());
        }
        Ok(())
    }
}

fn league(input: &str) -> Result<&'static LeagueConfig> {
    resolve_league(input).ok_or_else(|| {
        anyhow!(
            "unknown league '{}' (codes: {})",
            input,
            get_all_league_codes().join(", ")
        )
    })
}

fn leagues_or_default(inputs: &[String]) -> Result<Vec<&'static LeagueConfig>> {
    if inputs.is_empty() {
        return Ok(default_leagues());
    }
    inputs.iter().map(|l| league(l)).collect()
}

pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if cli.season.is_some() {
        config.season = cli.season;
    }
    let app = App::new(config, cli.model, cli.no_cache);

    let result = match cli.command {
        Commands::Leagues { default } => {
            let configs: Vec<&LeagueConfig> = if default {
                default_leagues()
            } else {
                get_all_league_configs().iter().collect()
            };
            render::leagues(&configs);
            Ok(())
        }
        Commands::Standings { league: l } => standings(&app, league(&l)?).await,
        Commands::Fixtures { league: l, date } => fixtures(&app, &leagues_or_default(&l)?, date).await,
        Commands::Predict {
            home_id,
            away_id,
            league: l,
            format,
        } => predict(&app, home_id, away_id, league(&l)?, format).await,
        Commands::Analyze {
            league: l,
            date,
            limit,
            export,
            csv,
            output,
        } => {
            let options = AnalyzeOptions {
                date,
                limit,
                export,
                csv,
                output,
            };
            analyze(&app, &leagues_or_default(&l)?, options).await
        }
        Commands::H2h { team1, team2, last } => head_to_head(&app, team1, team2, last).await,
        Commands::Team { team_id, league: l } => team(&app, team_id, league(&l)?).await,
        Commands::Cache { action } => cache(&app, action),
    };

    // keep whatever was fetched even when the command failed
    app.finish()?;
    result
}

async fn standings(app: &App, league: &LeagueConfig) -> Result<()> {
    let season = app.season();
    let table = app
        .source()?
        .standings(league.api_id, season)
        .await
        .with_context(|| format!("Failed to fetch {} standings", league.name))?;
    render::standings(league.name, season, &standings_rows(&table));
    Ok(())
}

async fn fixtures(app: &App, leagues: &[&LeagueConfig], date: Option<NaiveDate>) -> Result<()> {
    let predictor = app.predictor()?;
    let ids: Vec<u32> = leagues.iter().map(|l| l.api_id).collect();
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    let fixtures = predictor.upcoming_fixtures(&ids, today).await;
    let tables = predictor.standings(&ids).await;
    let rows: Vec<_> = fixtures
        .iter()
        .map(|f| fixture_row(f, tables.get(&f.league_id)))
        .collect();
    render::fixtures(&rows);
    Ok(())
}

async fn predict(
    app: &App,
    home_id: u32,
    away_id: u32,
    league: &LeagueConfig,
    format: OutputFormat,
) -> Result<()> {
    let predictor = app.predictor()?;
    let prediction = predictor
        .cached_prediction(home_id, away_id, league.api_id)
        .await;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prediction)?),
        OutputFormat::Table => render::prediction(
            &format!("{} vs {} ({})", home_id, away_id, league.name),
            &prediction,
        ),
    }
    Ok(())
}

struct AnalyzeOptions {
    date: Option<NaiveDate>,
    limit: Option<usize>,
    export: bool,
    csv: bool,
    output: Option<PathBuf>,
}

async fn analyze(app: &App, leagues: &[&LeagueConfig], options: AnalyzeOptions) -> Result<()> {
    let predictor = app.predictor()?;
    let ids: Vec<u32> = leagues.iter().map(|l| l.api_id).collect();
    let today = options.date.unwrap_or_else(|| Local::now().date_naive());

    let mut fixtures = predictor.upcoming_fixtures(&ids, today).await;
    if let Some(limit) = options.limit {
        fixtures.truncate(limit);
    }
    if fixtures.is_empty() {
        println!("No fixtures found in the next seven days.");
        return Ok(());
    }

    let tables = predictor.standings(&ids).await;
    let rows: Vec<_> = fixtures
        .iter()
        .map(|f| fixture_row(f, tables.get(&f.league_id)))
        .collect();

    let predictions = predictor.predict_batch(&fixtures).await;
    let fallbacks = predictions.iter().filter(|p| p.is_fallback()).count();
    if fallbacks > 0 {
        warn!("{} of {} predictions fell back to defaults", fallbacks, predictions.len());
    }

    let analysis = analysis_rows(&rows, &predictions);
    render::analysis(&analysis);

    if options.export || options.csv || options.output.is_some() {
        let path = options
            .output
            .clone()
            .unwrap_or_else(|| export::default_path(&app.config.export_dir, today));
        if options.export || options.output.is_some() {
            export::write_xlsx(&analysis, &path)?;
            println!("\nSaved {}", path.display());
        }
        if options.csv {
            let csv_path = path.with_extension("csv");
            export::write_csv_file(&analysis, &csv_path)?;
            println!("Saved {}", csv_path.display());
        }
    }
    Ok(())
}

async fn head_to_head(app: &App, team1: u32, team2: u32, last: u32) -> Result<()> {
    let meetings = app
        .source()?
        .head_to_head(team1, team2, last)
        .await
        .context("Failed to fetch head-to-head")?;
    let h2h = if meetings.is_empty() {
        HeadToHead::neutral()
    } else {
        analyze_head_to_head(&meetings, team1, team2)
    };
    render::head_to_head(team1, team2, &h2h);
    Ok(())
}

async fn team(app: &App, team_id: u32, league: &LeagueConfig) -> Result<()> {
    let source = app.source()?;
    let season = app.season();
    let (stats, matches) = tokio::join!(
        source.team_statistics(team_id, league.api_id, season),
        source.team_matches(team_id, season, Some(league.api_id)),
    );
    let stats = stats.context("Failed to fetch team statistics")?;
    let matches = matches.unwrap_or_else(|e| {
        warn!("Recent matches unavailable for team {}: {}", team_id, e);
        Vec::new()
    });
    render::team(&stats, &calculate_form_factor(&matches, team_id));
    Ok(())
}

fn cache(app: &App, action: CacheCommands) -> Result<()> {
    match action {
        CacheCommands::Clear { namespace: Some(ns) } => {
            let removed = app.cache.clear(&ns);
            println!("Removed {} '{}' entries", removed, ns);
        }
        CacheCommands::Clear { namespace: None } => {
            let removed = app.cache.len();
            app.cache.clear_all();
            println!("Removed {} entries", removed);
        }
        CacheCommands::Info => {
            match &app.cache_path {
                Some(path) => println!("Cache file: {}", path.display()),
                None => println!("Cache file: none (set BETBUDDY_CACHE_FILE to persist)"),
            }
            println!("Entries:    {}", app.cache.len());
            println!("Namespaces: {}", app.cache.namespaces().join(", "));
        }
    }
    Ok(())
}
