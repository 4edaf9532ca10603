//! League configuration for supported football competitions.
//!
//! This module provides:
//! - Static configuration for every supported league
//! - API-Football league id mappings
//! - Name / alias / id lookups

/// Configuration for a single league.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    /// Display name (e.g., "Premier League")
    pub name: &'static str,
    /// Short code accepted on the command line (e.g., "epl")
    pub code: &'static str,
    /// API-Football league id
    pub api_id: u32,
    pub country: &'static str,
    /// Part of the default fixtures / standings sweep
    pub default: bool,
    /// Extra names accepted by lookups
    pub aliases: &'static [&'static str],
}

/// Static configuration for all supported leagues.
pub static LEAGUE_CONFIGS: &[LeagueConfig] = &[
    // Default sweep
    LeagueConfig {
        name: "Premier League",
        code: "epl",
        api_id: 39,
        country: "England",
        default: true,
        aliases: &["premier league", "premierleague", "pl"],
    },
    LeagueConfig {
        name: "La Liga",
        code: "laliga",
        api_id: 140,
        country: "Spain",
        default: true,
        aliases: &["la liga", "primera division"],
    },
    LeagueConfig {
        name: "Serie A",
        code: "seriea",
        api_id: 135,
        country: "Italy",
        default: true,
        aliases: &["serie a"],
    },
    LeagueConfig {
        name: "Bundesliga",
        code: "bundesliga",
        api_id: 78,
        country: "Germany",
        default: true,
        aliases: &[],
    },
    LeagueConfig {
        name: "Ligue 1",
        code: "ligue1",
        api_id: 61,
        country: "France",
        default: true,
        aliases: &["ligue 1"],
    },
    LeagueConfig {
        name: "Primeira Liga",
        code: "primeira",
        api_id: 94,
        country: "Portugal",
        default: true,
        aliases: &["primeira liga", "liga portugal"],
    },
    // England - lower divisions
    LeagueConfig {
        name: "Championship",
        code: "championship",
        api_id: 40,
        country: "England",
        default: false,
        aliases: &["efl championship"],
    },
    LeagueConfig {
        name: "League One",
        code: "league1",
        api_id: 41,
        country: "England",
        default: false,
        aliases: &["league one"],
    },
    LeagueConfig {
        name: "League Two",
        code: "league2",
        api_id: 42,
        country: "England",
        default: false,
        aliases: &["league two"],
    },
    // Rest of Europe
    LeagueConfig {
        name: "Eredivisie",
        code: "eredivisie",
        api_id: 88,
        country: "Netherlands",
        default: false,
        aliases: &[],
    },
    LeagueConfig {
        name: "Süper Lig",
        code: "superlig",
        api_id: 203,
        country: "Turkey",
        default: false,
        aliases: &["super lig", "süper lig"],
    },
    LeagueConfig {
        name: "Scottish Premiership",
        code: "spl",
        api_id: 179,
        country: "Scotland",
        default: false,
        aliases: &["scottish premiership", "premiership"],
    },
    LeagueConfig {
        name: "Super League Greece",
        code: "greece",
        api_id: 197,
        country: "Greece",
        default: false,
        aliases: &["super league greece", "super league 1"],
    },
    LeagueConfig {
        name: "Super League Switzerland",
        code: "switzerland",
        api_id: 207,
        country: "Switzerland",
        default: false,
        aliases: &["super league switzerland", "swiss super league"],
    },
];

/// Look up a league by display name, code or alias (case-insensitive).
pub fn get_league_config(league: &str) -> Option<&'static LeagueConfig> {
    let wanted = league.trim();
    LEAGUE_CONFIGS.iter().find(|c| {
        c.name.eq_ignore_ascii_case(wanted)
            || c.code.eq_ignore_ascii_case(wanted)
            || c.aliases.iter().any(|a| a.to_lowercase() == wanted.to_lowercase())
    })
}

/// Look up a league by API-Football id.
pub fn get_league_by_id(api_id: u32) -> Option<&'static LeagueConfig> {
    LEAGUE_CONFIGS.iter().find(|c| c.api_id == api_id)
}

/// Accepts a name, code, alias or a numeric id.
pub fn resolve_league(input: &str) -> Option<&'static LeagueConfig> {
    match input.trim().parse::<u32>() {
        Ok(id) => get_league_by_id(id),
        Err(_) => get_league_config(input),
    }
}

pub fn get_all_league_configs() -> &'static [LeagueConfig] {
    LEAGUE_CONFIGS
}

/// Leagues swept when the user does not pick one.
pub fn default_leagues() -> Vec<&'static LeagueConfig> {
    LEAGUE_CONFIGS.iter().filter(|c| c.default).collect()
}

pub fn get_all_league_codes() -> Vec<&'static str> {
    LEAGUE_CONFIGS.iter().map(|c| c.code).collect()
}

// ============================================================================
// Tests
// ============================================================================
