use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

/// Server settings. Every flag falls back to an environment variable, and
/// `.env` is loaded before parsing.
#[derive(Debug, Clone, Parser)]
#[command(name = "conference-go", version, about = "Conference management API")]
pub struct Config {
    /// Address to serve on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// Postgres connection string; without it records live in memory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub database_max_connections: u32,

    /// Pexels key for location images
    #[arg(long, env = "PEXELS_API_KEY", hide_env_values = true)]
    pub pexels_api_key: Option<String>,

    /// OpenWeather key for conference weather
    #[arg(long, env = "OPEN_WEATHER_API_KEY", hide_env_values = true)]
    pub open_weather_api_key: Option<String>,

    /// Timeout for each outbound lookup, in seconds
    #[arg(long, env = "ENRICHMENT_TIMEOUT_SECS", default_value_t = 5)]
    pub enrichment_timeout_secs: u64,

    #[arg(long, env = "LOG_LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Config {
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }
}
