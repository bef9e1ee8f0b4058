use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// `role:key` pairs, comma separated
    pub api_keys: String,
    pub pause_sweep_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: optional_number("DATABASE_MAX_CONNECTIONS", 1)?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            pause_sweep_interval: Duration::from_secs(optional_number(
                "PAUSE_SWEEP_INTERVAL_SECS",
                60,
            )?),
        })
    }
}

fn optional_number<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number")),
        _ => Ok(default),
    }
}
