use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub run_mode: RunMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string, or `memory:` for the in-process store
    pub url: String,
    pub max_connections: u32,
}

/// Unrecognised modes (`staging`, `qa`, ...) run as development.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum RunMode {
    #[default]
    Development,
    Test,
    Production,
}

impl From<String> for RunMode {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "production" => RunMode::Production,
            "test" => RunMode::Test,
            _ => RunMode::Development,
        }
    }
}

impl RunMode {
    pub fn is_production(&self) -> bool {
        matches!(self, RunMode::Production)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::builder(&run_mode)?
            // Eg.. `EMI__SERVER__PORT=8080` would set `server.port`
            .add_source(config::Environment::with_prefix("EMI").separator("__"))
            // Plain deployment variables win over everything else
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("run_mode", env::var("RUN_MODE").ok())?
            .build()?
            .try_deserialize()
    }

    fn builder(run_mode: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("server.port", 5000)?
            .set_default("database.max_connections", 5)?
            .set_default("run_mode", run_mode)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false)))
    }
}
