use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealplanner_shared::mealplan::DayOfWeek;
use serde::Deserialize;
use std::env;
use time::Weekday;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Day every weekly plan starts on.
    #[serde(default = "default_week_anchor")]
    pub week_anchor: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            week_anchor: default_week_anchor(),
        }
    }
}

impl PlannerConfig {
    pub fn anchor(&self) -> Result<Weekday, String> {
        self.week_anchor
            .trim()
            .parse::<DayOfWeek>()
            .map(Weekday::from)
            .map_err(|_| format!("Unknown week anchor `{}`", self.week_anchor))
    }
}

fn default_week_anchor() -> String {
    "SATURDAY".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALPLANNER__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:mealplanner.db")?
            .set_default("database.max_connections", 5)?
            .set_default("planner.week_anchor", default_week_anchor())?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // The file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALPLANNER")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        self.planner.anchor()?;

        Ok(())
    }
}
