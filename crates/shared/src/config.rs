//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Dashboard window configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Dashboard summary settings.
///
/// The response keeps its `last30DaysExpenses`/`last60DaysIncome` field names
/// whatever windows are configured here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Records fetched per kind before the recent-transactions merge, and the
    /// length the merged list is cut to.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
    /// Rolling window for expenses, in days.
    #[serde(default = "default_expense_window_days")]
    pub expense_window_days: i64,
    /// Rolling window for income, in days.
    #[serde(default = "default_income_window_days")]
    pub income_window_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            expense_window_days: default_expense_window_days(),
            income_window_days: default_income_window_days(),
        }
    }
}

/// Longest rolling window accepted, in days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

impl DashboardConfig {
    /// Checks that both rolling windows are between 1 and [`MAX_WINDOW_DAYS`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first out-of-range window.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        for (name, days) in [
            ("dashboard.expense_window_days", self.expense_window_days),
            ("dashboard.income_window_days", self.income_window_days),
        ] {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(config::ConfigError::Message(format!(
                    "{name} must be between 1 and {MAX_WINDOW_DAYS}, got {days}"
                )));
            }
        }
        Ok(())
    }
}

fn default_recent_limit() -> u64 {
    10
}

fn default_expense_window_days() -> i64 {
    30
}

fn default_income_window_days() -> i64 {
    60
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a dashboard
    /// window is out of range.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.dashboard.validate()?;
        Ok(config)
    }
}
