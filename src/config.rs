//! Configuration management for the climate API
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and provides validation for all configuration settings.

use crate::ClimateApiError;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CLIMATE_API_CONFIG";

/// Root configuration structure for the climate API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateApiConfig {
    /// Dataset location and pool settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Query window used by the precipitation and tobs routes
    #[serde(default)]
    pub query: QueryConfig,
}

/// Dataset configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite file, opened read-only
    #[serde(default = "default_database_path")]
    pub path: String,
    /// Upper bound on pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Reference date and station used for the one-year lookback routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Most recent date in the dataset, `YYYY-MM-DD`
    #[serde(default = "default_reference_date")]
    pub reference_date: String,
    /// Station reported by the tobs route
    #[serde(default = "default_station_id")]
    pub station_id: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Compute reference date and station from the dataset at startup
    #[serde(default)]
    pub derive_from_data: bool,
}

// Default value functions
fn default_database_path() -> String {
    "Resources/hawaii.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_reference_date() -> String {
    "2017-08-23".to_string()
}

fn default_station_id() -> String {
    "USC00519281".to_string()
}

fn default_lookback_days() -> u32 {
    365
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            station_id: default_station_id(),
            lookback_days: default_lookback_days(),
            derive_from_data: false,
        }
    }
}

impl Default for ClimateApiConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl ClimateApiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CLIMATE_API_SERVER__PORT=8080 overrides server.port
        builder = builder.add_source(
            Environment::with_prefix("CLIMATE_API")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimateApiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.database.path.is_empty() {
            self.database.path = default_database_path();
        }
        if self.database.max_connections == 0 {
            self.database.max_connections = default_max_connections();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.query.reference_date.is_empty() {
            self.query.reference_date = default_reference_date();
        }
        if self.query.station_id.is_empty() {
            self.query.station_id = default_station_id();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Socket address string for the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.database.max_connections > 64 {
            return Err(ClimateApiError::config("Database max connections cannot exceed 64").into());
        }

        if self.server.port == 0 {
            return Err(ClimateApiError::config("Server port must be non-zero").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(
                ClimateApiError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.query.lookback_days == 0 {
            return Err(ClimateApiError::config("Lookback must be at least one day").into());
        }

        if self.query.lookback_days > 36_600 {
            return Err(ClimateApiError::config("Lookback cannot exceed 36600 days").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimateApiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimateApiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if NaiveDate::parse_from_str(&self.query.reference_date, "%Y-%m-%d").is_err() {
            return Err(ClimateApiError::config(format!(
                "Invalid reference date '{}'. Expected YYYY-MM-DD",
                self.query.reference_date
            ))
            .into());
        }

        Ok(())
    }
}
