//! Configuration management for the `AirWatch` backend
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirWatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AirWatch` backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirWatchConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Synthetic generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Built dashboard served for non-API paths
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// PEM certificate chain for HTTPS
    #[serde(default)]
    pub tls_cert_path: Option<String>,
    /// PEM private key for HTTPS
    #[serde(default)]
    pub tls_key_path: Option<String>,
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
    /// OTLP/HTTP collector endpoint; export is disabled when unset
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

/// Synthetic generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Default chart horizon in hours
    #[serde(default = "default_series_hours")]
    pub series_hours: u32,
    /// Horizon of the measurements table in hours
    #[serde(default = "default_measurement_hours")]
    pub measurement_hours: u32,
    /// Upper bound for a requested horizon
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,
    /// Fixed seed; every request replays the same draws when set
    #[serde(default)]
    pub seed: Option<u64>,
    /// Version string reported with predictions
    #[serde(default = "default_model_version")]
    pub model_version: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_series_hours() -> u32 {
    crate::generator::SERIES_HOURS
}

fn default_measurement_hours() -> u32 {
    crate::generator::MEASUREMENT_HOURS
}

fn default_max_hours() -> u32 {
    720
}

fn default_model_version() -> String {
    crate::generator::DEFAULT_MODEL_VERSION.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            request_timeout_seconds: default_request_timeout(),
            cors_origins: Vec::new(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            series_hours: default_series_hours(),
            measurement_hours: default_measurement_hours(),
            max_hours: default_max_hours(),
            seed: None,
            model_version: default_model_version(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn tls_enabled(&self) -> bool {
        self.tls_cert_path.is_some() && self.tls_key_path.is_some()
    }
}

impl AirWatchConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            tracing::debug!(path = %config_file.display(), "loading config file");
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. AIRWATCH__SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("AIRWATCH")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airwatch").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
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
        if self.generator.series_hours == 0 {
            self.generator.series_hours = default_series_hours();
        }
        if self.generator.measurement_hours == 0 {
            self.generator.measurement_hours = default_measurement_hours();
        }
        if self.generator.max_hours == 0 {
            self.generator.max_hours = default_max_hours();
        }
        if self.generator.model_version.is_empty() {
            self.generator.model_version = default_model_version();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_tls()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.request_timeout_seconds > 300 {
            return Err(
                AirWatchError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.generator.max_hours > 24 * 365 {
            return Err(AirWatchError::config("Maximum horizon cannot exceed 8760 hours").into());
        }

        if self.generator.series_hours > self.generator.max_hours {
            return Err(AirWatchError::config(format!(
                "Series horizon ({}h) cannot exceed the maximum horizon ({}h)",
                self.generator.series_hours, self.generator.max_hours
            ))
            .into());
        }

        if self.generator.measurement_hours > self.generator.max_hours {
            return Err(AirWatchError::config(format!(
                "Measurement horizon ({}h) cannot exceed the maximum horizon ({}h)",
                self.generator.measurement_hours, self.generator.max_hours
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirWatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(AirWatchError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        for origin in &self.server.cors_origins {
            if origin != "*" && !is_http_url(origin) {
                return Err(AirWatchError::config(format!(
                    "Invalid CORS origin '{origin}'. Must be '*' or an HTTP(S) origin"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Certificate and key must be configured together
    fn validate_tls(&self) -> Result<()> {
        match (&self.server.tls_cert_path, &self.server.tls_key_path) {
            (Some(_), None) | (None, Some(_)) => Err(AirWatchError::config(
                "Both tls_cert_path and tls_key_path must be set to enable HTTPS",
            )
            .into()),
            _ => Ok(()),
        }
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AirWatchConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.generator.series_hours, 72);
        assert_eq!(config.generator.measurement_hours, 24);
        assert_eq!(config.generator.model_version, "v1.2.0");
        assert!(config.generator.seed.is_none());
        assert!(!config.server.tls_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = AirWatchConfig::default();
        config.server.port = 0;
        config.logging.format = String::new();
        config.generator.series_hours = 0;
        config.apply_defaults();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.generator.series_hours, 72);
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AirWatchConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AirWatchConfig::default();
        config.server.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_series_horizon_bounded_by_max() {
        let mut config = AirWatchConfig::default();
        config.generator.max_hours = 48;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Series horizon"));
    }

    #[test]
    fn test_tls_paths_must_be_paired() {
        let mut config = AirWatchConfig::default();
        config.server.tls_cert_path = Some("cert.pem".to_string());
        assert!(config.validate().is_err());

        config.server.tls_key_path = Some("key.pem".to_string());
        assert!(config.validate().is_ok());
        assert!(config.server.tls_enabled());
    }

    #[test]
    fn test_invalid_otlp_endpoint() {
        let mut config = AirWatchConfig::default();
        config.logging.otlp_endpoint = Some("collector:4318".to_string());
        assert!(config.validate().is_err());

        config.logging.otlp_endpoint = Some("http://collector:4318".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_cors_origin() {
        let mut config = AirWatchConfig::default();
        config.server.cors_origins = vec!["localhost:5173".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090
cors_origins = ["http://localhost:5173"]

[generator]
seed = 42
model_version = "v9-test"
"#
        )
        .unwrap();

        let config = AirWatchConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.generator.model_version, "v9-test");
        assert_eq!(config.generator.series_hours, 72);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            AirWatchConfig::load_from_path(Some(PathBuf::from("/nonexistent/airwatch.toml")))
                .unwrap();
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AirWatchConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("airwatch"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
