//! Configuration management for the `TripAI` backend
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripAiError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TripAI` backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripAiConfig {
    /// Text-generation API configuration
    #[serde(default)]
    pub ai: AiConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default trip settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Text-generation API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Bearer API key for the text-generation endpoint
    pub api_key: Option<String>,
    /// Text-generation endpoint URL
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    /// Model identifier sent in the request envelope
    #[serde(default = "default_ai_model")]
    pub model: String,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
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

/// Default trip settings used when a request leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Assumed trip length in days for budget derivation
    #[serde(default = "default_trip_days")]
    pub trip_days: u32,
    /// Default traveler count
    #[serde(default = "default_traveler_count")]
    pub traveler_count: u32,
    /// Default total budget
    #[serde(default = "default_budget")]
    pub budget: f64,
}

// Default value functions
fn default_ai_endpoint() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation".to_string()
}

fn default_ai_model() -> String {
    "qwen-plus".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_trip_days() -> u32 {
    5
}

fn default_traveler_count() -> u32 {
    2
}

fn default_budget() -> f64 {
    5000.0
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
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

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            trip_days: default_trip_days(),
            traveler_count: default_traveler_count(),
            budget: default_budget(),
        }
    }
}

impl Default for TripAiConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl TripAiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TRIPAI_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TRIPAI")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: TripAiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripai").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The API key is optional: without one the backend still serves
        // requests through the deterministic fallback generator.
        if let Some(api_key) = &self.ai.api_key {
            if api_key.is_empty() {
                return Err(TripAiError::config(
                    "AI API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(TripAiError::config(
                    "AI API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 200 {
                return Err(TripAiError::config(
                    "AI API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.defaults.trip_days == 0 {
            return Err(TripAiError::config("Default trip days must be at least 1").into());
        }

        if self.defaults.trip_days > 60 {
            return Err(TripAiError::config("Default trip days cannot exceed 60").into());
        }

        if self.defaults.traveler_count == 0 {
            return Err(TripAiError::config("Default traveler count must be at least 1").into());
        }

        if self.defaults.budget <= 0.0 {
            return Err(TripAiError::config("Default budget must be positive").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.ai.endpoint.starts_with("http://") && !self.ai.endpoint.starts_with("https://") {
            return Err(
                TripAiError::config("AI endpoint must be a valid HTTP or HTTPS URL").into(),
            );
        }

        if self.ai.model.trim().is_empty() {
            return Err(TripAiError::config("AI model identifier cannot be empty").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TripAiConfig::default();
        assert!(config.ai.endpoint.contains("dashscope"));
        assert_eq!(config.ai.model, "qwen-plus");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.trip_days, 5);
        assert_eq!(config.defaults.traveler_count, 2);
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let config = TripAiConfig::default();
        // API key is optional: fallback generation works without it
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = TripAiConfig::default();
        config.ai.api_key = Some("sk-valid_api_key_123".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = TripAiConfig::default();
        config.ai.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripAiConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripAiConfig::default();
        config.defaults.trip_days = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("trip days"));
    }

    #[test]
    fn test_config_validation_endpoint_scheme() {
        let mut config = TripAiConfig::default();
        config.ai.endpoint = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_config_path_generation() {
        let path = TripAiConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("tripai"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
