//! Configuration management for NexusSuite
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::NexusError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NexusConfig {
    pub geocoding: ProviderConfig,
    pub weather: ProviderConfig,
    pub news: ProviderConfig,
    pub exchange: ProviderConfig,
    pub translation: ProviderConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

/// Endpoint and credentials of one upstream provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key; providers without keys ignore it
    pub api_key: Option<String>,
    /// Base URL; empty means the provider's public default
    pub base_url: String,
}

/// Outbound HTTP settings shared by all providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    pub user_agent: String,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `memory` or `persistent`
    pub backend: String,
    /// Directory of the persistent store
    pub location: String,
    /// Lifetime of translated place names in hours
    pub translation_ttl_hours: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

pub const DEFAULT_GEOCODING_URL: &str = "https://api.opencagedata.com/geocode/v1";
pub const DEFAULT_WEATHER_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_NEWS_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_EXCHANGE_URL: &str = "https://api.privatbank.ua/p24api";
pub const DEFAULT_TRANSLATION_URL: &str = "https://en.wikipedia.org/w";

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("NexusSuite/{}", crate::VERSION)
}

fn default_cache_backend() -> String {
    "memory".to_string()
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("nexussuite").to_string_lossy().into_owned())
        .unwrap_or_else(|| ".cache/nexussuite".to_string())
}

fn default_translation_ttl() -> u64 {
    30 * 24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            location: default_cache_location(),
            translation_ttl_hours: default_translation_ttl(),
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

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl NexusConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> crate::Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> crate::Result<Self> {
        let mut builder = Config::builder();

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

        // NEXUS_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("NEXUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| NexusError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: NexusConfig = settings
            .try_deserialize()
            .map_err(|e| NexusError::config(format!("Failed to deserialize configuration: {e}")))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nexussuite").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        for (provider, default_url) in [
            (&mut self.geocoding, DEFAULT_GEOCODING_URL),
            (&mut self.weather, DEFAULT_WEATHER_URL),
            (&mut self.news, DEFAULT_NEWS_URL),
            (&mut self.exchange, DEFAULT_EXCHANGE_URL),
            (&mut self.translation, DEFAULT_TRANSLATION_URL),
        ] {
            if provider.base_url.is_empty() {
                provider.base_url = default_url.to_string();
            }
            provider.base_url = provider.base_url.trim_end_matches('/').to_string();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.cache.backend.is_empty() {
            self.cache.backend = default_cache_backend();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.cache.translation_ttl_hours == 0 {
            self.cache.translation_ttl_hours = default_translation_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.bind_address.is_empty() {
            self.server.bind_address = default_bind_address();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional here; present keys must look like keys
    pub fn validate_api_keys(&self) -> crate::Result<()> {
        for (name, provider) in self.providers() {
            if let Some(api_key) = &provider.api_key {
                if api_key.trim().is_empty() {
                    return Err(NexusError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    )));
                }
                if api_key.len() > 200 {
                    return Err(NexusError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    )));
                }
            }
        }
        Ok(())
    }

    /// Providers whose key is not configured; they will be rejected upstream
    #[must_use]
    pub fn missing_api_keys(&self) -> Vec<&'static str> {
        [
            ("geocoding", &self.geocoding),
            ("weather", &self.weather),
            ("news", &self.news),
        ]
        .into_iter()
        .filter(|(_, provider)| provider.api_key.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    fn providers(&self) -> [(&'static str, &ProviderConfig); 5] {
        [
            ("geocoding", &self.geocoding),
            ("weather", &self.weather),
            ("news", &self.news),
            ("exchange", &self.exchange),
            ("translation", &self.translation),
        ]
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(NexusError::config("HTTP timeout cannot exceed 300 seconds"));
        }
        if self.cache.translation_ttl_hours > 24 * 365 {
            return Err(NexusError::config(
                "Translation cache TTL cannot exceed 8760 hours (1 year)",
            ));
        }
        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(NexusError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(NexusError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let valid_backends = ["memory", "persistent"];
        if !valid_backends.contains(&self.cache.backend.as_str()) {
            return Err(NexusError::config(format!(
                "Invalid cache backend '{}'. Must be one of: {}",
                self.cache.backend,
                valid_backends.join(", ")
            )));
        }

        for (name, provider) in self.providers() {
            if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
                return Err(NexusError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}
