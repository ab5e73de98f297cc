//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STARBOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use starbot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Serving {}", config.persona.organization);
//! ```

mod ai;
mod description;
mod error;
mod persona;
mod server;
mod session;

pub use ai::AiConfig;
pub use description::DescriptionConfig;
pub use error::{ConfigError, ValidationError};
pub use persona::PersonaConfig;
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults except the generation API key, which
/// [`AppConfig::validate()`] requires.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation endpoint configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Organization description source
    #[serde(default)]
    pub description: DescriptionConfig,

    /// Assistant persona
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Idle session eviction
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STARBOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STARBOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `STARBOT__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `STARBOT__DESCRIPTION__SOURCE=https://...` -> `description.source = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STARBOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.description.validate()?;
        self.persona.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::locale::Language;
    use crate::ports::SafetyThreshold;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "STARBOT__AI__API_KEY",
        "STARBOT__AI__SAFETY_THRESHOLD",
        "STARBOT__AI__TOP_K",
        "STARBOT__SERVER__PORT",
        "STARBOT__SERVER__ENVIRONMENT",
        "STARBOT__DESCRIPTION__SOURCE",
        "STARBOT__DESCRIPTION__TIMEZONE",
        "STARBOT__PERSONA__LANGUAGE",
        "STARBOT__SESSION__IDLE_TTL_SECS",
    ];

    fn set_minimal_env() {
        env::set_var("STARBOT__AI__API_KEY", "AIza-test");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("STARBOT__DESCRIPTION__SOURCE", "https://startop.example/description.json");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.ai.has_api_key());
        assert_eq!(
            config.description.source,
            "https://startop.example/description.json"
        );
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STARBOT__AI__API_KEY"))
        );
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.description.refresh_interval_secs, 10_800);
        assert_eq!(config.description.timezone, "America/New_York");
        assert_eq!(config.persona.language, Language::Fr);
        assert_eq!(config.ai.safety_threshold, SafetyThreshold::BlockNone);
        assert_eq!(config.session.idle_ttl_secs, 1800);
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("STARBOT__SERVER__PORT", "3000");
        env::set_var("STARBOT__SERVER__ENVIRONMENT", "production");
        env::set_var("STARBOT__AI__SAFETY_THRESHOLD", "BLOCK_ONLY_HIGH");
        env::set_var("STARBOT__AI__TOP_K", "32");
        env::set_var("STARBOT__PERSONA__LANGUAGE", "en");
        env::set_var("STARBOT__SESSION__IDLE_TTL_SECS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.ai.safety_threshold, SafetyThreshold::BlockOnlyHigh);
        assert_eq!(config.ai.top_k, 32);
        assert_eq!(config.persona.language, Language::En);
        assert_eq!(config.session.idle_ttl(), None);
    }

    #[test]
    fn test_invalid_timezone_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("STARBOT__DESCRIPTION__TIMEZONE", "Nowhere/Land");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimezone(_))
        ));
    }
}
