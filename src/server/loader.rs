//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Values taken from plain, unprefixed environment variables
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub environment: Option<String>,
    pub port: Option<String>,
    pub database_url: Option<String>,
}

impl Overrides {
    /// Read `WHITEBOARD_ENV`, `PORT` and `DATABASE_URL`
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            environment: var("WHITEBOARD_ENV"),
            port: var("PORT"),
            database_url: var("DATABASE_URL"),
        }
    }
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let overrides = Overrides::from_env();
    let env_name = overrides
        .environment
        .clone()
        .unwrap_or_else(|| "development".to_string());

    let builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(File::with_name("config/local").required(false))
        // 3. Prefixed environment variables: WHITEBOARD_SERVER__PORT etc.
        .add_source(
            Environment::with_prefix("WHITEBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    load_config_with(builder, &overrides)
}

/// Apply the plain environment overrides on top of `builder` and deserialize
pub fn load_config_with(
    builder: ConfigBuilder<DefaultState>,
    overrides: &Overrides,
) -> Result<AppConfig> {
    let port = overrides
        .port
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw:?}"))
        })
        .transpose()?;

    let config = builder
        .set_override_option("environment", overrides.environment.clone())?
        .set_override_option("server.port", port.map(i64::from))?
        .set_override_option("database.url", overrides.database_url.clone())?
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    #[test]
    fn test_embedded_defaults() {
        let config = load_config_with(embedded(), &Overrides::default()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.static_dir, "frontend/build");
        assert_eq!(config.database.url, "sqlite://whiteboard.db?mode=rwc");
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.is_production());
    }

    #[test]
    fn test_plain_env_overrides_win() {
        let overrides = Overrides {
            environment: Some("production".to_string()),
            port: Some("8080".to_string()),
            database_url: Some("sqlite::memory:".to_string()),
        };
        let config = load_config_with(embedded(), &overrides).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(config.is_production());
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let builder = embedded().add_source(File::from_str(
            "[server]\nport = 6000\nhost = \"127.0.0.1\"",
            FileFormat::Toml,
        ));
        let config = load_config_with(builder, &Overrides::default()).unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.static_dir, "frontend/build");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let overrides = Overrides {
            port: Some("http".to_string()),
            ..Overrides::default()
        };
        let err = load_config_with(embedded(), &overrides).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
