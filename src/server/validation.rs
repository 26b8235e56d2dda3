//! Production configuration validation
//!
//! Checks for settings that work in development but not in a deployment.

use super::config::AppConfig;
use std::path::Path;
use tracing::warn;
use whiteboard_core::is_in_memory;

/// Warn about risky production settings, returning the warnings issued
pub fn validate_production_config(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.database.max_connections == 0 {
        warnings.push(
            "database.max_connections is 0; the store will use a single connection".to_string(),
        );
    }

    if config.is_production() {
        if is_in_memory(&config.database.url) {
            warnings.push(
                "Database is in-memory in production. Drawings will be lost on restart."
                    .to_string(),
            );
        }

        let index = Path::new(&config.server.static_dir).join("index.html");
        if !index.exists() {
            warnings.push(format!(
                "Static assets not found at {}. The frontend will not be served.",
                index.display()
            ));
        }
    }

    for warning in &warnings {
        warn!("CONFIG WARNING: {}", warning);
    }
    warnings
}
