//! Seed configuration loaded from environment variables.

use std::env;

use pixgram_infra::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub database: Option<DatabaseConfig>,
    pub telemetry: TelemetryConfig,
    /// Username of the sample account.
    pub username: String,
}

impl SeedConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            username: env::var("SEED_USERNAME").unwrap_or_else(|_| "ana".to_string()),
        }
    }
}
