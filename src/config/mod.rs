//! Service configuration.
//!
//! Every setting comes from `AUTHGATE__<SECTION>__<KEY>` environment
//! variables (a `.env` file is honoured in development) and is read once at
//! startup into [`AppConfig`]. Each section validates itself.
//!
//! ```no_run
//! use authgate::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod auth;
mod database;
mod email;
mod error;
mod outbox;
mod server;

pub use auth::AuthConfig;
pub use database::{DatabaseConfig, StorageBackend};
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use outbox::OutboxConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// All configuration sections. Only `auth.jwt_secret` is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Empty URL keeps state in memory
    #[serde(default)]
    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub outbox: OutboxConfig,
}

impl AppConfig {
    /// Read `.env` (if any) and the `AUTHGATE__*` environment.
    ///
    /// `AUTHGATE__OUTBOX__BATCH_SIZE=50` sets `outbox.batch_size`. Fails
    /// when `auth.jwt_secret` is missing or a value has the wrong type;
    /// semantic checks are left to [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUTHGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// First semantic error found, checked section by section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.email.validate()?;
        self.outbox.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-wide; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn set_minimal_env() {
        env::set_var("AUTHGATE__AUTH__JWT_SECRET", SECRET);
    }

    fn clear_env() {
        for key in [
            "AUTHGATE__AUTH__JWT_SECRET",
            "AUTHGATE__DATABASE__URL",
            "AUTHGATE__SERVER__PORT",
            "AUTHGATE__SERVER__ENVIRONMENT",
            "AUTHGATE__OUTBOX__BATCH_SIZE",
            "AUTHGATE__OUTBOX__POLL_INTERVAL_MS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_reads_sections_from_environment() {
        let _env = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUTHGATE__DATABASE__URL", "postgresql://authgate@db/authgate");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.auth.jwt_secret.expose_secret(), SECRET);
        assert_eq!(config.database.url, "postgresql://authgate@db/authgate");
    }

    #[test]
    fn test_validate_minimal_config() {
        let _env = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.backend(), StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_fails_to_load() {
        let _env = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_server_and_outbox_defaults() {
        let _env = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.outbox.poll_interval_ms, 10_000);
    }

    #[test]
    fn test_nested_overrides() {
        let _env = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUTHGATE__SERVER__PORT", "3000");
        env::set_var("AUTHGATE__OUTBOX__BATCH_SIZE", "50");
        env::set_var("AUTHGATE__OUTBOX__POLL_INTERVAL_MS", "250");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.outbox.batch_size, Some(50));
        assert_eq!(config.outbox.poll_interval_ms, 250);
    }

    #[test]
    fn test_is_production() {
        let _env = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUTHGATE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert!(config.is_production());
        // default public URL is plain http
        assert!(config.validate().is_err());
    }
}
