//! Application settings.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file
//! (`northwind.toml`, or the path in `NORTHWIND_CONFIG_FILE`), then
//! `NORTHWIND__*` environment variables such as `NORTHWIND__DATABASE__URL`.
//! CLI flags are applied on top by the commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use sea_orm::Database;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::identity::TokenService;
use crate::schemas::AppState;

const CONFIG_FILE_ENV: &str = "NORTHWIND_CONFIG_FILE";
const DEFAULT_CONFIG_FILE: &str = "northwind.toml";
const ENV_PREFIX: &str = "NORTHWIND";
const ENV_SEPARATOR: &str = "__";

/// Shortest accepted HS256 signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub bind_address: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub access_token_hours: i64,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_hours", &self.access_token_hours)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set
    pub filter: String,
}

impl Settings {
    /// Loads from the default file location and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .ok();
        Self::load_from(file.as_deref())
    }

    /// Loads with `file` as the TOML layer. An explicit file must exist;
    /// the default `northwind.toml` is optional.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match file {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        debug!("Reading configuration file {} (required: {})", path.display(), required);

        let config = Config::builder()
            .set_default("server.bind_address", "0.0.0.0:3000")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.url", "sqlite://northwind.db?mode=rwc")?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.access_token_hours", 8)?
            .set_default("logging.filter", "northwind=debug,tower_http=debug")?
            .add_source(
                File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        if self.auth.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::invalid(
                "auth.jwt_secret",
                format!("must be at least {MIN_SECRET_LEN} bytes long"),
            ));
        }
        if self.auth.access_token_hours <= 0 {
            return Err(ConfigError::invalid(
                "auth.access_token_hours",
                "must be greater than 0",
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn token_service(&self) -> TokenService {
        TokenService::new(self.auth.jwt_secret.clone(), self.auth.access_token_hours)
    }
}

/// Connect to the configured database and build the shared state
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    settings.validate()?;

    info!("Connecting to database: {}", settings.database.url);
    let db = Database::connect(&settings.database.url).await?;

    Ok(AppState::new(db, settings.token_service()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            server: ServerSettings {
                bind_address: "127.0.0.1:3000".to_string(),
                request_timeout_secs: 30,
            },
            database: DatabaseSettings {
                url: "sqlite::memory:".to_string(),
            },
            auth: AuthSettings {
                jwt_secret: "test_secret_key_at_least_32_characters_long".to_string(),
                access_token_hours: 8,
            },
            logging: LoggingSettings {
                filter: "northwind=debug".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_settings() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut settings = settings();
        settings.auth.jwt_secret = "short".to_string();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "auth.jwt_secret", .. }));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut settings = settings();
        settings.auth.access_token_hours = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = Settings::load_from(Some(Path::new("/nonexistent/northwind.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_secret_is_redacted() {
        let debug = format!("{:?}", settings().auth);
        assert!(!debug.contains("test_secret_key"));
    }

    #[tokio::test]
    async fn test_initialize_app_state() {
        let state = initialize_app_state(&settings()).await.unwrap();
        assert!(state.db.ping().await.is_ok());
        assert_eq!(state.tokens.ttl_hours(), 8);
    }
}
