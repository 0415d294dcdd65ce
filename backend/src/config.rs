//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `USER_SERVICE_*` environment variables, command-line
//! flags, or a configuration file, in OrthoConfig's usual precedence order.
//! The prefix namespaces the older bare `HTTP_SERVER_PORT` and
//! `POSTGRES_DSN` names.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::persistence::{DEFAULT_MAX_SIZE, PoolConfig};

/// Start-up settings for the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// TCP port the HTTP server listens on, across all interfaces.
    pub http_server_port: u16,
    /// PostgreSQL connection string.
    pub postgres_dsn: String,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

/// Reasons start-up settings are unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A value is missing or malformed.
    #[error("failed to load settings: {0}")]
    Load(String),
    /// The PostgreSQL DSN is set but blank.
    #[error("USER_SERVICE_POSTGRES_DSN must not be empty")]
    EmptyDsn,
}

impl ServiceSettings {
    /// Load settings from `args` and the environment, rejecting a blank DSN.
    ///
    /// # Errors
    /// [`SettingsError::Load`] for missing or malformed values and
    /// [`SettingsError::EmptyDsn`] for a blank DSN.
    pub fn load_from_args(args: impl IntoIterator<Item = OsString>) -> Result<Self, SettingsError> {
        Self::load_from_iter(args)
            .map_err(|err| SettingsError::Load(err.to_string()))?
            .validated()
    }

    fn validated(self) -> Result<Self, SettingsError> {
        if self.postgres_dsn.trim().is_empty() {
            return Err(SettingsError::EmptyDsn);
        }
        Ok(self)
    }

    /// Socket address to bind, on every interface.
    pub fn bind_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.http_server_port))
    }

    /// Pool configuration derived from these settings.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.postgres_dsn.as_str())
            .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_MAX_SIZE))
    }
}
