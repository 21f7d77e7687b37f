//! Connection settings for the central server.

use std::fmt;

use crate::errors::{Error, Result};

pub const ENV_REMOTE_HOST: &str = "ASSET_SYNC_REMOTE_HOST";
pub const ENV_REMOTE_PORT: &str = "ASSET_SYNC_REMOTE_PORT";
pub const ENV_REMOTE_USER: &str = "ASSET_SYNC_REMOTE_USER";
pub const ENV_REMOTE_PASSWORD: &str = "ASSET_SYNC_REMOTE_PASSWORD";
pub const ENV_REMOTE_DATABASE: &str = "ASSET_SYNC_REMOTE_DATABASE";

/// Where and how to reach the central relational store.
///
/// Host, user, password and database are all required; there are no defaults.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl RemoteConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (environment, file, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| Error::MissingConfigKey(key.into()));

        let port = match lookup(ENV_REMOTE_PORT) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                Error::InvalidConfigValue(format!("{} must be a port number, got '{}'", ENV_REMOTE_PORT, raw))
            })?),
            None => None,
        };

        let config = Self {
            host: required(ENV_REMOTE_HOST)?,
            port,
            user: required(ENV_REMOTE_USER)?,
            password: required(ENV_REMOTE_PASSWORD)?,
            database: required(ENV_REMOTE_DATABASE)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects blank host, user or database names.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            (ENV_REMOTE_HOST, &self.host),
            (ENV_REMOTE_USER, &self.user),
            (ENV_REMOTE_DATABASE, &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfigValue(format!("{} cannot be empty", key)));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}
