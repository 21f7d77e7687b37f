use std::env;

pub const ENV_DB_PATH: &str = "ASSET_SYNC_DB_PATH";
pub const ENV_LOG_FORMAT: &str = "ASSET_SYNC_LOG_FORMAT";
pub const DEFAULT_DB_PATH: &str = "./db/assets.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Local settings for the binary. Remote settings are read separately, and
/// only by the commands that talk to the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(ENV_DB_PATH)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let log_format = match lookup(ENV_LOG_FORMAT) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            db_path,
            log_format,
        }
    }

    /// `--db` wins over the environment.
    pub fn with_db_override(mut self, db_path: Option<String>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }
}
