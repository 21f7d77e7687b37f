use diesel::mysql::MysqlConnection;
use diesel::Connection;
use log::debug;

use asset_sync_core::config::RemoteConfig;
use asset_sync_core::errors::Result;
use asset_sync_core::sync::RemoteConnector;

use crate::errors::IntoCore;

const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Builds a `mysql://` URL from the remote settings. User and password are
/// percent-encoded.
pub fn database_url(config: &RemoteConfig) -> String {
    format!(
        "mysql://{}:{}@{}:{}/{}",
        urlencoding::encode(&config.user),
        urlencoding::encode(&config.password),
        config.host,
        config.port.unwrap_or(DEFAULT_MYSQL_PORT),
        urlencoding::encode(&config.database),
    )
}

/// Sync adapter over a connection to the central MySQL server.
///
/// The server's tables are expected to exist already with the same columns as
/// the local ones.
pub struct MysqlStore {
    conn: MysqlConnection,
}

impl MysqlStore {
    pub fn connect(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "Connecting to {}:{}/{}",
            config.host,
            config.port.unwrap_or(DEFAULT_MYSQL_PORT),
            config.database
        );
        let conn = MysqlConnection::establish(&database_url(config)).into_core()?;
        Ok(Self { conn })
    }

    pub fn connection(&mut self) -> &mut MysqlConnection {
        &mut self.conn
    }
}

impl_sync_store!(MysqlStore);

/// Opens a fresh [`MysqlStore`] for every sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

impl RemoteConnector for MysqlConnector {
    type Store = MysqlStore;

    fn connect(&self, config: &RemoteConfig) -> Result<MysqlStore> {
        MysqlStore::connect(config)
    }
}
