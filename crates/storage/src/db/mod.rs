use log::info;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PooledConnection};
use diesel::sqlite::SqliteConnection;

use asset_sync_core::errors::Result;

use crate::errors::IntoCore;

mod schema_init;
pub use schema_init::{ensure_schema, TABLES};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Pragmas applied to every local connection. Foreign keys are off by default
/// in SQLite; the attachment tables rely on them for cascade delete.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA busy_timeout = 30000;
";

/// Prepares the local database file: creates its directory, switches it to
/// WAL and creates the asset tables if they are missing.
///
/// Returns the path that was initialized.
pub fn init(db_path: &str) -> Result<String> {
    if let Some(db_dir) = Path::new(db_path).parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir)?;
        }
    }

    let mut conn = establish_connection(db_path)?;
    conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
        .into_core()?;
    initialize_local_store(&mut conn)?;

    info!("Local store ready at {}", db_path);
    Ok(db_path.to_string())
}

/// Creates the local schema on an open connection. Safe to call on every open.
pub fn initialize_local_store(conn: &mut SqliteConnection) -> Result<()> {
    ensure_schema(conn)
}

/// Opens a single local connection with the standard pragmas applied.
pub fn establish_connection(db_path: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(db_path).into_core()?;
    conn.batch_execute(CONNECTION_PRAGMAS).into_core()?;
    Ok(conn)
}

#[derive(Debug)]
struct ConnectionCustomizer;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(4)
        .min_idle(Some(1))
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer))
        .build(manager)
        .into_core()?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get().into_core()
}
