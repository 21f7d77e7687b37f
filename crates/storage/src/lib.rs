//! Storage adapters for the asset tracker.
//!
//! This crate is the only place in the workspace where Diesel dependencies
//! exist. It provides:
//! - the local SQLite database (file setup, pragmas, pooling, schema creation)
//! - [`SqliteStore`] and, behind the `mysql` feature, [`MysqlStore`]: the two
//!   `SyncStore` adapters the reconcilers run against
//! - the local asset repository used for single-record edits
//!
//! ```text
//!        asset-sync-core (models, reconcilers)
//!                  │
//!                  ▼
//!          storage (this crate)
//!            │             │
//!            ▼             ▼
//!      SQLite file     MySQL server
//! ```

pub mod assets;
pub mod db;
pub mod errors;
pub mod schema;
pub mod store;

// Re-export database utilities
pub use db::{
    create_pool, establish_connection, get_connection, init, initialize_local_store, DbConnection,
    DbPool,
};

pub use store::SqliteStore;
#[cfg(feature = "mysql")]
pub use store::{database_url, MysqlConnector, MysqlStore};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from asset-sync-core for convenience
pub use asset_sync_core::errors::{DatabaseError, Error, Result};
