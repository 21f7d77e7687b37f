use std::sync::Arc;

use tokio::sync::Mutex;

use asset_sync_core::config::RemoteConfig;
use asset_sync_core::sync::{pull_from_remote, push_to_remote, RemoteConnector, SyncDirection, SyncOutcome};
use asset_sync_storage::SqliteStore;

/// Runs syncs against the local database on the blocking pool.
///
/// Clones share one in-progress lock, so a pull and a push never touch the
/// stores at the same time.
pub struct SyncRunner<C> {
    db_path: String,
    remote: RemoteConfig,
    connector: Arc<C>,
    in_progress: Arc<Mutex<()>>,
}

impl<C> Clone for SyncRunner<C> {
    fn clone(&self) -> Self {
        Self {
            db_path: self.db_path.clone(),
            remote: self.remote.clone(),
            connector: Arc::clone(&self.connector),
            in_progress: Arc::clone(&self.in_progress),
        }
    }
}

impl<C> SyncRunner<C>
where
    C: RemoteConnector + Send + Sync + 'static,
{
    pub fn new(db_path: impl Into<String>, remote: RemoteConfig, connector: C) -> Self {
        Self {
            db_path: db_path.into(),
            remote,
            connector: Arc::new(connector),
            in_progress: Arc::new(Mutex::new(())),
        }
    }

    pub async fn run(&self, direction: SyncDirection) -> SyncOutcome {
        let _guard = self.in_progress.lock().await;

        let db_path = self.db_path.clone();
        let remote = self.remote.clone();
        let connector = Arc::clone(&self.connector);
        let job = tokio::task::spawn_blocking(move || {
            let mut local = match SqliteStore::open(&db_path) {
                Ok(store) => store,
                Err(e) => {
                    return SyncOutcome::Failed {
                        direction,
                        error: e.to_string(),
                    }
                }
            };
            match direction {
                SyncDirection::Pull => pull_from_remote(&mut local, connector.as_ref(), &remote),
                SyncDirection::Push => push_to_remote(&mut local, connector.as_ref(), &remote),
            }
        });

        match job.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Sync worker for {} did not finish: {}", direction, e);
                SyncOutcome::Failed {
                    direction,
                    error: format!("Sync worker did not finish: {}", e),
                }
            }
        }
    }

    /// Pushes local edits, then pulls the server state back. Stops after the
    /// first failed direction.
    pub async fn sync(&self) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::with_capacity(2);
        for direction in [SyncDirection::Push, SyncDirection::Pull] {
            let outcome = self.run(direction).await;
            let failed = !outcome.is_success();
            outcomes.push(outcome);
            if failed {
                break;
            }
        }
        outcomes
    }
}
