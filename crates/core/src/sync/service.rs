//! Caller-facing sync entry points.
//!
//! These wrap the reconcilers with connection setup and turn every failure
//! into a [`SyncOutcome`] instead of an error, so that whatever surface started
//! the sync only has to show a message.

use log::{error, info};

use super::pull::pull;
use super::push::push;
use super::sync_model::{SyncDirection, SyncOutcome, SyncReport};
use super::sync_traits::SyncStore;
use crate::config::RemoteConfig;
use crate::errors::Result;

/// Opens a connection to the central store.
pub trait RemoteConnector {
    type Store: SyncStore;

    fn connect(&self, config: &RemoteConfig) -> Result<Self::Store>;
}

/// Pulls server data into `local`.
///
/// A connection failure is reported before any local transaction is opened.
pub fn pull_from_remote<L, C>(local: &mut L, connector: &C, config: &RemoteConfig) -> SyncOutcome
where
    L: SyncStore,
    C: RemoteConnector,
{
    run(SyncDirection::Pull, || {
        let mut remote = connector.connect(config)?;
        pull(local, &mut remote)
    })
}

/// Pushes local data to the server.
pub fn push_to_remote<L, C>(local: &mut L, connector: &C, config: &RemoteConfig) -> SyncOutcome
where
    L: SyncStore,
    C: RemoteConnector,
{
    run(SyncDirection::Push, || {
        let mut remote = connector.connect(config)?;
        push(local, &mut remote)
    })
}

fn run<F>(direction: SyncDirection, job: F) -> SyncOutcome
where
    F: FnOnce() -> Result<SyncReport>,
{
    info!("Starting sync {}", direction);
    match job() {
        Ok(report) => SyncOutcome::Completed(report),
        Err(e) => {
            if e.is_connectivity_failure() {
                error!("Sync {} failed, server unreachable: {}", direction, e);
            } else if e.is_constraint_violation() {
                error!("Sync {} rejected by a store constraint: {}", direction, e);
            } else {
                error!("Sync {} failed: {}", direction, e);
            }
            SyncOutcome::Failed {
                direction,
                error: e.to_string(),
            }
        }
    }
}
