//! Two-way reconciliation between the local store and the central server.
//!
//! ```text
//!   pull:  remote ──read──▶ reconcile ──write (one local txn)──▶ local
//!   push:  local  ──read──▶ reconcile ──write (one remote txn)──▶ remote
//! ```
//!
//! Both directions walk source assets in ascending id order, match each one
//! against the destination by serial number, upsert it, then upsert its image
//! and bill attachments. The whole batch commits or rolls back as a unit.
//!
//! Nothing in here serializes concurrent invocations. Callers must not run a
//! pull and a push against the same stores at the same time.

mod identity;
mod pull;
mod push;
mod reconcile;
mod service;
mod sync_model;
mod sync_traits;

#[cfg(test)]
pub(crate) mod memory_store;

pub use identity::{resolve_asset, AssetIdentity, AttachmentKey};
pub use pull::pull;
pub use push::push;
pub use service::{pull_from_remote, push_to_remote, RemoteConnector};
pub use sync_model::{SyncDirection, SyncOutcome, SyncReport};
pub use sync_traits::SyncStore;
