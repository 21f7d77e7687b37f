use super::identity::AttachmentKey;
use super::reconcile::{merge_all, MergePolicy};
use super::sync_model::{SyncDirection, SyncReport};
use super::sync_traits::SyncStore;
use crate::errors::Result;
use crate::utils::sync_timestamp;

/// Merges every remote asset and its attachments into the local store.
///
/// Runs in a single local transaction: the local store ends up either
/// untouched or fully merged. Every written local row is stamped with the
/// current time. Attachments are matched by name within their owning asset.
/// The remote store is only read.
pub fn pull<L, R>(local: &mut L, remote: &mut R) -> Result<SyncReport>
where
    L: SyncStore,
    R: SyncStore,
{
    let policy = MergePolicy {
        direction: SyncDirection::Pull,
        attachment_key: AttachmentKey::Name,
        stamp: Some(sync_timestamp()),
    };
    merge_all(remote, local, &policy)
}
