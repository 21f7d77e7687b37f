use super::identity::AttachmentKey;
use super::reconcile::{merge_all, MergePolicy};
use super::sync_model::{SyncDirection, SyncReport};
use super::sync_traits::SyncStore;
use crate::errors::Result;

/// Merges every local asset and its attachments into the remote store.
///
/// Runs in a single remote transaction. Local `last_sync` values are never
/// carried over. Attachments are matched by the id they already carry, not by
/// name, unlike pull.
pub fn push<L, R>(local: &mut L, remote: &mut R) -> Result<SyncReport>
where
    L: SyncStore,
    R: SyncStore,
{
    let policy = MergePolicy {
        direction: SyncDirection::Push,
        attachment_key: AttachmentKey::Id,
        stamp: None,
    };
    merge_all(local, remote, &policy)
}
