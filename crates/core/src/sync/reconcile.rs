//! Batch merge shared by pull and push.

use log::{debug, error, info};

use super::identity::{resolve_asset, AssetIdentity, AttachmentKey};
use super::sync_model::{SyncDirection, SyncReport};
use super::sync_traits::SyncStore;
use crate::assets::{Asset, Attachment, AttachmentKind};
use crate::errors::Result;

/// How one direction writes into its destination.
pub(crate) struct MergePolicy {
    pub direction: SyncDirection,
    /// Dedup key for attachments already present in the destination.
    pub attachment_key: AttachmentKey,
    /// Value stamped into `last_sync` on every written row; `None` leaves the
    /// destination column alone.
    pub stamp: Option<String>,
}

/// Merges every asset of `source` into `dest` inside one `dest` transaction.
pub(crate) fn merge_all<S, D>(source: &mut S, dest: &mut D, policy: &MergePolicy) -> Result<SyncReport>
where
    S: SyncStore,
    D: SyncStore,
{
    let result = dest.transaction(|dest| {
        let mut report = SyncReport::new(policy.direction);
        let assets = source.list_assets()?;
        info!("Sync {}: merging {} assets", policy.direction, assets.len());

        for asset in &assets {
            let identity = merge_asset(dest, asset, policy, &mut report)?;
            for kind in AttachmentKind::ALL {
                merge_attachments(source, dest, kind, asset, identity, policy, &mut report)?;
            }
        }
        Ok(report)
    });

    match &result {
        Ok(report) => info!(
            "Sync {} committed: {} assets ({} new), {} attachments ({} new)",
            policy.direction,
            report.assets_written(),
            report.assets_inserted,
            report.attachments_written(),
            report.attachments_inserted
        ),
        Err(e) => error!("Sync {} rolled back: {}", policy.direction, e),
    }
    result
}

fn merge_asset<D: SyncStore>(
    dest: &mut D,
    source: &Asset,
    policy: &MergePolicy,
    report: &mut SyncReport,
) -> Result<AssetIdentity> {
    let identity = resolve_asset(dest, source)?;
    let row = Asset {
        id: identity.id(),
        last_sync: policy.stamp.clone(),
        ..source.clone()
    };

    match identity {
        AssetIdentity::Existing(_) => {
            dest.update_asset(&row)?;
            report.assets_updated += 1;
        }
        AssetIdentity::New(_) => {
            dest.insert_asset(&row)?;
            report.assets_inserted += 1;
        }
    }
    Ok(identity)
}

fn merge_attachments<S, D>(
    source: &mut S,
    dest: &mut D,
    kind: AttachmentKind,
    source_asset: &Asset,
    identity: AssetIdentity,
    policy: &MergePolicy,
    report: &mut SyncReport,
) -> Result<()>
where
    S: SyncStore,
    D: SyncStore,
{
    let incoming = source.list_attachments(kind, source_asset.id)?;
    if incoming.is_empty() {
        return Ok(());
    }
    // Snapshot taken once per asset: two incoming rows sharing a key are
    // both inserted rather than the second overwriting the first.
    let existing = dest.list_attachments(kind, identity.id())?;

    for attachment in &incoming {
        match policy.attachment_key.find(&existing, attachment) {
            Some(current) => {
                debug!(
                    "Updating {} {} of asset {} (source id {})",
                    kind, current.id, identity.id(), attachment.id
                );
                dest.update_attachment(
                    kind,
                    &Attachment {
                        id: current.id,
                        asset_id: identity.id(),
                        name: attachment.name.clone(),
                        data: attachment.data.clone(),
                        last_sync: policy.stamp.clone(),
                    },
                )?;
                report.attachments_updated += 1;
            }
            None => {
                debug!(
                    "Inserting {} {} for asset {}",
                    kind, attachment.id, identity.id()
                );
                dest.insert_attachment(
                    kind,
                    &Attachment {
                        id: attachment.id,
                        asset_id: identity.id(),
                        name: attachment.name.clone(),
                        data: attachment.data.clone(),
                        last_sync: policy.stamp.clone(),
                    },
                )?;
                report.attachments_inserted += 1;
            }
        }
    }
    Ok(())
}
