//! Matching source rows to destination rows.

use log::debug;

use super::sync_traits::SyncStore;
use crate::assets::{Asset, Attachment};
use crate::errors::Result;

/// Where a source asset lands in the destination store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetIdentity {
    /// The destination already holds this serial number under the given id.
    Existing(i32),
    /// Unknown serial number; insert it reusing the source row's id.
    New(i32),
}

impl AssetIdentity {
    /// Destination id of the asset, whichever way it was resolved.
    pub fn id(&self) -> i32 {
        match *self {
            AssetIdentity::Existing(id) | AssetIdentity::New(id) => id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, AssetIdentity::New(_))
    }
}

/// Resolves `source` against `dest` by serial number.
///
/// No lock is taken between this lookup and the following write. A row with
/// the same serial inserted in between surfaces as a unique violation on
/// insert.
pub fn resolve_asset<S: SyncStore>(dest: &mut S, source: &Asset) -> Result<AssetIdentity> {
    let identity = match dest.find_asset_id_by_serial(&source.serial_number)? {
        Some(id) => AssetIdentity::Existing(id),
        None => AssetIdentity::New(source.id),
    };
    debug!(
        "Serial {} (source id {}) resolved to {:?}",
        source.serial_number, source.id, identity
    );
    Ok(identity)
}

/// Which attribute decides that a source attachment is already present in
/// the destination.
///
/// Pull matches by name, push matches by id, so the two directions disagree
/// on what counts as a duplicate. When several destination rows share a name,
/// the one listed last wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKey {
    Name,
    Id,
}

impl AttachmentKey {
    /// Finds the destination attachment that `candidate` should overwrite.
    pub fn find<'a>(&self, existing: &'a [Attachment], candidate: &Attachment) -> Option<&'a Attachment> {
        match self {
            AttachmentKey::Name => existing.iter().rev().find(|a| a.name == candidate.name),
            AttachmentKey::Id => existing.iter().find(|a| a.id == candidate.id),
        }
    }
}
