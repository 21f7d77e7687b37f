use super::assets_model::{Asset, Attachment, AttachmentKind, NewAsset};
use crate::errors::Result;

/// Trait defining the contract for local asset repository operations.
///
/// These are single-record operations against the local store only; they never
/// cross the sync boundary.
pub trait AssetRepositoryTrait: Send + Sync {
    /// Upserts an asset by serial number along with any supplied attachments.
    fn save(&self, new_asset: NewAsset) -> Result<Asset>;
    fn list(&self) -> Result<Vec<Asset>>;
    fn get_by_serial(&self, serial_number: &str) -> Result<Option<Asset>>;
    fn list_attachments(&self, kind: AttachmentKind, asset_id: i32) -> Result<Vec<Attachment>>;
    fn update_location(&self, asset_id: i32, location: &str) -> Result<Asset>;
}
