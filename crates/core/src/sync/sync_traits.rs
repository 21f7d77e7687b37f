use crate::assets::{Asset, Attachment, AttachmentKind};
use crate::errors::Result;

/// A store the reconcilers can read from and write to.
///
/// Implementations own a live connection; reconcilers only ever see this
/// trait, so the same merge logic runs against SQLite, MySQL or an in-memory
/// double.
pub trait SyncStore {
    /// Runs `f` inside a single transaction on this store.
    ///
    /// The transaction commits only when `f` returns `Ok`. Every other exit,
    /// an `Err` or a panic unwinding out of `f`, rolls it back.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>;

    /// All assets, ordered by id ascending.
    ///
    /// Listings need not report `last_sync`; the reconcilers never read it.
    fn list_assets(&mut self) -> Result<Vec<Asset>>;

    /// Id of the asset carrying `serial_number`, if any.
    fn find_asset_id_by_serial(&mut self, serial_number: &str) -> Result<Option<i32>>;

    /// Inserts `asset` using its own id. `last_sync` is only written when it
    /// is `Some`.
    fn insert_asset(&mut self, asset: &Asset) -> Result<()>;

    /// Overwrites the attributes of the asset with `asset.id`.
    ///
    /// Every attribute is written, NULLs included. `last_sync` is only written
    /// when it is `Some`.
    fn update_asset(&mut self, asset: &Asset) -> Result<()>;

    /// Attachments of `kind` owned by `asset_id`, ordered by id ascending.
    fn list_attachments(&mut self, kind: AttachmentKind, asset_id: i32) -> Result<Vec<Attachment>>;

    /// Inserts `attachment` using its own id. `last_sync` is only written
    /// when it is `Some`.
    fn insert_attachment(&mut self, kind: AttachmentKind, attachment: &Attachment) -> Result<()>;

    /// Overwrites name and payload of the attachment matching both
    /// `attachment.id` and `attachment.asset_id`. `last_sync` is only written
    /// when it is `Some`.
    fn update_attachment(&mut self, kind: AttachmentKind, attachment: &Attachment) -> Result<()>;
}
