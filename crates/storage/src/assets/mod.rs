//! SQLite storage for assets and their attachments.

mod model;
mod repository;

pub use model::{
    AssetBillChangesetDB, AssetBillDB, AssetChangesetDB, AssetDB, AssetImageChangesetDB,
    AssetImageDB, NewAssetDB, SyncAssetDB, SyncBillDB, SyncImageDB,
};
pub use repository::AssetRepository;
