//! Database models for assets and their attachments.

use diesel::prelude::*;

use asset_sync_core::assets::{Asset, Attachment, NewAsset};

/// Full local asset row, `last_sync` included.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::assets)]
pub struct AssetDB {
    pub id: i32,
    pub model: Option<String>,
    pub serial_number: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<String>,
    pub status: Option<String>,
    pub last_sync: Option<String>,
}

/// Asset row as the reconcilers read and insert it, on either store.
///
/// Leaves `last_sync` out so the server tables are never required to carry
/// that column. Local writes add it separately.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::assets)]
pub struct SyncAssetDB {
    pub id: i32,
    pub model: Option<String>,
    pub serial_number: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<String>,
    pub status: Option<String>,
}

/// Asset row for a local save, where SQLite assigns the id.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
pub struct NewAssetDB {
    pub model: Option<String>,
    pub serial_number: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<String>,
    pub status: Option<String>,
    pub last_sync: Option<String>,
}

/// Attribute overwrite for an existing asset. `None` writes NULL; serial
/// number and `last_sync` are not part of it.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(treat_none_as_null = true)]
pub struct AssetChangesetDB {
    pub model: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<String>,
    pub status: Option<String>,
}

impl NewAssetDB {
    /// Row for a validated local save, stamped with `last_sync`.
    pub fn from_new_asset(new_asset: &NewAsset, last_sync: &str) -> Self {
        Self {
            model: Some(new_asset.model.clone()),
            serial_number: new_asset.serial_number.clone(),
            company: Some(new_asset.company.clone()),
            location: Some(new_asset.location.clone()),
            purchase_date: new_asset.purchase_date_text(),
            status: Some(new_asset.status.as_str().to_string()),
            last_sync: Some(last_sync.to_string()),
        }
    }
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Self {
            id: db.id,
            model: db.model,
            serial_number: db.serial_number,
            company: db.company,
            location: db.location,
            purchase_date: db.purchase_date,
            status: db.status,
            last_sync: db.last_sync,
        }
    }
}

impl From<SyncAssetDB> for Asset {
    fn from(db: SyncAssetDB) -> Self {
        Self {
            id: db.id,
            model: db.model,
            serial_number: db.serial_number,
            company: db.company,
            location: db.location,
            purchase_date: db.purchase_date,
            status: db.status,
            last_sync: None,
        }
    }
}

impl From<&Asset> for SyncAssetDB {
    fn from(domain: &Asset) -> Self {
        Self {
            id: domain.id,
            model: domain.model.clone(),
            serial_number: domain.serial_number.clone(),
            company: domain.company.clone(),
            location: domain.location.clone(),
            purchase_date: domain.purchase_date.clone(),
            status: domain.status.clone(),
        }
    }
}

impl From<&Asset> for AssetChangesetDB {
    fn from(domain: &Asset) -> Self {
        Self {
            model: domain.model.clone(),
            company: domain.company.clone(),
            location: domain.location.clone(),
            purchase_date: domain.purchase_date.clone(),
            status: domain.status.clone(),
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::asset_images)]
pub struct AssetImageDB {
    pub id: i32,
    pub asset_id: i32,
    pub image_name: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub last_sync: Option<String>,
}

/// Image row without `last_sync`, see [`SyncAssetDB`].
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::asset_images)]
pub struct SyncImageDB {
    pub id: i32,
    pub asset_id: i32,
    pub image_name: Option<String>,
    pub image_data: Option<Vec<u8>>,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_images)]
#[diesel(treat_none_as_null = true)]
pub struct AssetImageChangesetDB {
    pub image_name: Option<String>,
    pub image_data: Option<Vec<u8>>,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::asset_bills)]
pub struct AssetBillDB {
    pub id: i32,
    pub asset_id: i32,
    pub bill_name: Option<String>,
    pub bill_data: Option<Vec<u8>>,
    pub last_sync: Option<String>,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::asset_bills)]
pub struct SyncBillDB {
    pub id: i32,
    pub asset_id: i32,
    pub bill_name: Option<String>,
    pub bill_data: Option<Vec<u8>>,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_bills)]
#[diesel(treat_none_as_null = true)]
pub struct AssetBillChangesetDB {
    pub bill_name: Option<String>,
    pub bill_data: Option<Vec<u8>>,
}

impl From<AssetImageDB> for Attachment {
    fn from(db: AssetImageDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            name: db.image_name,
            data: db.image_data,
            last_sync: db.last_sync,
        }
    }
}

impl From<SyncImageDB> for Attachment {
    fn from(db: SyncImageDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            name: db.image_name,
            data: db.image_data,
            last_sync: None,
        }
    }
}

impl From<&Attachment> for SyncImageDB {
    fn from(domain: &Attachment) -> Self {
        Self {
            id: domain.id,
            asset_id: domain.asset_id,
            image_name: domain.name.clone(),
            image_data: domain.data.clone(),
        }
    }
}

impl From<&Attachment> for AssetImageChangesetDB {
    fn from(domain: &Attachment) -> Self {
        Self {
            image_name: domain.name.clone(),
            image_data: domain.data.clone(),
        }
    }
}

impl From<AssetBillDB> for Attachment {
    fn from(db: AssetBillDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            name: db.bill_name,
            data: db.bill_data,
            last_sync: db.last_sync,
        }
    }
}

impl From<SyncBillDB> for Attachment {
    fn from(db: SyncBillDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            name: db.bill_name,
            data: db.bill_data,
            last_sync: None,
        }
    }
}

impl From<&Attachment> for SyncBillDB {
    fn from(domain: &Attachment) -> Self {
        Self {
            id: domain.id,
            asset_id: domain.asset_id,
            bill_name: domain.name.clone(),
            bill_data: domain.data.clone(),
        }
    }
}

impl From<&Attachment> for AssetBillChangesetDB {
    fn from(domain: &Attachment) -> Self {
        Self {
            bill_name: domain.name.clone(),
            bill_data: domain.data.clone(),
        }
    }
}
