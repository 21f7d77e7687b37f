use std::sync::Arc;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info};

use asset_sync_core::assets::{
    Asset, AssetRepositoryTrait, Attachment, AttachmentKind, AttachmentUpload, NewAsset,
};
use asset_sync_core::errors::{DatabaseError, Error, Result};
use asset_sync_core::utils::sync_timestamp;

use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{asset_bills, asset_images, assets};

use super::model::{AssetBillDB, AssetDB, AssetImageDB, NewAssetDB};

/// Repository for single-record edits to the local asset tables.
pub struct AssetRepository {
    pool: Arc<DbPool>,
}

impl AssetRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Writes one upload, replacing the payload of an attachment with the same
/// name on the same asset or inserting a new one.
fn upsert_upload(
    conn: &mut SqliteConnection,
    kind: AttachmentKind,
    asset_id: i32,
    upload: &AttachmentUpload,
    stamp: &str,
) -> std::result::Result<(), StorageError> {
    match kind {
        AttachmentKind::Image => {
            let existing = asset_images::table
                .filter(asset_images::asset_id.eq(asset_id))
                .filter(asset_images::image_name.eq(&upload.name))
                .select(asset_images::id)
                .first::<i32>(conn)
                .optional()?;
            match existing {
                Some(image_id) => {
                    diesel::update(asset_images::table.find(image_id))
                        .set((
                            asset_images::image_data.eq(&upload.data),
                            asset_images::last_sync.eq(stamp),
                        ))
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(asset_images::table)
                        .values((
                            asset_images::asset_id.eq(asset_id),
                            asset_images::image_name.eq(&upload.name),
                            asset_images::image_data.eq(&upload.data),
                            asset_images::last_sync.eq(stamp),
                        ))
                        .execute(conn)?;
                }
            }
        }
        AttachmentKind::Bill => {
            let existing = asset_bills::table
                .filter(asset_bills::asset_id.eq(asset_id))
                .filter(asset_bills::bill_name.eq(&upload.name))
                .select(asset_bills::id)
                .first::<i32>(conn)
                .optional()?;
            match existing {
                Some(bill_id) => {
                    diesel::update(asset_bills::table.find(bill_id))
                        .set((
                            asset_bills::bill_data.eq(&upload.data),
                            asset_bills::last_sync.eq(stamp),
                        ))
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(asset_bills::table)
                        .values((
                            asset_bills::asset_id.eq(asset_id),
                            asset_bills::bill_name.eq(&upload.name),
                            asset_bills::bill_data.eq(&upload.data),
                            asset_bills::last_sync.eq(stamp),
                        ))
                        .execute(conn)?;
                }
            }
        }
    }
    Ok(())
}

impl AssetRepositoryTrait for AssetRepository {
    fn save(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;

        let mut conn = get_connection(&self.pool)?;
        let stamp = sync_timestamp();
        let purchase_date = new_asset.purchase_date_text();
        let status = new_asset.status.as_str().to_string();

        let saved = conn.immediate_transaction::<_, StorageError, _>(|conn| {
            let existing_id = assets::table
                .filter(assets::serial_number.eq(&new_asset.serial_number))
                .select(assets::id)
                .first::<i32>(conn)
                .optional()?;

            let asset_id = match existing_id {
                Some(asset_id) => {
                    diesel::update(assets::table.find(asset_id))
                        .set((
                            assets::model.eq(&new_asset.model),
                            assets::company.eq(&new_asset.company),
                            assets::location.eq(&new_asset.location),
                            assets::purchase_date.eq(&purchase_date),
                            assets::status.eq(&status),
                            assets::last_sync.eq(&stamp),
                        ))
                        .execute(conn)?;
                    asset_id
                }
                None => {
                    diesel::insert_into(assets::table)
                        .values(&NewAssetDB::from_new_asset(&new_asset, &stamp))
                        .execute(conn)?;
                    assets::table
                        .filter(assets::serial_number.eq(&new_asset.serial_number))
                        .select(assets::id)
                        .first::<i32>(conn)?
                }
            };

            for kind in AttachmentKind::ALL {
                if let Some(upload) = new_asset.upload(kind) {
                    debug!("Saving {} '{}' for asset {}", kind, upload.name, asset_id);
                    upsert_upload(conn, kind, asset_id, upload, &stamp)?;
                }
            }

            assets::table
                .find(asset_id)
                .select(AssetDB::as_select())
                .first::<AssetDB>(conn)
                .map_err(StorageError::from)
        })?;

        info!("Saved asset {} ({})", saved.serial_number, saved.id);
        Ok(saved.into())
    }

    fn list(&self) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = assets::table
            .select(AssetDB::as_select())
            .order(assets::id.asc())
            .load::<AssetDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Asset::from).collect())
    }

    fn get_by_serial(&self, serial_number: &str) -> Result<Option<Asset>> {
        let mut conn = get_connection(&self.pool)?;

        let row = assets::table
            .filter(assets::serial_number.eq(serial_number))
            .select(AssetDB::as_select())
            .first::<AssetDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Asset::from))
    }

    fn list_attachments(&self, kind: AttachmentKind, asset_id: i32) -> Result<Vec<Attachment>> {
        let mut conn = get_connection(&self.pool)?;

        let attachments = match kind {
            AttachmentKind::Image => asset_images::table
                .filter(asset_images::asset_id.eq(asset_id))
                .select(AssetImageDB::as_select())
                .order(asset_images::id.asc())
                .load::<AssetImageDB>(&mut conn)
                .into_core()?
                .into_iter()
                .map(Attachment::from)
                .collect(),
            AttachmentKind::Bill => asset_bills::table
                .filter(asset_bills::asset_id.eq(asset_id))
                .select(AssetBillDB::as_select())
                .order(asset_bills::id.asc())
                .load::<AssetBillDB>(&mut conn)
                .into_core()?
                .into_iter()
                .map(Attachment::from)
                .collect(),
        };
        Ok(attachments)
    }

    fn update_location(&self, asset_id: i32, location: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        let affected = diesel::update(assets::table.find(asset_id))
            .set(assets::location.eq(location))
            .execute(&mut conn)
            .into_core()?;
        if affected == 0 {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "Asset {} not found",
                asset_id
            ))));
        }

        let row = assets::table
            .find(asset_id)
            .select(AssetDB::as_select())
            .first::<AssetDB>(&mut conn)
            .into_core()?;
        info!("Relocated asset {} to '{}'", asset_id, location);
        Ok(row.into())
    }
}
