//! `SyncStore` adapters over Diesel connections.
//!
//! The query code is identical for every backend, so it is written once in
//! [`impl_sync_store!`] and stamped onto each adapter type. An adapter only
//! has to expose its connection through a `connection(&mut self)` method.
//!
//! Reads and inserts go through the `Sync*DB` rows, which leave `last_sync`
//! out. The column is only named when a stamp is written, which pull does on
//! the local store and push never does.

use std::panic::{self, AssertUnwindSafe};

use diesel::connection::{Connection, TransactionManager};
use log::warn;

use asset_sync_core::errors::Result;

use crate::errors::StorageError;

/// Runs `f` between BEGIN and COMMIT on the store's connection.
///
/// Commits only if `f` returns `Ok`. An `Err` from `f` or a panic unwinding
/// out of `f` rolls the transaction back before returning (or resuming the
/// panic). A failed COMMIT is rolled back by Diesel's transaction manager.
pub(crate) fn run_in_transaction<S, C, T, F>(
    store: &mut S,
    connection: fn(&mut S) -> &mut C,
    f: F,
) -> Result<T>
where
    C: Connection,
    F: FnOnce(&mut S) -> Result<T>,
{
    <C::TransactionManager as TransactionManager<C>>::begin_transaction(connection(store))
        .map_err(StorageError::TransactionFailed)?;

    match panic::catch_unwind(AssertUnwindSafe(|| f(&mut *store))) {
        Ok(Ok(value)) => match <C::TransactionManager as TransactionManager<C>>::commit_transaction(
            connection(store),
        ) {
            Ok(()) => Ok(value),
            Err(e) => Err(StorageError::TransactionFailed(e).into()),
        },
        Ok(Err(e)) => {
            rollback(connection(store));
            Err(e)
        }
        Err(payload) => {
            rollback(connection(store));
            panic::resume_unwind(payload)
        }
    }
}

fn rollback<C: Connection>(conn: &mut C) {
    if let Err(e) = <C::TransactionManager as TransactionManager<C>>::rollback_transaction(conn) {
        warn!("Rollback failed: {}", e);
    }
}

/// Implements `asset_sync_core::sync::SyncStore` for an adapter type with a
/// `fn connection(&mut self) -> &mut impl diesel::Connection` method.
macro_rules! impl_sync_store {
    ($store:ty) => {
        impl asset_sync_core::sync::SyncStore for $store {
            fn transaction<T, F>(&mut self, f: F) -> asset_sync_core::Result<T>
            where
                F: FnOnce(&mut Self) -> asset_sync_core::Result<T>,
            {
                $crate::store::run_in_transaction(self, Self::connection, f)
            }

            fn list_assets(&mut self) -> asset_sync_core::Result<Vec<asset_sync_core::Asset>> {
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::assets;

                let rows = assets::table
                    .select($crate::assets::SyncAssetDB::as_select())
                    .order(assets::id.asc())
                    .load::<$crate::assets::SyncAssetDB>(self.connection())
                    .into_core()?;
                Ok(rows.into_iter().map(Into::into).collect())
            }

            fn find_asset_id_by_serial(
                &mut self,
                serial_number: &str,
            ) -> asset_sync_core::Result<Option<i32>> {
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::assets;

                assets::table
                    .filter(assets::serial_number.eq(serial_number))
                    .select(assets::id)
                    .first::<i32>(self.connection())
                    .optional()
                    .into_core()
            }

            fn insert_asset(&mut self, asset: &asset_sync_core::Asset) -> asset_sync_core::Result<()> {
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::assets;

                let row = $crate::assets::SyncAssetDB::from(asset);
                let insert = diesel::insert_into(assets::table);
                match &asset.last_sync {
                    Some(stamp) => insert
                        .values((row, assets::last_sync.eq(stamp)))
                        .execute(self.connection()),
                    None => insert.values(row).execute(self.connection()),
                }
                .into_core()?;
                Ok(())
            }

            fn update_asset(&mut self, asset: &asset_sync_core::Asset) -> asset_sync_core::Result<()> {
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::assets;

                let changes = $crate::assets::AssetChangesetDB::from(asset);
                let target = assets::table.find(asset.id);
                match &asset.last_sync {
                    Some(stamp) => diesel::update(target)
                        .set((changes, assets::last_sync.eq(stamp)))
                        .execute(self.connection()),
                    None => diesel::update(target).set(changes).execute(self.connection()),
                }
                .into_core()?;
                Ok(())
            }

            fn list_attachments(
                &mut self,
                kind: asset_sync_core::AttachmentKind,
                asset_id: i32,
            ) -> asset_sync_core::Result<Vec<asset_sync_core::Attachment>> {
                use asset_sync_core::AttachmentKind;
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::{asset_bills, asset_images};

                match kind {
                    AttachmentKind::Image => {
                        let rows = asset_images::table
                            .filter(asset_images::asset_id.eq(asset_id))
                            .select($crate::assets::SyncImageDB::as_select())
                            .order(asset_images::id.asc())
                            .load::<$crate::assets::SyncImageDB>(self.connection())
                            .into_core()?;
                        Ok(rows.into_iter().map(Into::into).collect())
                    }
                    AttachmentKind::Bill => {
                        let rows = asset_bills::table
                            .filter(asset_bills::asset_id.eq(asset_id))
                            .select($crate::assets::SyncBillDB::as_select())
                            .order(asset_bills::id.asc())
                            .load::<$crate::assets::SyncBillDB>(self.connection())
                            .into_core()?;
                        Ok(rows.into_iter().map(Into::into).collect())
                    }
                }
            }

            fn insert_attachment(
                &mut self,
                kind: asset_sync_core::AttachmentKind,
                attachment: &asset_sync_core::Attachment,
            ) -> asset_sync_core::Result<()> {
                use asset_sync_core::AttachmentKind;
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::{asset_bills, asset_images};

                match kind {
                    AttachmentKind::Image => {
                        let row = $crate::assets::SyncImageDB::from(attachment);
                        let insert = diesel::insert_into(asset_images::table);
                        match &attachment.last_sync {
                            Some(stamp) => insert
                                .values((row, asset_images::last_sync.eq(stamp)))
                                .execute(self.connection()),
                            None => insert.values(row).execute(self.connection()),
                        }
                    }
                    AttachmentKind::Bill => {
                        let row = $crate::assets::SyncBillDB::from(attachment);
                        let insert = diesel::insert_into(asset_bills::table);
                        match &attachment.last_sync {
                            Some(stamp) => insert
                                .values((row, asset_bills::last_sync.eq(stamp)))
                                .execute(self.connection()),
                            None => insert.values(row).execute(self.connection()),
                        }
                    }
                }
                .into_core()?;
                Ok(())
            }

            fn update_attachment(
                &mut self,
                kind: asset_sync_core::AttachmentKind,
                attachment: &asset_sync_core::Attachment,
            ) -> asset_sync_core::Result<()> {
                use asset_sync_core::AttachmentKind;
                use diesel::prelude::*;
                use $crate::errors::IntoCore;
                use $crate::schema::{asset_bills, asset_images};

                match kind {
                    AttachmentKind::Image => {
                        let target = asset_images::table
                            .filter(asset_images::id.eq(attachment.id))
                            .filter(asset_images::asset_id.eq(attachment.asset_id));
                        let changes = $crate::assets::AssetImageChangesetDB::from(attachment);
                        match &attachment.last_sync {
                            Some(stamp) => diesel::update(target)
                                .set((changes, asset_images::last_sync.eq(stamp)))
                                .execute(self.connection()),
                            None => diesel::update(target).set(changes).execute(self.connection()),
                        }
                    }
                    AttachmentKind::Bill => {
                        let target = asset_bills::table
                            .filter(asset_bills::id.eq(attachment.id))
                            .filter(asset_bills::asset_id.eq(attachment.asset_id));
                        let changes = $crate::assets::AssetBillChangesetDB::from(attachment);
                        match &attachment.last_sync {
                            Some(stamp) => diesel::update(target)
                                .set((changes, asset_bills::last_sync.eq(stamp)))
                                .execute(self.connection()),
                            None => diesel::update(target).set(changes).execute(self.connection()),
                        }
                    }
                }
                .into_core()?;
                Ok(())
            }
        }
    };
}

mod sqlite;
pub use sqlite::SqliteStore;

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "mysql")]
pub use mysql::{database_url, MysqlConnector, MysqlStore};
