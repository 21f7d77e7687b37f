use diesel::sqlite::SqliteConnection;

use asset_sync_core::errors::Result;

use crate::db::{establish_connection, initialize_local_store};

/// Sync adapter over a single SQLite connection.
///
/// Holds a plain connection rather than a pooled one so a whole reconcile runs
/// on one connection from BEGIN to COMMIT.
pub struct SqliteStore {
    conn: SqliteConnection,
}

impl SqliteStore {
    /// Opens the database at `db_path` and makes sure the asset tables exist.
    pub fn open(db_path: &str) -> Result<Self> {
        let mut conn = establish_connection(db_path)?;
        initialize_local_store(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl_sync_store!(SqliteStore);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IntoCore;
    use crate::schema::{asset_bills, assets};
    use asset_sync_core::errors::{DatabaseError, Error};
    use asset_sync_core::sync::SyncStore;
    use asset_sync_core::{Asset, Attachment, AttachmentKind};
    use diesel::connection::SimpleConnection;
    use diesel::prelude::*;
    use tempfile::{tempdir, TempDir};

    fn open_store() -> (TempDir, SqliteStore) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.db").to_string_lossy().to_string();
        let store = SqliteStore::open(&path).unwrap();
        (dir, store)
    }

    fn asset(id: i32, serial: &str) -> Asset {
        Asset {
            id,
            serial_number: serial.to_string(),
            model: Some("ThinkPad T14".to_string()),
            company: Some("Acme".to_string()),
            location: Some("HQ".to_string()),
            purchase_date: Some("2023-04-01".to_string()),
            status: Some("Available".to_string()),
            last_sync: None,
        }
    }

    fn bill(id: i32, asset_id: i32, name: &str) -> Attachment {
        Attachment {
            id,
            asset_id,
            name: Some(name.to_string()),
            data: Some(name.as_bytes().to_vec()),
            last_sync: None,
        }
    }

    fn asset_stamp(store: &mut SqliteStore, id: i32) -> Option<String> {
        assets::table
            .find(id)
            .select(assets::last_sync)
            .first::<Option<String>>(store.connection())
            .unwrap()
    }

    fn bill_stamp(store: &mut SqliteStore, id: i32) -> Option<String> {
        asset_bills::table
            .find(id)
            .select(asset_bills::last_sync)
            .first::<Option<String>>(store.connection())
            .unwrap()
    }

    #[test]
    fn test_insert_and_list_keep_given_ids() {
        let (_dir, mut store) = open_store();
        store.insert_asset(&asset(7, "SN-7")).unwrap();
        store.insert_asset(&asset(3, "SN-3")).unwrap();

        let ids: Vec<i32> = store.list_assets().unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 7]);
        assert_eq!(store.find_asset_id_by_serial("SN-7").unwrap(), Some(7));
        assert_eq!(store.find_asset_id_by_serial("missing").unwrap(), None);
    }

    #[test]
    fn test_update_asset_writes_nulls_and_keeps_stamp_when_absent() {
        let (_dir, mut store) = open_store();
        let mut stamped = asset(1, "SN-1");
        stamped.last_sync = Some("2024-05-01 10:00:00".to_string());
        store.insert_asset(&stamped).unwrap();

        let mut changed = asset(1, "SN-1");
        changed.model = None;
        changed.location = Some("Warehouse".to_string());
        store.update_asset(&changed).unwrap();

        let stored = &store.list_assets().unwrap()[0];
        assert_eq!(stored.model, None);
        assert_eq!(stored.location.as_deref(), Some("Warehouse"));
        assert_eq!(asset_stamp(&mut store, 1).as_deref(), Some("2024-05-01 10:00:00"));
    }

    #[test]
    fn test_listings_and_unstamped_inserts_leave_last_sync_alone() {
        let (_dir, mut store) = open_store();
        let mut stamped = asset(1, "SN-1");
        stamped.last_sync = Some("2024-05-01 10:00:00".to_string());
        store.insert_asset(&stamped).unwrap();
        store.insert_asset(&asset(2, "SN-2")).unwrap();
        store
            .insert_attachment(AttachmentKind::Bill, &bill(10, 2, "invoice.pdf"))
            .unwrap();

        assert!(store.list_assets().unwrap().iter().all(|a| a.last_sync.is_none()));
        assert_eq!(
            store.list_attachments(AttachmentKind::Bill, 2).unwrap()[0].last_sync,
            None
        );
        assert_eq!(asset_stamp(&mut store, 1).as_deref(), Some("2024-05-01 10:00:00"));
        assert_eq!(asset_stamp(&mut store, 2), None);
        assert_eq!(bill_stamp(&mut store, 10), None);
    }

    #[test]
    fn test_update_attachment_requires_matching_owner() {
        let (_dir, mut store) = open_store();
        store.insert_asset(&asset(1, "SN-1")).unwrap();
        store.insert_asset(&asset(2, "SN-2")).unwrap();
        store
            .insert_attachment(AttachmentKind::Bill, &bill(10, 1, "invoice.pdf"))
            .unwrap();

        // Same id, different owner: nothing matches.
        let mut foreign = bill(10, 2, "other.pdf");
        foreign.data = Some(vec![9]);
        store.update_attachment(AttachmentKind::Bill, &foreign).unwrap();

        let bills = store.list_attachments(AttachmentKind::Bill, 1).unwrap();
        assert_eq!(bills[0].name.as_deref(), Some("invoice.pdf"));

        let mut renamed = bill(10, 1, "invoice-v2.pdf");
        renamed.last_sync = Some("2024-05-01 10:00:00".to_string());
        store.update_attachment(AttachmentKind::Bill, &renamed).unwrap();
        let bills = store.list_attachments(AttachmentKind::Bill, 1).unwrap();
        assert_eq!(bills[0].name.as_deref(), Some("invoice-v2.pdf"));
        assert_eq!(bill_stamp(&mut store, 10).as_deref(), Some("2024-05-01 10:00:00"));
        assert!(store.list_attachments(AttachmentKind::Image, 1).unwrap().is_empty());
    }

    #[test]
    fn test_orphan_attachment_is_rejected() {
        let (_dir, mut store) = open_store();
        let err = store
            .insert_attachment(AttachmentKind::Image, &bill(1, 99, "front.jpg"))
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let (_dir, mut store) = open_store();

        let result: asset_sync_core::Result<()> = store.transaction(|tx| {
            tx.insert_asset(&asset(1, "SN-1"))?;
            tx.insert_asset(&asset(1, "SN-dup"))?;
            Ok(())
        });

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));
        assert!(store.list_assets().unwrap().is_empty());
    }

    #[test]
    fn test_transaction_rolls_back_on_panic() {
        let (_dir, mut store) = open_store();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = store.transaction(|tx| -> asset_sync_core::Result<()> {
                tx.insert_asset(&asset(1, "SN-1"))?;
                panic!("interrupted mid-sync");
            });
        }));

        assert!(outcome.is_err());
        assert!(store.list_assets().unwrap().is_empty());
        // The connection is usable again afterwards.
        store
            .transaction(|tx| tx.insert_asset(&asset(2, "SN-2")))
            .unwrap();
        assert_eq!(store.list_assets().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_commit_is_reported_and_leaves_no_open_transaction() {
        let (_dir, mut store) = open_store();

        // With deferred foreign keys the orphan insert succeeds and the
        // violation only surfaces at COMMIT.
        let result: asset_sync_core::Result<()> = store.transaction(|tx| {
            tx.connection()
                .batch_execute("PRAGMA defer_foreign_keys = ON")
                .into_core()?;
            tx.insert_asset(&asset(1, "SN-1"))?;
            tx.insert_attachment(AttachmentKind::Bill, &bill(5, 99, "orphan.pdf"))
        });

        let err = result.unwrap_err();
        assert!(
            matches!(err, Error::Database(DatabaseError::TransactionFailed(_))),
            "unexpected error: {err}"
        );
        assert!(store.list_assets().unwrap().is_empty());
        assert!(store.list_attachments(AttachmentKind::Bill, 99).unwrap().is_empty());

        // The connection is back outside any transaction.
        store
            .transaction(|tx| tx.insert_asset(&asset(2, "SN-2")))
            .unwrap();
        let ids: Vec<i32> = store.list_assets().unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.db").to_string_lossy().to_string();
        let mut store = SqliteStore::open(&path).unwrap();

        store
            .transaction(|tx| {
                tx.insert_asset(&asset(1, "SN-1"))?;
                tx.insert_attachment(AttachmentKind::Bill, &bill(5, 1, "invoice.pdf"))
            })
            .unwrap();
        drop(store);

        let mut reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.list_assets().unwrap().len(), 1);
        assert_eq!(
            reopened
                .list_attachments(AttachmentKind::Bill, 1)
                .unwrap()
                .len(),
            1
        );
    }
}
