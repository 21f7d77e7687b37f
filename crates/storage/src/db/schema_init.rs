//! Idempotent creation of the local asset tables.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use log::debug;

use asset_sync_core::errors::Result;

use crate::errors::IntoCore;

/// Tables owned by the local store.
pub const TABLES: [&str; 3] = ["assets", "asset_images", "asset_bills"];

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS assets (
        id INTEGER PRIMARY KEY,
        model TEXT,
        serial_number TEXT NOT NULL UNIQUE,
        company TEXT,
        location TEXT,
        purchase_date TEXT,
        status TEXT,
        last_sync TEXT
    );
    CREATE TABLE IF NOT EXISTS asset_images (
        id INTEGER PRIMARY KEY,
        asset_id INTEGER NOT NULL,
        image_name TEXT,
        image_data BLOB,
        last_sync TEXT,
        FOREIGN KEY (asset_id) REFERENCES assets(id) ON DELETE CASCADE
    );
    CREATE TABLE IF NOT EXISTS asset_bills (
        id INTEGER PRIMARY KEY,
        asset_id INTEGER NOT NULL,
        bill_name TEXT,
        bill_data BLOB,
        last_sync TEXT,
        FOREIGN KEY (asset_id) REFERENCES assets(id) ON DELETE CASCADE
    );
";

/// Creates the asset, image and bill tables when absent.
///
/// Existing tables are left as they are; no attempt is made to migrate a
/// table whose shape has drifted.
pub fn ensure_schema(conn: &mut SqliteConnection) -> Result<()> {
    debug!("Ensuring local schema ({})", TABLES.join(", "));
    conn.batch_execute(CREATE_TABLES).into_core()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::establish_connection;
    use diesel::sql_types::Text;
    use diesel::prelude::*;
    use tempfile::tempdir;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    fn table_names(conn: &mut SqliteConnection) -> Vec<String> {
        diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .load::<TableName>(conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect()
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.db").to_string_lossy().to_string();
        let mut conn = establish_connection(&path).unwrap();

        for _ in 0..3 {
            ensure_schema(&mut conn).unwrap();
        }

        assert_eq!(table_names(&mut conn), vec!["asset_bills", "asset_images", "assets"]);
    }

    #[test]
    fn test_ensure_schema_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.db").to_string_lossy().to_string();
        let mut conn = establish_connection(&path).unwrap();
        ensure_schema(&mut conn).unwrap();
        diesel::sql_query("INSERT INTO assets (id, serial_number) VALUES (1, 'SN-1')")
            .execute(&mut conn)
            .unwrap();

        ensure_schema(&mut conn).unwrap();

        let count: i64 = crate::schema::assets::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_deleting_asset_cascades_to_attachments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.db").to_string_lossy().to_string();
        let mut conn = establish_connection(&path).unwrap();
        ensure_schema(&mut conn).unwrap();
        conn.batch_execute(
            "INSERT INTO assets (id, serial_number) VALUES (1, 'SN-1');
             INSERT INTO asset_images (id, asset_id, image_name) VALUES (10, 1, 'front.jpg');
             INSERT INTO asset_bills (id, asset_id, bill_name) VALUES (20, 1, 'invoice.pdf');
             DELETE FROM assets WHERE id = 1;",
        )
        .unwrap();

        let images: i64 = crate::schema::asset_images::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        let bills: i64 = crate::schema::asset_bills::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!((images, bills), (0, 0));
    }
}
