//! In-memory [`SyncStore`] used by the reconciler unit tests.
//!
//! Enforces the same constraints as the real schema: unique asset ids and
//! serial numbers, unique attachment ids per table, and attachments must
//! reference an existing asset.

use std::collections::BTreeMap;

use super::sync_traits::SyncStore;
use crate::assets::{Asset, Attachment, AttachmentKind};
use crate::errors::{DatabaseError, Error, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct MemoryStore {
    assets: BTreeMap<i32, Asset>,
    images: BTreeMap<i32, Attachment>,
    bills: BTreeMap<i32, Attachment>,
    /// Simulates an unreachable store.
    pub fail_reads: bool,
}

impl MemoryStore {
    pub fn asset(id: i32, serial: &str) -> Asset {
        Asset {
            id,
            model: Some("Model".to_string()),
            serial_number: serial.to_string(),
            company: Some("Company".to_string()),
            location: Some("Office".to_string()),
            purchase_date: Some("2024-01-01".to_string()),
            status: Some("Available".to_string()),
            last_sync: None,
        }
    }

    pub fn attachment(id: i32, asset_id: i32, name: &str) -> Attachment {
        Attachment {
            id,
            asset_id,
            name: Some(name.to_string()),
            data: Some(name.as_bytes().to_vec()),
            last_sync: None,
        }
    }

    pub fn seed_asset(&mut self, asset: Asset) {
        self.insert_asset(&asset).expect("seed asset");
    }

    pub fn seed_attachment(&mut self, kind: AttachmentKind, attachment: Attachment) {
        self.insert_attachment(kind, &attachment)
            .expect("seed attachment");
    }

    pub fn asset_by_serial(&self, serial: &str) -> Option<&Asset> {
        self.assets.values().find(|a| a.serial_number == serial)
    }

    pub fn attachments(&self, kind: AttachmentKind) -> Vec<Attachment> {
        self.table(kind).values().cloned().collect()
    }

    fn table(&self, kind: AttachmentKind) -> &BTreeMap<i32, Attachment> {
        match kind {
            AttachmentKind::Image => &self.images,
            AttachmentKind::Bill => &self.bills,
        }
    }

    fn table_mut(&mut self, kind: AttachmentKind) -> &mut BTreeMap<i32, Attachment> {
        match kind {
            AttachmentKind::Image => &mut self.images,
            AttachmentKind::Bill => &mut self.bills,
        }
    }

    fn check_reachable(&self) -> Result<()> {
        if self.fail_reads {
            return Err(DatabaseError::ConnectionFailed("store unreachable".to_string()).into());
        }
        Ok(())
    }
}

impl SyncStore for MemoryStore {
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn list_assets(&mut self) -> Result<Vec<Asset>> {
        self.check_reachable()?;
        Ok(self.assets.values().cloned().collect())
    }

    fn find_asset_id_by_serial(&mut self, serial_number: &str) -> Result<Option<i32>> {
        self.check_reachable()?;
        Ok(self.asset_by_serial(serial_number).map(|a| a.id))
    }

    fn insert_asset(&mut self, asset: &Asset) -> Result<()> {
        if self.assets.contains_key(&asset.id) || self.asset_by_serial(&asset.serial_number).is_some() {
            return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                "asset {} / {}",
                asset.id, asset.serial_number
            ))));
        }
        self.assets.insert(asset.id, asset.clone());
        Ok(())
    }

    fn update_asset(&mut self, asset: &Asset) -> Result<()> {
        if let Some(current) = self.assets.get_mut(&asset.id) {
            let last_sync = asset.last_sync.clone().or_else(|| current.last_sync.clone());
            *current = Asset {
                serial_number: current.serial_number.clone(),
                last_sync,
                ..asset.clone()
            };
        }
        Ok(())
    }

    fn list_attachments(&mut self, kind: AttachmentKind, asset_id: i32) -> Result<Vec<Attachment>> {
        self.check_reachable()?;
        Ok(self
            .table(kind)
            .values()
            .filter(|a| a.asset_id == asset_id)
            .cloned()
            .collect())
    }

    fn insert_attachment(&mut self, kind: AttachmentKind, attachment: &Attachment) -> Result<()> {
        if !self.assets.contains_key(&attachment.asset_id) {
            return Err(Error::Database(DatabaseError::ForeignKeyViolation(format!(
                "{} {} references missing asset {}",
                kind, attachment.id, attachment.asset_id
            ))));
        }
        let table = self.table_mut(kind);
        if table.contains_key(&attachment.id) {
            return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                "{} {}",
                kind, attachment.id
            ))));
        }
        table.insert(attachment.id, attachment.clone());
        Ok(())
    }

    fn update_attachment(&mut self, kind: AttachmentKind, attachment: &Attachment) -> Result<()> {
        let table = self.table_mut(kind);
        if let Some(current) = table.get_mut(&attachment.id) {
            if current.asset_id == attachment.asset_id {
                current.name = attachment.name.clone();
                current.data = attachment.data.clone();
                if attachment.last_sync.is_some() {
                    current.last_sync = attachment.last_sync.clone();
                }
            }
        }
        Ok(())
    }
}
