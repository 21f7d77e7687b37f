//! Asset domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::Error;

/// Format used to store purchase dates as text.
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle status of a tracked asset.
///
/// Stored as free text so that sync mirrors whatever the other store holds;
/// only local saves are restricted to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    #[default]
    Available,
    Deployed,
    #[serde(rename = "Disposed/Sold")]
    Disposed,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "Available",
            AssetStatus::Deployed => "Deployed",
            AssetStatus::Disposed => "Disposed/Sold",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Available" => Ok(AssetStatus::Available),
            "Deployed" => Ok(AssetStatus::Deployed),
            "Disposed/Sold" | "Disposed" | "Sold" => Ok(AssetStatus::Disposed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown asset status '{}'",
                other
            )))),
        }
    }
}

/// A tracked asset as stored in one store.
///
/// `id` is local to the store it was read from. `serial_number` is the
/// business key that identifies the same physical asset across stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i32,
    pub model: Option<String>,
    pub serial_number: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<String>,
    pub status: Option<String>,
    pub last_sync: Option<String>,
}

/// The two attachment collections owned by an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Bill,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 2] = [AttachmentKind::Image, AttachmentKind::Bill];
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentKind::Image => f.write_str("image"),
            AttachmentKind::Bill => f.write_str("bill"),
        }
    }
}

/// A named binary blob owned by an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i32,
    pub asset_id: i32,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub data: Option<Vec<u8>>,
    pub last_sync: Option<String>,
}

/// A file the user attached while saving an asset locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub name: String,
    pub data: Vec<u8>,
}

impl AttachmentUpload {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Input for saving an asset locally.
///
/// Saving upserts by serial number. Attachments are optional: `None` leaves the
/// asset's existing attachments of that kind untouched.
#[derive(Debug, Clone, Default)]
pub struct NewAsset {
    pub model: String,
    pub serial_number: String,
    pub company: String,
    pub location: String,
    pub purchase_date: Option<NaiveDate>,
    pub status: AssetStatus,
    pub image: Option<AttachmentUpload>,
    pub bill: Option<AttachmentUpload>,
}

impl NewAsset {
    /// Validates that every field the asset form requires is filled in.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("model", &self.model),
            ("serial_number", &self.serial_number),
            ("company", &self.company),
            ("location", &self.location),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    field.to_string(),
                )));
            }
        }
        if self.purchase_date.is_none() {
            return Err(Error::Validation(ValidationError::MissingField(
                "purchase_date".to_string(),
            )));
        }
        for upload in [&self.image, &self.bill].into_iter().flatten() {
            if upload.name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Attachment name cannot be empty".to_string(),
                )));
            }
        }
        Ok(())
    }

    /// Purchase date rendered for storage.
    pub fn purchase_date_text(&self) -> Option<String> {
        self.purchase_date
            .map(|d| d.format(PURCHASE_DATE_FORMAT).to_string())
    }

    /// Returns the upload for the given attachment kind, if one was supplied.
    pub fn upload(&self, kind: AttachmentKind) -> Option<&AttachmentUpload> {
        match kind {
            AttachmentKind::Image => self.image.as_ref(),
            AttachmentKind::Bill => self.bill.as_ref(),
        }
    }
}
