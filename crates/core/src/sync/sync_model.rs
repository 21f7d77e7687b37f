//! Results reported back to whoever started a sync.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of one sync invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    /// Server to local.
    Pull,
    /// Local to server.
    Push,
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::Pull => f.write_str("from server"),
            SyncDirection::Push => f.write_str("to server"),
        }
    }
}

/// Row counts written to the destination by a committed sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub direction: SyncDirection,
    pub assets_inserted: usize,
    pub assets_updated: usize,
    pub attachments_inserted: usize,
    pub attachments_updated: usize,
}

impl SyncReport {
    pub fn new(direction: SyncDirection) -> Self {
        Self {
            direction,
            assets_inserted: 0,
            assets_updated: 0,
            attachments_inserted: 0,
            attachments_updated: 0,
        }
    }

    pub fn assets_written(&self) -> usize {
        self.assets_inserted + self.assets_updated
    }

    pub fn attachments_written(&self) -> usize {
        self.attachments_inserted + self.attachments_updated
    }
}

/// Success or failure of a sync, with a message fit for showing to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncOutcome {
    Completed(SyncReport),
    Failed {
        direction: SyncDirection,
        error: String,
    },
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Completed(_))
    }

    pub fn direction(&self) -> SyncDirection {
        match self {
            SyncOutcome::Completed(report) => report.direction,
            SyncOutcome::Failed { direction, .. } => *direction,
        }
    }

    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            SyncOutcome::Completed(report) => Some(report),
            SyncOutcome::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SyncOutcome::Completed(report) => format!("Sync {} completed!", report.direction),
            SyncOutcome::Failed { error, .. } => format!("Sync error: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let done = SyncOutcome::Completed(SyncReport::new(SyncDirection::Pull));
        assert!(done.is_success());
        assert_eq!(done.message(), "Sync from server completed!");

        let failed = SyncOutcome::Failed {
            direction: SyncDirection::Push,
            error: "Access denied".to_string(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.direction(), SyncDirection::Push);
        assert_eq!(failed.message(), "Sync error: Access denied");
    }

    #[test]
    fn test_report_totals() {
        let report = SyncReport {
            direction: SyncDirection::Push,
            assets_inserted: 2,
            assets_updated: 1,
            attachments_inserted: 4,
            attachments_updated: 0,
        };
        assert_eq!(report.assets_written(), 3);
        assert_eq!(report.attachments_written(), 4);
    }
}
