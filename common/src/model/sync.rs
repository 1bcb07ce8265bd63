use crate::model::settings::DeviceSmsSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a dashboard-originated sync request.
///
/// `Pending` is the only state with outgoing transitions; settled rows are
/// historical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Completed,
    Failed,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Completed => "completed",
            SyncStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SyncStatus::Pending),
            "completed" => Ok(SyncStatus::Completed),
            "failed" => Ok(SyncStatus::Failed),
            other => Err(format!("Unknown sync status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: i64,
    pub requested_at: String,
    pub status: SyncStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSync {
    pub completed_at: Option<String>,
    pub status: SyncStatus,
}

/// What a polling device (or the dashboard) sees of the sync queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub sync_pending: bool,
    pub pending_request: Option<PendingRequest>,
    pub last_sync: Option<LastSync>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequestOutcome {
    /// False when an already pending request was reused.
    pub created: bool,
    pub request_id: i64,
}

/// Server wall-clock time split into calendar fields so the device can set
/// its RTC without parsing a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// Result of one committed bulk sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub farmers_imported: usize,
    pub readings_imported: usize,
    /// Readings already present for the same farmer and timestamp.
    pub readings_skipped: usize,
    /// Lines dropped because they had too few fields or did not parse.
    pub rows_malformed: usize,
    pub sms_settings: DeviceSmsSettings,
    pub server_time: ServerTime,
}
