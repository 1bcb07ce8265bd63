use serde::{Deserialize, Serialize};

/// A farmer registered by a field device.
///
/// Rows are only ever created or updated through a device sync. `created_at`
/// is whatever the device reported the first time the farmer was seen and is
/// never overwritten; `synced_at` is stamped by the server on every sync that
/// mentions the farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    pub farmer_id: String,
    pub phone_number: String,
    pub created_at: String,
    pub synced_at: String,
}

/// A farmer together with aggregates over their soil readings, as listed on
/// the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerSummary {
    #[serde(flatten)]
    pub farmer: Farmer,
    pub reading_count: i64,
    /// Greatest `reading_timestamp` among the farmer's readings, if any.
    pub last_reading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerListing {
    /// Number of farmers in the registry, regardless of any search filter.
    pub total: i64,
    pub farmers: Vec<FarmerSummary>,
}
