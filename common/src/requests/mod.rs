use serde::Deserialize;

/// Body of `POST /sync`: two CSV documents embedded as strings.
///
/// Both fields are optional at the serde level so a missing one is reported
/// as a validation error rather than a generic JSON failure.
#[derive(Debug, Deserialize)]
pub struct SyncPayload {
    pub farmers_csv: Option<String>,
    pub datalog_csv: Option<String>,
}

/// Body of `POST /sms_settings`.
#[derive(Debug, Deserialize)]
pub struct SmsSettingsRequest {
    #[serde(default)]
    pub sms_enabled: Option<bool>,
    #[serde(default)]
    pub message_template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FarmersQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadingsQuery {
    pub farmer_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TriggerSyncQuery {
    pub action: Option<String>,
    pub status: Option<String>,
}
