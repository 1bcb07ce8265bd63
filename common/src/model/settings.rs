use serde::{Deserialize, Serialize};

/// Tokens a device knows how to substitute into the SMS template.
pub const PLACEHOLDER_TOKENS: [&str; 9] = [
    "farmer_id",
    "humidity",
    "temperature",
    "ph",
    "ec",
    "nitrogen",
    "phosphorus",
    "potassium",
    "timestamp",
];

pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Farm Report for ID:{farmer_id}\n\
Moisture:{humidity}%\n\
Temp:{temperature}C\n\
pH:{ph}\n\
EC:{ec}\n\
N:{nitrogen} P:{phosphorus} K:{potassium}\n\
Date:{timestamp}";

/// The single SMS configuration row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsSettings {
    pub sms_enabled: bool,
    pub message_template: String,
    pub updated_at: String,
}

/// The compact settings shape the device firmware reads from a sync
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSmsSettings {
    pub enabled: bool,
    pub template: String,
}

impl From<SmsSettings> for DeviceSmsSettings {
    fn from(settings: SmsSettings) -> Self {
        Self {
            enabled: settings.sms_enabled,
            template: settings.message_template,
        }
    }
}
