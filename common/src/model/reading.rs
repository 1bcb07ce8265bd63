use serde::{Deserialize, Serialize};

/// A soil reading joined with the owning farmer's phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    pub id: i64,
    pub farmer_id: String,
    /// Device-local time of the measurement, kept verbatim.
    pub reading_timestamp: String,
    pub humidity: f64,
    pub temperature: f64,
    pub ec: f64,
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub synced_at: String,
    pub phone_number: String,
}

/// Aggregates over a filtered reading set. Averages are `None` when the set
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingStats {
    pub total_readings: i64,
    pub unique_farmers: i64,
    pub avg_humidity: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub avg_ec: Option<f64>,
    pub avg_ph: Option<f64>,
    pub avg_nitrogen: Option<f64>,
    pub avg_phosphorus: Option<f64>,
    pub avg_potassium: Option<f64>,
}

/// One page of readings plus the statistics of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPage {
    pub total: i64,
    pub stats: ReadingStats,
    pub readings: Vec<SoilReading>,
}
