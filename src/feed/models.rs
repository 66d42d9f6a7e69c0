use serde::{Deserialize, Deserializer, Serialize, de};

/// One row of a bike-share trip export.
/// Columns that are not listed here (bike type, membership...) are ignored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TripRecord {
    pub started_at: String,
    pub ended_at: String,
    pub start_station_id: String,
    pub end_station_id: String,
}

/// GBFS `station_information` document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StationFeed {
    pub data: StationFeedData,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StationFeedData {
    pub stations: Vec<StationRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StationRecord {
    #[serde(default)]
    pub station_id: Option<String>,
    /// The identifier used by the trip feed.
    pub short_name: String,
    pub name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

// Some station exports quote their coordinates.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => value.trim().parse().map_err(de::Error::custom),
    }
}
