use cadence::prelude::{Identifiable, Minute, StationTraffic, TrafficSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationTrafficDto {
    pub id: String,
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
    pub departure_ratio: Option<f64>,
}

impl StationTrafficDto {
    pub fn from<S: Identifiable>(entry: &StationTraffic<'_, S>) -> Self {
        Self {
            id: entry.id().to_string(),
            departures: entry.traffic.departures,
            arrivals: entry.traffic.arrivals,
            total_traffic: entry.traffic.total_traffic,
            departure_ratio: entry.traffic.departure_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficDto {
    /// The slider value the counts were computed for, -1 for any time.
    pub time: i32,
    /// Display label of the time, none for any time.
    pub label: Option<String>,
    pub summary: TrafficSummary,
    pub stations: Vec<StationTrafficDto>,
}

impl TrafficDto {
    pub fn from<S: Identifiable>(time: i32, traffic: &[StationTraffic<'_, S>]) -> Self {
        let label = u16::try_from(time)
            .ok()
            .and_then(Minute::new)
            .map(|minute| minute.to_short_string());
        Self {
            time,
            label,
            summary: TrafficSummary::from_traffic(traffic),
            stations: traffic.iter().map(StationTrafficDto::from).collect(),
        }
    }
}
