use cadence::prelude::{Coordinate, Station};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub capacity: Option<u32>,
}

impl StationDto {
    pub fn from(station: &Station) -> Self {
        let id = station.id.to_string();
        let name = station.name.to_string();
        let coordinate = station.coordinate;
        Self {
            id,
            name,
            coordinate,
            capacity: station.capacity,
        }
    }
}
