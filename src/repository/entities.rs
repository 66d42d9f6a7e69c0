use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    feed::StationRecord,
    repository::Direction,
    shared::{Identifiable, geo::Coordinate, time::Minute},
};

/// A single bike-share ride.
///
/// Trips are immutable once ingested; the minutes they are bucketed under are
/// derived from the timestamps on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// The internal index used by the minute buckets.
    pub index: u32,
    pub start_station_id: Arc<str>,
    pub end_station_id: Arc<str>,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn new(
        start_station_id: impl Into<Arc<str>>,
        end_station_id: impl Into<Arc<str>>,
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
    ) -> Self {
        Self {
            index: u32::MAX,
            start_station_id: start_station_id.into(),
            end_station_id: end_station_id.into(),
            started_at,
            ended_at,
        }
    }

    pub fn start_minute(&self) -> Minute {
        Minute::from_datetime(&self.started_at)
    }

    pub fn end_minute(&self) -> Minute {
        Minute::from_datetime(&self.ended_at)
    }

    /// The minute this trip is bucketed under for the given direction.
    pub fn minute(&self, direction: Direction) -> Minute {
        match direction {
            Direction::Departures => self.start_minute(),
            Direction::Arrivals => self.end_minute(),
        }
    }

    /// The station this trip is counted against for the given direction.
    pub fn station_id(&self, direction: Direction) -> &str {
        match direction {
            Direction::Departures => &self.start_station_id,
            Direction::Arrivals => &self.end_station_id,
        }
    }
}

/// A dock station as published in the station feed.
#[derive(Debug, Default, Clone)]
pub struct Station {
    /// Position of the station in the feed.
    pub index: u32,
    /// The short name, the identifier trips refer to.
    pub id: Arc<str>,
    /// The GBFS `station_id`, which trip exports do not use.
    pub station_id: Option<Arc<str>>,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
    pub capacity: Option<u32>,
}

impl Identifiable for Station {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl From<StationRecord> for Station {
    fn from(value: StationRecord) -> Self {
        Self {
            index: u32::MAX,
            id: value.short_name.into(),
            station_id: value.station_id.map(|val| val.into()),
            name: value.name.into(),
            coordinate: Coordinate {
                latitude: value.lat,
                longitude: value.lon,
            },
            capacity: value.capacity,
        }
    }
}
