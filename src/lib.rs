//! In-memory traffic engine for bike-share trips.
//!
//! Trips are bucketed once by the minute of the day they started and ended.
//! Per station departure and arrival counts for any rolling time-of-day window
//! are then rebuilt from only the buckets inside that window.
//!
//! ```no_run
//! use cadence::prelude::*;
//!
//! let reader = FeedReader::new()
//!     .trips_from_path("bluebikes-traffic-2024-03.csv")?
//!     .stations_from_path("bluebikes-stations.json")?;
//! let stations = Station::load_feed(&reader)?;
//! let aggregator = Aggregator::new(TripStore::load_feed(&reader)?);
//!
//! let rush_hour = Minute::from_hm(8, 0).unwrap_or_default();
//! for entry in aggregator.compute_station_traffic(&stations, rush_hour.into()) {
//!     println!("{} {:?}", entry.id(), entry.traffic);
//! }
//! # Ok::<(), cadence::feed::Error>(())
//! ```

pub mod feed;
pub mod repository;
pub mod shared;
pub mod traffic;

pub mod prelude {
    pub use crate::feed::{FeedReader, MalformedPolicy};
    pub use crate::repository::{
        Direction, Station, Trip, TripStore, TripStoreBuilder, Window, source::LoadReport,
    };
    pub use crate::shared::{Coordinate, Identifiable, Minute};
    pub use crate::traffic::{Aggregator, StationTraffic, TimeFilter, Traffic, TrafficSummary};
}
