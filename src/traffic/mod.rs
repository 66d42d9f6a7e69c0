mod filter;
mod rollup;

pub use filter::*;
pub use rollup::*;

use crate::{
    repository::{Direction, TripStore, Window, window},
    shared::{Identifiable, time::Minute},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Time filter {0} is outside of -1..=1439")]
    TimeFilterOutOfRange(i32),
    #[error("Window radius {0} is outside of 1..=720")]
    InvalidWindowRadius(u16),
}

pub struct Config {
    /// Half the width of the rolling window, in minutes.
    pub window_radius: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_radius: window::DEFAULT_RADIUS,
        }
    }
}

/// Departure, arrival and total counts of a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Traffic {
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
}

impl Traffic {
    pub const fn new(departures: u32, arrivals: u32) -> Self {
        Self {
            departures,
            arrivals,
            total_traffic: departures + arrivals,
        }
    }

    /// Share of the traffic that are departures, `None` without traffic.
    pub fn departure_ratio(&self) -> Option<f64> {
        if self.total_traffic == 0 {
            None
        } else {
            Some(self.departures as f64 / self.total_traffic as f64)
        }
    }
}

/// A station paired with its traffic for one query.
#[derive(Debug)]
pub struct StationTraffic<'a, S> {
    pub station: &'a S,
    pub traffic: Traffic,
}

impl<S> Clone for StationTraffic<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StationTraffic<'_, S> {}

impl<S: Identifiable> StationTraffic<'_, S> {
    pub fn id(&self) -> &str {
        self.station.id()
    }
}

/// Totals over one query, what a map needs to size its scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    /// Departures counted across the listed stations.
    pub departures: usize,
    /// Arrivals counted across the listed stations.
    pub arrivals: usize,
    /// Highest total traffic of a single station.
    pub max_total_traffic: u32,
}

impl TrafficSummary {
    pub fn from_traffic<S>(traffic: &[StationTraffic<'_, S>]) -> Self {
        traffic.iter().fold(Self::default(), |mut summary, entry| {
            summary.departures += entry.traffic.departures as usize;
            summary.arrivals += entry.traffic.arrivals as usize;
            summary.max_total_traffic = summary.max_total_traffic.max(entry.traffic.total_traffic);
            summary
        })
    }
}

/// Answers per station traffic queries over a fully loaded [`TripStore`].
///
/// Every query is independent: the store is only read, and all counts are
/// rebuilt from the buckets inside the window. A filtered query never looks
/// at trips outside its window.
#[derive(Debug, Clone)]
pub struct Aggregator {
    store: TripStore,
    // Validated once, moved to the filter's minute on every query.
    window: Window,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(TripStore::default())
    }
}

impl Aggregator {
    pub fn new(store: TripStore) -> Self {
        Self {
            store,
            window: Window::around(Minute::MIDNIGHT),
        }
    }

    pub fn with_config(store: TripStore, config: self::Config) -> Result<Self, self::Error> {
        let window = Window::new(Minute::MIDNIGHT, config.window_radius)
            .ok_or(Error::InvalidWindowRadius(config.window_radius))?;
        Ok(Self { store, window })
    }

    pub fn store(&self) -> &TripStore {
        &self.store
    }

    pub fn window_radius(&self) -> u16 {
        self.window.radius()
    }

    /// The bucket window a filter resolves to, `None` for every bucket.
    pub fn window(&self, filter: TimeFilter) -> Option<Window> {
        match filter {
            TimeFilter::Any => None,
            TimeFilter::Around(center) => Some(self.window.recentered(center)),
        }
    }

    /// Counts departures and arrivals of every station inside the filter.
    ///
    /// The result has one entry per station, in the order given. Stations
    /// without trips get zero counts.
    pub fn compute_station_traffic<'a, S>(
        &self,
        stations: &'a [S],
        filter: TimeFilter,
    ) -> Vec<StationTraffic<'a, S>>
    where
        S: Identifiable + Sync,
    {
        let window = self.window(filter);
        let departures = Rollup::new(
            self.store.windowed_trips(Direction::Departures, window),
            Direction::Departures,
        );
        let arrivals = Rollup::new(
            self.store.windowed_trips(Direction::Arrivals, window),
            Direction::Arrivals,
        );

        stations
            .par_iter()
            .map(|station| StationTraffic {
                station,
                traffic: Traffic::new(
                    departures.count(station.id()),
                    arrivals.count(station.id()),
                ),
            })
            .collect()
    }

    /// Same as [`Aggregator::compute_station_traffic`] for a raw slider value,
    /// `-1` meaning any time. Rejects out of range values before any bucket
    /// is read.
    pub fn compute_raw<'a, S>(
        &self,
        stations: &'a [S],
        time_filter: i32,
    ) -> Result<Vec<StationTraffic<'a, S>>, self::Error>
    where
        S: Identifiable + Sync,
    {
        let filter = TimeFilter::try_from(time_filter)?;
        Ok(self.compute_station_traffic(stations, filter))
    }
}

#[test]
fn traffic_test() {
    let traffic = Traffic::new(3, 1);
    assert_eq!(traffic.total_traffic, 4);
    assert_eq!(traffic.departure_ratio(), Some(0.75));
    assert_eq!(Traffic::default().departure_ratio(), None);
}

#[test]
fn invalid_config_test() {
    let config = Config { window_radius: 0 };
    assert_eq!(
        Aggregator::with_config(TripStore::default(), config).unwrap_err(),
        Error::InvalidWindowRadius(0)
    );
    let config = Config { window_radius: 721 };
    assert!(Aggregator::with_config(TripStore::default(), config).is_err());
}

#[test]
fn configured_window_test() {
    let config = Config { window_radius: 15 };
    let aggregator = Aggregator::with_config(TripStore::default(), config).unwrap();
    assert_eq!(aggregator.window_radius(), 15);
    assert_eq!(aggregator.window(TimeFilter::Any), None);

    let center = Minute::new(5).unwrap();
    let window = aggregator.window(TimeFilter::Around(center)).unwrap();
    assert_eq!(window.center(), center);
    assert_eq!(window.ranges(), [1431..1440, 0..21]);
}
