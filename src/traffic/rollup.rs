use std::collections::HashMap;

use crate::repository::{Direction, Trip};

/// Trip counts grouped by station id.
#[derive(Debug, Clone, Default)]
pub struct Rollup<'a> {
    counts: HashMap<&'a str, u32>,
    trips: usize,
}

impl<'a> Rollup<'a> {
    pub fn new<I>(trips: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let mut counts: HashMap<&'a str, u32> = HashMap::new();
        let mut total = 0;
        trips.into_iter().for_each(|trip| {
            *counts.entry(trip.station_id(direction)).or_default() += 1;
            total += 1;
        });
        Self {
            counts,
            trips: total,
        }
    }

    /// Number of trips counted for the station.
    /// A station without trips has a count of zero, it is never missing.
    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Number of trips that went into the rollup.
    pub fn trips(&self) -> usize {
        self.trips
    }

    /// Number of distinct stations with at least one trip.
    pub fn stations(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
fn trip(from: &str, to: &str) -> Trip {
    use chrono::NaiveDate;

    let at = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap();
    Trip::new(from, to, at, at)
}

#[test]
fn rollup_counts_test() {
    let trips = [trip("A", "B"), trip("A", "C"), trip("B", "A")];
    let departures = Rollup::new(&trips, Direction::Departures);
    assert_eq!(departures.count("A"), 2);
    assert_eq!(departures.count("B"), 1);
    assert_eq!(departures.count("C"), 0);
    assert_eq!(departures.trips(), 3);
    assert_eq!(departures.stations(), 2);

    let arrivals = Rollup::new(&trips, Direction::Arrivals);
    assert_eq!(arrivals.count("A"), 1);
    assert_eq!(arrivals.count("B"), 1);
    assert_eq!(arrivals.count("C"), 1);
}

#[test]
fn empty_rollup_test() {
    let rollup = Rollup::new(std::iter::empty(), Direction::Departures);
    assert_eq!(rollup.count("anything"), 0);
    assert_eq!(rollup.trips(), 0);
}
