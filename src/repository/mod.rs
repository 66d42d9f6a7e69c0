use std::{collections::HashSet, sync::Arc};

mod entities;
pub mod source;
pub mod window;
pub use entities::*;
pub use window::Window;

use crate::shared::time::{MINUTES_PER_DAY, Minute};

/// Trips a single store can index.
pub const MAX_TRIPS: usize = u32::MAX as usize;

/// Which timestamp of a trip the buckets are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Keyed on `started_at`, counted against the start station.
    Departures,
    /// Keyed on `ended_at`, counted against the end station.
    Arrivals,
}

/// One slot per minute of the day, each holding trip indices.
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    buckets: Box<[Box<[u32]>]>,
}

impl Default for MinuteBuckets {
    fn default() -> Self {
        Self {
            buckets: vec![Box::default(); MINUTES_PER_DAY as usize].into(),
        }
    }
}

impl MinuteBuckets {
    pub fn bucket(&self, minute: Minute) -> &[u32] {
        &self.buckets[minute.as_index()]
    }

    /// Number of trips in each bucket, from midnight on.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|bucket| bucket.len())
    }

    /// Total number of trips across all buckets.
    pub fn len(&self) -> usize {
        self.sizes().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trip indices inside the window, or every index when there is none.
    /// Only the buckets inside the window are visited.
    pub fn windowed(&self, window: Option<Window>) -> impl Iterator<Item = u32> + '_ {
        let [head, tail] = match window {
            Some(window) => window.ranges(),
            None => [0..MINUTES_PER_DAY as usize, 0..0],
        };
        self.buckets[head]
            .iter()
            .chain(self.buckets[tail].iter())
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Same as `windowed(..).count()` without touching the trips.
    pub fn windowed_len(&self, window: Option<Window>) -> usize {
        let [head, tail] = match window {
            Some(window) => window.ranges(),
            None => [0..MINUTES_PER_DAY as usize, 0..0],
        };
        self.buckets[head]
            .iter()
            .chain(self.buckets[tail].iter())
            .map(|bucket| bucket.len())
            .sum()
    }
}

/// Every ingested trip, bucketed by the minute it started and the minute it
/// ended.
///
/// A `TripStore` can only be obtained from a finished [`TripStoreBuilder`],
/// so holding one means the bulk load is complete.
#[derive(Debug, Clone, Default)]
pub struct TripStore {
    trips: Box<[Trip]>,
    departures: MinuteBuckets,
    arrivals: MinuteBuckets,
}

impl TripStore {
    pub fn builder() -> TripStoreBuilder {
        TripStoreBuilder::new()
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, index: u32) -> Option<&Trip> {
        self.trips.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn departures(&self) -> &MinuteBuckets {
        &self.departures
    }

    pub fn arrivals(&self) -> &MinuteBuckets {
        &self.arrivals
    }

    pub fn buckets(&self, direction: Direction) -> &MinuteBuckets {
        match direction {
            Direction::Departures => &self.departures,
            Direction::Arrivals => &self.arrivals,
        }
    }

    /// All trips bucketed inside the window for the given direction.
    /// `None` means no filter and yields every trip once.
    pub fn windowed_trips(
        &self,
        direction: Direction,
        window: Option<Window>,
    ) -> impl Iterator<Item = &Trip> + '_ {
        self.buckets(direction)
            .windowed(window)
            .map(|index| &self.trips[index as usize])
    }
}

/// Collects trips one at a time before freezing them into a [`TripStore`].
#[derive(Debug)]
pub struct TripStoreBuilder {
    trips: Vec<Trip>,
    departures: Vec<Vec<u32>>,
    arrivals: Vec<Vec<u32>>,
    // Station ids repeat on every trip, share one allocation per id.
    station_ids: HashSet<Arc<str>>,
}

impl Default for TripStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TripStoreBuilder {
    pub fn new() -> Self {
        Self {
            trips: Vec::new(),
            departures: vec![Vec::new(); MINUTES_PER_DAY as usize],
            arrivals: vec![Vec::new(); MINUTES_PER_DAY as usize],
            station_ids: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Returns the shared copy of a station id.
    pub fn intern(&mut self, id: &str) -> Arc<str> {
        if let Some(id) = self.station_ids.get(id) {
            id.clone()
        } else {
            let id: Arc<str> = id.into();
            self.station_ids.insert(id.clone());
            id
        }
    }

    /// Adds a trip to the departure bucket of its start minute and the
    /// arrival bucket of its end minute.
    ///
    /// Buckets hold `u32` indices, so a store holds at most [`MAX_TRIPS`].
    pub fn ingest(&mut self, mut trip: Trip) {
        debug_assert!(self.trips.len() < MAX_TRIPS, "trip store is full");
        let index = self.trips.len() as u32;
        trip.index = index;
        trip.start_station_id = self.intern(&trip.start_station_id);
        trip.end_station_id = self.intern(&trip.end_station_id);
        self.departures[trip.start_minute().as_index()].push(index);
        self.arrivals[trip.end_minute().as_index()].push(index);
        self.trips.push(trip);
    }

    pub fn finish(self) -> TripStore {
        TripStore {
            trips: self.trips.into(),
            departures: freeze(self.departures),
            arrivals: freeze(self.arrivals),
        }
    }
}

impl Extend<Trip> for TripStoreBuilder {
    fn extend<T: IntoIterator<Item = Trip>>(&mut self, iter: T) {
        iter.into_iter().for_each(|trip| self.ingest(trip));
    }
}

impl FromIterator<Trip> for TripStore {
    fn from_iter<T: IntoIterator<Item = Trip>>(iter: T) -> Self {
        let mut builder = TripStoreBuilder::new();
        builder.extend(iter);
        builder.finish()
    }
}

fn freeze(buckets: Vec<Vec<u32>>) -> MinuteBuckets {
    MinuteBuckets {
        buckets: buckets.into_iter().map(|bucket| bucket.into()).collect(),
    }
}
