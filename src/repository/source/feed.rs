use crate::{
    feed::{self, FeedReader, MalformedPolicy, TripRecord},
    repository::{Station, Trip, TripStore, TripStoreBuilder},
    shared::time::parse_timestamp,
};
use std::{collections::HashSet, time::Instant};
use tracing::{debug, warn};

/// Outcome of streaming a trip feed into a builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub ingested: usize,
    pub skipped: usize,
}

impl TripStore {
    /// Streams the whole trip feed and freezes the result.
    pub fn load_feed(reader: &FeedReader) -> Result<Self, feed::Error> {
        let mut builder = TripStoreBuilder::new();
        builder.load_feed(reader)?;
        Ok(builder.finish())
    }
}

impl TripStoreBuilder {
    pub fn load_feed(&mut self, reader: &FeedReader) -> Result<LoadReport, feed::Error> {
        debug!("Loading trips...");
        let now = Instant::now();
        let policy = reader.config().malformed;
        let mut report = LoadReport::default();
        reader.stream_trips(|row| {
            match row.and_then(|(line, record)| self.ingest_record(line, record)) {
                Ok(()) => {
                    report.ingested += 1;
                    Ok(())
                }
                Err(err @ feed::Error::MalformedTrip { .. }) if policy == MalformedPolicy::Skip => {
                    warn!("Skipping trip: {err}");
                    report.skipped += 1;
                    Ok(())
                }
                Err(err) => Err(err),
            }
        })?;
        debug!(
            "Loading {} trips took {:?}, {} skipped",
            report.ingested,
            now.elapsed(),
            report.skipped
        );
        Ok(report)
    }

    /// Parses the timestamps of a raw record and ingests it.
    /// Unparsable timestamps are reported, never bucketed at midnight.
    pub fn ingest_record(&mut self, line: u64, record: TripRecord) -> Result<(), feed::Error> {
        let started_at = parse_timestamp(&record.started_at).ok_or_else(|| {
            feed::Error::MalformedTrip {
                line,
                reason: format!("invalid started_at {:?}", record.started_at),
            }
        })?;
        let ended_at = parse_timestamp(&record.ended_at).ok_or_else(|| {
            feed::Error::MalformedTrip {
                line,
                reason: format!("invalid ended_at {:?}", record.ended_at),
            }
        })?;
        self.ingest(Trip::new(
            record.start_station_id,
            record.end_station_id,
            started_at,
            ended_at,
        ));
        Ok(())
    }
}

impl Station {
    /// Reads every station of the station feed, in feed order.
    pub fn load_feed(reader: &FeedReader) -> Result<Box<[Station]>, feed::Error> {
        debug!("Loading stations...");
        let now = Instant::now();
        let mut seen: HashSet<String> = HashSet::new();
        let stations: Box<[Station]> = reader
            .read_stations()?
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                if !seen.insert(record.short_name.clone()) {
                    warn!("Duplicate station short name {}", record.short_name);
                }
                let mut value: Station = record.into();
                value.index = i as u32;
                value
            })
            .collect();
        debug!(
            "Loading {} stations took {:?}",
            stations.len(),
            now.elapsed()
        );
        Ok(stations)
    }
}
