use std::{fs::File, io::Write, path::Path};

use cadence::{
    feed::{self, Config, FeedReader, MalformedPolicy, TripRecord},
    prelude::*,
};
use tempfile::TempDir;
use zip::{ZipWriter, write::SimpleFileOptions};

const TRIPS: &str = "\
ride_id,bike_type,started_at,ended_at,start_station_id,end_station_id,is_member
R1,electric,2024-03-01 08:15:59.870,2024-03-01 08:40:02.120,A32000,B32006,1
R2,classic,2024-03-01 23:59:10,2024-03-02 00:12:44,B32006,A32000,0
R3,classic,2024-03-02 12:00:00,2024-03-02 12:30:00,C32010,C32010,1
";

const MALFORMED_TRIPS: &str = "\
ride_id,started_at,ended_at,start_station_id,end_station_id
R1,2024-03-01 08:15:00,2024-03-01 08:40:00,A32000,B32006
R2,not a date,2024-03-01 09:00:00,A32000,B32006
R3,2024-03-01 10:00:00,,A32000,B32006
R4,2024-03-01 11:00:00,2024-03-01 11:20:00,B32006,A32000
";

const SHORT_ROW_TRIPS: &str = "\
started_at,ended_at,start_station_id,end_station_id
2024-03-01 08:00:00,2024-03-01 08:20:00,A32000,B32006
2024-03-01 09:00:00,2024-03-01 09:20:00,A32000
2024-03-01 10:00:00,2024-03-01 10:20:00,B32006,A32000
";

const STATIONS: &str = r#"{
  "last_updated": 1710000000,
  "data": {
    "stations": [
      {"station_id": "f83", "short_name": "A32000", "name": "Main St", "lat": 42.36, "lon": -71.09, "capacity": 19},
      {"short_name": "B32006", "name": "Harvard Sq", "lat": "42.373", "lon": "-71.118"},
      {"short_name": "C32010", "name": "Kendall", "lat": 42.362, "lon": -71.084, "capacity": 23}
    ]
  }
}"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn write_zip(path: &Path, members: &[(&str, &str)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in members {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn load_trips_from_csv_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "trips.csv", TRIPS);
    let reader = FeedReader::new().trips_from_path(&path).unwrap();

    let mut builder = TripStore::builder();
    let report = builder.load_feed(&reader).unwrap();
    assert_eq!(report.ingested, 3);
    assert_eq!(report.skipped, 0);

    let store = builder.finish();
    assert_eq!(store.len(), 3);
    let first = &store.trips()[0];
    assert_eq!(&*first.start_station_id, "A32000");
    assert_eq!(first.start_minute(), Minute::from_hm(8, 15).unwrap());
    assert_eq!(first.end_minute(), Minute::from_hm(8, 40).unwrap());
    // Ended after midnight, bucketed by time of day only.
    assert_eq!(store.trips()[1].end_minute(), Minute::from_hm(0, 12).unwrap());
}

#[test]
fn load_trips_from_zip_test() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("202403-bluebikes-tripdata.zip");
    write_zip(
        &path,
        &[
            ("202403-bluebikes-tripdata.csv", TRIPS),
            ("README.txt", "not a feed"),
        ],
    );

    let reader = FeedReader::new().trips_from_path(&path).unwrap();
    let store = TripStore::load_feed(&reader).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.departures().len(), 3);
    assert_eq!(store.arrivals().len(), 3);
}

#[test]
fn zip_member_by_name_test() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("feeds.zip");
    write_zip(
        &path,
        &[
            ("other.csv", MALFORMED_TRIPS),
            ("rides.csv", TRIPS),
            ("station_information.json", STATIONS),
        ],
    );

    // Two csv members, no fallback possible.
    assert!(matches!(
        FeedReader::new().trips_from_zip(&path),
        Err(feed::Error::FileNotFound(_))
    ));

    let config = Config {
        trips_file_name: "rides.csv".into(),
        ..Default::default()
    };
    let reader = FeedReader::new()
        .with_config(config)
        .trips_from_zip(&path)
        .unwrap()
        .stations_from_zip(&path)
        .unwrap();
    assert_eq!(TripStore::load_feed(&reader).unwrap().len(), 3);
    assert_eq!(Station::load_feed(&reader).unwrap().len(), 3);
}

#[test]
fn malformed_trip_aborts_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "trips.csv", MALFORMED_TRIPS);
    let reader = FeedReader::new().trips_from_file(&path).unwrap();
    assert_eq!(reader.config().malformed, MalformedPolicy::Abort);

    match TripStore::load_feed(&reader) {
        Err(feed::Error::MalformedTrip { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("started_at"), "{reason}");
        }
        other => panic!("expected a malformed trip, got {other:?}"),
    }
}

#[test]
fn malformed_trip_skipped_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "trips.csv", MALFORMED_TRIPS);
    let config = Config {
        malformed: MalformedPolicy::Skip,
        ..Default::default()
    };
    let reader = FeedReader::new()
        .with_config(config)
        .trips_from_file(&path)
        .unwrap();

    let mut builder = TripStore::builder();
    let report = builder.load_feed(&reader).unwrap();
    assert_eq!(report, LoadReport { ingested: 2, skipped: 2 });

    // Skipped trips never end up at midnight.
    let store = builder.finish();
    assert!(store.departures().bucket(Minute::MIDNIGHT).is_empty());
    assert!(store.arrivals().bucket(Minute::MIDNIGHT).is_empty());
}

#[test]
fn missing_column_test() {
    let csv = "started_at,ended_at,start_station_id\n2024-03-01 08:00:00,2024-03-01 08:10:00,A\n";
    let result = feed::stream_trips(csv.as_bytes(), |_| Ok(()));
    assert!(matches!(
        result,
        Err(feed::Error::MissingColumn("end_station_id"))
    ));
}

#[test]
fn short_row_skipped_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "trips.csv", SHORT_ROW_TRIPS);
    let config = Config {
        malformed: MalformedPolicy::Skip,
        ..Default::default()
    };
    let reader = FeedReader::new()
        .with_config(config)
        .trips_from_file(&path)
        .unwrap();

    let mut builder = TripStore::builder();
    let report = builder.load_feed(&reader).unwrap();
    assert_eq!(report, LoadReport { ingested: 2, skipped: 1 });

    let store = builder.finish();
    assert_eq!(store.len(), 2);
    let starts: Vec<_> = store.trips().iter().map(|trip| trip.start_minute()).collect();
    assert_eq!(
        starts,
        vec![Minute::from_hm(8, 0).unwrap(), Minute::from_hm(10, 0).unwrap()]
    );
}

#[test]
fn loaded_station_ids_are_shared_test() {
    let mut builder = TripStore::builder();
    for (line, record) in [(2, "A32000", "B32006"), (3, "B32006", "A32000")]
        .map(|(line, from, to)| {
            let record = TripRecord {
                started_at: "2024-03-01 08:00:00".into(),
                ended_at: "2024-03-01 08:20:00".into(),
                start_station_id: from.into(),
                end_station_id: to.into(),
            };
            (line, record)
        })
    {
        builder.ingest_record(line, record).unwrap();
    }
    let store = builder.finish();
    let [first, second] = store.trips() else {
        panic!("expected two trips");
    };
    assert!(std::sync::Arc::ptr_eq(&first.start_station_id, &second.end_station_id));
    assert!(std::sync::Arc::ptr_eq(&first.end_station_id, &second.start_station_id));
}

#[test]
fn short_row_aborts_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "trips.csv", SHORT_ROW_TRIPS);
    let reader = FeedReader::new().trips_from_file(&path).unwrap();

    match TripStore::load_feed(&reader) {
        Err(feed::Error::MalformedTrip { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a malformed trip, got {other:?}"),
    }
}

#[test]
fn undecodable_row_reaches_callback_test() {
    let csv = "\
started_at,ended_at,start_station_id,end_station_id
2024-03-01 08:00:00,2024-03-01 08:10:00,A,B
2024-03-01 09:00:00,2024-03-01 09:10:00,A,B,extra
2024-03-01 10:00:00,2024-03-01 10:10:00,B,A
";
    let mut rows = Vec::new();
    feed::stream_trips(csv.as_bytes(), |row| {
        rows.push(match row {
            Ok((line, _)) => Ok(line),
            Err(feed::Error::MalformedTrip { line, .. }) => Err(line),
            Err(err) => return Err(err),
        });
        Ok(())
    })
    .unwrap();
    assert_eq!(rows, vec![Ok(2), Err(3), Ok(4)]);
}

#[test]
fn stream_trips_from_reader_test() {
    let mut lines = Vec::new();
    feed::stream_trips(TRIPS.as_bytes(), |row| {
        let (line, record) = row?;
        lines.push((line, record.start_station_id));
        Ok(())
    })
    .unwrap();
    assert_eq!(
        lines,
        vec![
            (2, "A32000".to_string()),
            (3, "B32006".to_string()),
            (4, "C32010".to_string()),
        ]
    );
}

#[test]
fn missing_file_test() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.csv");
    assert!(matches!(
        FeedReader::new().trips_from_path(&path),
        Err(feed::Error::Io(_))
    ));
}

#[test]
fn empty_reader_test() {
    let reader = FeedReader::new();
    assert!(TripStore::load_feed(&reader).unwrap().is_empty());
    assert!(Station::load_feed(&reader).unwrap().is_empty());
}

#[test]
fn load_stations_test() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stations.json", STATIONS);
    let reader = FeedReader::new().stations_from_path(&path).unwrap();
    let stations = Station::load_feed(&reader).unwrap();

    assert_eq!(stations.len(), 3);
    assert_eq!(stations[0].id(), "A32000");
    assert_eq!(stations[0].station_id.as_deref(), Some("f83"));
    assert_eq!(stations[0].capacity, Some(19));
    assert_eq!(stations[1].index, 1);
    assert_eq!(stations[1].name(), "Harvard Sq");
    assert!((stations[1].coordinate.latitude - 42.373).abs() < 1e-9);
    assert!((stations[1].coordinate.longitude + 71.118).abs() < 1e-9);
    assert_eq!(stations[1].capacity, None);
}

#[test]
fn invalid_station_feed_test() {
    let result = feed::read_stations(r#"{"data": {}}"#.as_bytes());
    assert!(matches!(result, Err(feed::Error::Json(_))));
}

#[test]
fn end_to_end_test() {
    let dir = TempDir::new().unwrap();
    let trips = write_file(&dir, "trips.csv", TRIPS);
    let stations = write_file(&dir, "stations.json", STATIONS);
    let reader = FeedReader::new()
        .trips_from_path(&trips)
        .unwrap()
        .stations_from_path(&stations)
        .unwrap();

    let stations = Station::load_feed(&reader).unwrap();
    let aggregator = Aggregator::new(TripStore::load_feed(&reader).unwrap());

    let traffic = aggregator.compute_station_traffic(&stations, TimeFilter::Any);
    let totals: Vec<_> = traffic.iter().map(|entry| entry.traffic).collect();
    assert_eq!(
        totals,
        vec![Traffic::new(1, 1), Traffic::new(1, 1), Traffic::new(1, 1)]
    );

    // 00:05 covers 23:06 through 01:05, which holds the late trip only.
    let traffic = aggregator.compute_raw(&stations, 5).unwrap();
    let totals: Vec<_> = traffic.iter().map(|entry| entry.traffic).collect();
    assert_eq!(
        totals,
        vec![Traffic::new(0, 1), Traffic::new(1, 0), Traffic::new(0, 0)]
    );
}
