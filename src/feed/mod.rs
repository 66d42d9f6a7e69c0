use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::{ZipArchive, read::ZipFile};

mod config;
pub mod models;
pub use config::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
    #[error("Malformed trip on line {line}: {reason}")]
    MalformedTrip { line: u64, reason: String },
}

#[derive(Default, Debug, Clone)]
pub enum StorageType {
    #[default]
    None,
    File(PathBuf),
    Zip(PathBuf),
}

/// Reads the trip and station feeds from disk.
///
/// Trips are streamed one record at a time so a month of trips never has to
/// sit in memory as raw records.
#[derive(Default)]
pub struct FeedReader {
    config: Config,
    trips: StorageType,
    stations: StorageType,
}

impl FeedReader {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: self::Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Picks a plain csv or a zip archive from the file extension.
    pub fn trips_from_path<P: AsRef<Path>>(self, path: P) -> Result<Self, self::Error> {
        if is_zip(path.as_ref()) {
            self.trips_from_zip(path)
        } else {
            self.trips_from_file(path)
        }
    }

    pub fn trips_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, self::Error> {
        fs::metadata(path.as_ref())?;
        self.trips = StorageType::File(path.as_ref().to_owned());
        Ok(self)
    }

    pub fn trips_from_zip<P: AsRef<Path>>(mut self, path: P) -> Result<Self, self::Error> {
        let mut archive = ZipArchive::new(File::open(path.as_ref())?)?;
        find_member(&mut archive, &self.config.trips_file_name, ".csv")?;
        self.trips = StorageType::Zip(path.as_ref().to_owned());
        Ok(self)
    }

    /// Picks a plain json or a zip archive from the file extension.
    pub fn stations_from_path<P: AsRef<Path>>(self, path: P) -> Result<Self, self::Error> {
        if is_zip(path.as_ref()) {
            self.stations_from_zip(path)
        } else {
            self.stations_from_file(path)
        }
    }

    pub fn stations_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, self::Error> {
        fs::metadata(path.as_ref())?;
        self.stations = StorageType::File(path.as_ref().to_owned());
        Ok(self)
    }

    pub fn stations_from_zip<P: AsRef<Path>>(mut self, path: P) -> Result<Self, self::Error> {
        let mut archive = ZipArchive::new(File::open(path.as_ref())?)?;
        find_member(&mut archive, &self.config.stations_file_name, ".json")?;
        self.stations = StorageType::Zip(path.as_ref().to_owned());
        Ok(self)
    }

    /// Streams every trip record with its line number in the csv.
    ///
    /// A record that cannot be read is handed to `f` as
    /// [`Error::MalformedTrip`] and the stream goes on. Returning an error
    /// from `f` stops the stream and propagates the error.
    pub fn stream_trips<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut(Result<(u64, TripRecord), self::Error>) -> Result<(), self::Error>,
    {
        match &self.trips {
            StorageType::None => Ok(()),
            StorageType::File(path) => stream_trips(File::open(path)?, f),
            StorageType::Zip(path) => {
                let mut archive = ZipArchive::new(File::open(path)?)?;
                let file = find_member(&mut archive, &self.config.trips_file_name, ".csv")?;
                stream_trips(file, f)
            }
        }
    }

    pub fn read_stations(&self) -> Result<Vec<StationRecord>, self::Error> {
        match &self.stations {
            StorageType::None => Ok(Vec::new()),
            StorageType::File(path) => read_stations(File::open(path)?),
            StorageType::Zip(path) => {
                let mut archive = ZipArchive::new(File::open(path)?)?;
                let file = find_member(&mut archive, &self.config.stations_file_name, ".json")?;
                read_stations(file)
            }
        }
    }
}

/// Columns every trip csv must carry.
pub const TRIP_COLUMNS: [&str; 4] = ["started_at", "ended_at", "start_station_id", "end_station_id"];

/// Streams trip records out of any csv source.
///
/// Header and io failures end the stream. Short rows, long rows and rows
/// that do not deserialize reach `f` as [`Error::MalformedTrip`].
pub fn stream_trips<R, F>(reader: R, mut f: F) -> Result<(), self::Error>
where
    R: Read,
    F: FnMut(Result<(u64, TripRecord), self::Error>) -> Result<(), self::Error>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    if let Some(column) = TRIP_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(self::Error::MissingColumn(column));
    }

    let mut record = csv::StringRecord::new();
    loop {
        let row = match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                record
                    .deserialize::<TripRecord>(Some(&headers))
                    .map(|value| (line, value))
                    .map_err(|err| malformed_record(err, line))
            }
            Err(err) => {
                let line = err.position().map(|pos| pos.line()).unwrap_or_default();
                Err(malformed_record(err, line))
            }
        };
        match row {
            Err(err @ (self::Error::Csv(_) | self::Error::Io(_))) => return Err(err),
            row => f(row)?,
        }
    }
    Ok(())
}

/// Row level csv failures become [`Error::MalformedTrip`], the rest stay fatal.
fn malformed_record(err: csv::Error, line: u64) -> self::Error {
    let per_record = matches!(
        err.kind(),
        csv::ErrorKind::UnequalLengths { .. }
            | csv::ErrorKind::Utf8 { .. }
            | csv::ErrorKind::Deserialize { .. }
    );
    if per_record {
        self::Error::MalformedTrip {
            line,
            reason: err.to_string(),
        }
    } else {
        err.into()
    }
}
