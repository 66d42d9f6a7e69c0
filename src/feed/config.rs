/// What to do with a trip whose timestamps cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Stop loading and return the error.
    #[default]
    Abort,
    /// Log the record, leave it out of the store and keep loading.
    Skip,
}

pub struct Config {
    /// Name of the trip csv inside a zip archive.
    /// If no member has this name, the only `.csv` member is used.
    pub trips_file_name: String,
    /// Name of the station json inside a zip archive.
    pub stations_file_name: String,
    pub malformed: MalformedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trips_file_name: "trips.csv".into(),
            stations_file_name: "station_information.json".into(),
            malformed: MalformedPolicy::default(),
        }
    }
}
