use cadence::prelude::{Aggregator, Station};
use std::path::PathBuf;
use tokio::sync::RwLock;

pub struct LoadedState {
    pub stations: Box<[Station]>,
    pub aggregator: Aggregator,
}

pub enum Load {
    Loading,
    Ready(LoadedState),
    Failed(String),
}

pub struct AppState {
    pub trips_path: PathBuf,
    pub stations_path: PathBuf,
    pub strict: bool,
    pub data: RwLock<Load>,
}

impl AppState {
    pub fn new(trips_path: PathBuf, stations_path: PathBuf, strict: bool) -> Self {
        Self {
            trips_path,
            stations_path,
            strict,
            data: RwLock::new(Load::Loading),
        }
    }
}
