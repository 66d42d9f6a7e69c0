mod api;
mod dto;
mod state;

use crate::state::{AppState, Load, LoadedState};
use axum::routing::get;
use cadence::{
    feed::{self, Config, FeedReader, MalformedPolicy},
    prelude::*,
};
use std::{path::Path, sync::Arc, time::Instant};
use tracing::{error, info};

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let args: Vec<_> = std::env::args().collect();
    let strict = args.iter().any(|arg| arg == "--strict");
    let paths: Vec<_> = args.iter().skip(1).filter(|arg| !arg.starts_with("--")).collect();
    if paths.len() < 2 {
        error!("Usage: cadence-server <trips.csv|trips.zip> <stations.json> [--strict]");
        std::process::exit(1);
    }

    let state = Arc::new(AppState::new(
        paths[0].into(),
        paths[1].into(),
        strict,
    ));
    tokio::spawn(load(state.clone()));

    let app = axum::Router::new()
        .route("/stations", get(api::stations))
        .route("/traffic", get(api::traffic))
        .with_state(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {PORT}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {PORT}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}

/// Loads both feeds off the async runtime. Queries answer 503 until this is done.
async fn load(state: Arc<AppState>) {
    info!("Loading data...");
    let now = Instant::now();
    let trips_path = state.trips_path.clone();
    let stations_path = state.stations_path.clone();
    let strict = state.strict;
    let result =
        tokio::task::spawn_blocking(move || load_data(&trips_path, &stations_path, strict)).await;

    let status = match result {
        Ok(Ok(data)) => {
            info!(
                "Loaded {} stations and {} trips in {:?}",
                data.stations.len(),
                data.aggregator.store().len(),
                now.elapsed()
            );
            Load::Ready(data)
        }
        Ok(Err(err)) => {
            error!("Failed to load feeds: {err}");
            Load::Failed(err.to_string())
        }
        Err(err) => {
            error!("Loading task failed: {err}");
            Load::Failed(err.to_string())
        }
    };
    *state.data.write().await = status;
}

fn load_data(trips: &Path, stations: &Path, strict: bool) -> Result<LoadedState, feed::Error> {
    let config = Config {
        malformed: if strict {
            MalformedPolicy::Abort
        } else {
            MalformedPolicy::Skip
        },
        ..Default::default()
    };
    let reader = FeedReader::new()
        .with_config(config)
        .trips_from_path(trips)?
        .stations_from_path(stations)?;
    let stations = Station::load_feed(&reader)?;
    let store = TripStore::load_feed(&reader)?;
    Ok(LoadedState {
        stations,
        aggregator: Aggregator::new(store),
    })
}
