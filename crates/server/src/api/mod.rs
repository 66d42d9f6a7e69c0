mod stations;
mod traffic;

pub use stations::*;
pub use traffic::*;

use crate::state::{Load, LoadedState};
use axum::http::StatusCode;

/// The loaded feeds, or the status to answer while there are none.
fn ready(load: &Load) -> Result<&LoadedState, StatusCode> {
    match load {
        Load::Ready(data) => Ok(data),
        Load::Loading => Err(StatusCode::SERVICE_UNAVAILABLE),
        Load::Failed(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
