use std::{collections::HashMap, sync::Arc};

use crate::{api::ready, dto::TrafficDto, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cadence::prelude::TimeFilter;
use tracing::error;

pub async fn traffic(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let time: i32 = match params.get("time") {
        Some(value) => match value.parse() {
            Ok(value) => value,
            Err(_) => return Err(StatusCode::BAD_REQUEST),
        },
        None => TimeFilter::ANY_SENTINEL,
    };

    let data = state.data.read().await;
    let data = ready(&data)?;
    let traffic = data
        .aggregator
        .compute_raw(&data.stations, time)
        .map_err(|err| {
            error!("Rejected traffic query: {err}");
            StatusCode::BAD_REQUEST
        })?;
    Ok(Json(TrafficDto::from(time, &traffic)).into_response())
}
