use std::sync::Arc;

use crate::{api::ready, dto::StationDto, state::AppState};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let data = state.data.read().await;
    let data = ready(&data)?;
    let result: Vec<_> = data.stations.iter().map(StationDto::from).collect();
    Ok(Json(result).into_response())
}
