use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::wanted_person::WantedPersonsPayload;
use crate::state::AppState;
use crate::wanted_persons::filter::filter_persons;
use crate::wanted_persons::scraper::refresh_dataset;

#[derive(Debug, Default, Deserialize)]
pub struct WantedPersonsQuery {
    pub station: Option<String>,
    pub alias: Option<String>,
}

/// GET /wanted-persons
/// Returns the cached dataset, optionally filtered by station and alias substrings.
pub async fn handle_list_wanted_persons(
    State(state): State<AppState>,
    Query(params): Query<WantedPersonsQuery>,
) -> Result<Json<WantedPersonsPayload>, AppError> {
    let store = state.store.clone();
    let payload = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(anyhow::Error::from)??;
    let items = filter_persons(
        payload.items,
        params.station.as_deref(),
        params.alias.as_deref(),
    );
    info!(
        "Returning {} wanted persons after filtering (station={:?}, alias={:?})",
        items.len(),
        params.station,
        params.alias
    );
    Ok(Json(WantedPersonsPayload { items, ..payload }))
}

/// POST /wanted-persons/scrape
/// Forces a fresh scrape, persists it and returns the unfiltered dataset.
pub async fn handle_refresh_wanted_persons(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<WantedPersonsPayload>), AppError> {
    let payload = refresh_dataset(state.scraper.as_ref(), &state.store).await?;
    Ok((StatusCode::ACCEPTED, Json(payload)))
}
