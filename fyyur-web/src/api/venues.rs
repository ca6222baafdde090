//! Venue endpoints
//!
//! Detail and directory views classify shows against the wall clock at the
//! time of the request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fyyur_common::db::{SearchResults, Venue};
use fyyur_common::time;
use fyyur_common::validation::VenueForm;
use fyyur_common::venues::{self, CityArea, VenueDetail};

use super::{FlashResponse, SearchRequest};
use crate::{ApiResult, AppState};

/// GET /venues
pub async fn list_venues(State(state): State<AppState>) -> ApiResult<Json<Vec<CityArea>>> {
    let areas = venues::list_directory(&state.db, &time::now()).await?;
    Ok(Json(areas))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResults>> {
    let results = venues::search_venues(&state.db, &request.search_term).await?;
    Ok(Json(results))
}

/// GET /venues/:id
pub async fn show_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> ApiResult<Json<VenueDetail>> {
    let detail = venues::venue_detail(&state.db, venue_id, &time::now()).await?;
    Ok(Json(detail))
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<AppState>,
    Json(form): Json<VenueForm>,
) -> ApiResult<(StatusCode, Json<FlashResponse>)> {
    let listed = venues::create_venue(&state.db, &form).await?;
    Ok((
        StatusCode::CREATED,
        Json(FlashResponse::new(
            Some(listed.id),
            format!("Venue {} was successfully listed!", listed.name),
        )),
    ))
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> ApiResult<Json<Venue>> {
    let venue = venues::get_venue(&state.db, venue_id).await?;
    Ok(Json(venue))
}

/// POST /venues/:id/edit
pub async fn edit_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
    Json(form): Json<VenueForm>,
) -> ApiResult<Json<FlashResponse>> {
    let listed = venues::update_venue(&state.db, venue_id, &form).await?;
    Ok(Json(FlashResponse::new(
        Some(listed.id),
        format!("Venue {} was successfully edited!", listed.name),
    )))
}

/// DELETE /venues/:id
///
/// A failed delete still answers 200, with no message.
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> Json<FlashResponse> {
    if venues::delete_venue(&state.db, venue_id).await {
        Json(FlashResponse::new(None, "Venue was successfully deleted!"))
    } else {
        Json(FlashResponse::empty())
    }
}

/// Build venue routes
pub fn venue_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", post(create_venue))
        .route("/venues/:id", get(show_venue).delete(delete_venue))
        .route("/venues/:id/edit", get(edit_venue_form).post(edit_venue))
}
