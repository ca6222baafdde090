//! Show endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fyyur_common::db::Show;
use fyyur_common::shows::{self, ShowListing};
use fyyur_common::validation::ShowForm;

use super::FlashResponse;
use crate::{ApiResult, AppState};

/// GET /shows
pub async fn list_shows(State(state): State<AppState>) -> ApiResult<Json<Vec<ShowListing>>> {
    Ok(Json(shows::list_shows(&state.db).await?))
}

/// GET /shows/:id
pub async fn get_show(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
) -> ApiResult<Json<Show>> {
    Ok(Json(shows::get_show(&state.db, show_id).await?))
}

/// POST /shows/create
pub async fn create_show(
    State(state): State<AppState>,
    Json(form): Json<ShowForm>,
) -> ApiResult<(StatusCode, Json<FlashResponse>)> {
    let id = shows::create_show(&state.db, &form).await?;
    Ok((
        StatusCode::CREATED,
        Json(FlashResponse::new(Some(id), "Show was successfully listed!")),
    ))
}

/// POST /shows/:id/edit
pub async fn edit_show(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
    Json(form): Json<ShowForm>,
) -> ApiResult<Json<FlashResponse>> {
    let show = shows::update_show(&state.db, show_id, &form).await?;
    Ok(Json(FlashResponse::new(
        Some(show.id),
        "Show was successfully edited!",
    )))
}

/// DELETE /shows/:id
pub async fn delete_show(
    State(state): State<AppState>,
    Path(show_id): Path<i64>,
) -> Json<FlashResponse> {
    if shows::delete_show(&state.db, show_id).await {
        Json(FlashResponse::new(None, "Show was successfully deleted!"))
    } else {
        Json(FlashResponse::empty())
    }
}

/// Build show routes
pub fn show_routes() -> Router<AppState> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/create", post(create_show))
        .route("/shows/:id", get(get_show).delete(delete_show))
        .route("/shows/:id/edit", post(edit_show))
}
