//! Artist endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fyyur_common::artists::{self, ArtistDetail};
use fyyur_common::db::{Artist, NameEntry, SearchResults};
use fyyur_common::time;
use fyyur_common::validation::ArtistForm;

use super::{FlashResponse, SearchRequest};
use crate::{ApiResult, AppState};

/// GET /artists
pub async fn list_artists(State(state): State<AppState>) -> ApiResult<Json<Vec<NameEntry>>> {
    Ok(Json(artists::list_artists(&state.db).await?))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResults>> {
    let results = artists::search_artists(&state.db, &request.search_term).await?;
    Ok(Json(results))
}

/// GET /artists/:id
pub async fn show_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> ApiResult<Json<ArtistDetail>> {
    let detail = artists::artist_detail(&state.db, artist_id, &time::now()).await?;
    Ok(Json(detail))
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<AppState>,
    Json(form): Json<ArtistForm>,
) -> ApiResult<(StatusCode, Json<FlashResponse>)> {
    let listed = artists::create_artist(&state.db, &form).await?;
    Ok((
        StatusCode::CREATED,
        Json(FlashResponse::new(
            Some(listed.id),
            format!("Artist {} was successfully listed!", listed.name),
        )),
    ))
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(artists::get_artist(&state.db, artist_id).await?))
}

/// POST /artists/:id/edit
pub async fn edit_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
    Json(form): Json<ArtistForm>,
) -> ApiResult<Json<FlashResponse>> {
    let listed = artists::update_artist(&state.db, artist_id, &form).await?;
    Ok(Json(FlashResponse::new(
        Some(listed.id),
        format!("Artist {} was successfully edited!", listed.name),
    )))
}

/// DELETE /artists/:id
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Json<FlashResponse> {
    if artists::delete_artist(&state.db, artist_id).await {
        Json(FlashResponse::new(None, "Artist was successfully deleted!"))
    } else {
        Json(FlashResponse::empty())
    }
}

/// Build artist routes
pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", post(create_artist))
        .route("/artists/:id", get(show_artist).delete(delete_artist))
        .route("/artists/:id/edit", get(edit_artist_form).post(edit_artist))
}
