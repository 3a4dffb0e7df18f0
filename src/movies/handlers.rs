use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

use super::dto::{MovieListResponse, MovieResponse};
use super::services::{self, WriteAction};

/// Reads are served; write endpoints answer 405 without reading the body.
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/:id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<MovieListResponse>> {
    let movies = services::list(state.movies.as_ref()).await?;
    Ok(Json(MovieListResponse::from(movies)))
}

#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieResponse>> {
    let movie = services::get_by_id(state.movies.as_ref(), &id).await?;
    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

pub async fn create_movie() -> AppError {
    services::disabled(WriteAction::Create)
}

pub async fn update_movie() -> AppError {
    services::disabled(WriteAction::Update)
}

pub async fn delete_movie() -> AppError {
    services::disabled(WriteAction::Delete)
}
