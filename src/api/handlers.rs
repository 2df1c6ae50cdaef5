use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{SavedMovieCard, SearchCounter, SearchedMovie},
    services::{saved_movies, search_telemetry, users, UnsaveOutcome},
    session::Session,
};

use super::{
    extract::{JsonBody, PathParam},
    AppState,
};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub logged_in: bool,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<Option<Session>> for ProfileResponse {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(Session { name, email }) => Self {
                logged_in: true,
                name: Some(name),
                email: Some(email),
            },
            None => Self {
                logged_in: false,
                name: None,
                email: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
    /// Why the remote record could not be deleted; the session is cleared regardless
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedListResponse {
    pub movie_id: i64,
    pub saved: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub term: String,
    pub movie: SearchedMovie,
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Current session state
pub async fn get_profile(State(state): State<AppState>) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(state.sessions.load().await?.into()))
}

/// Register a user and log them in on this device
pub async fn register(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let name = required("name", &request.name)?;
    let email = required("email", &request.email)?;

    tracing::info!(request_id = %request_id, email = %email, "Processing registration");

    users::register_user(state.store.as_ref(), &name, &email).await?;

    let session = Session::new(name, email);
    state.sessions.persist(&session).await?;

    Ok((StatusCode::CREATED, Json(Some(session).into())))
}

/// Delete the logged-in user's record and clear the local session
pub async fn logout(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<LogoutResponse>> {
    let warning = match state.sessions.load().await? {
        Some(session) => {
            match users::delete_user_by_email(state.store.as_ref(), &session.email).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id,
                        email = %session.email,
                        error = %e,
                        "User deletion failed during logout"
                    );
                    Some(e.to_string())
                }
            }
        }
        None => Some(AppError::NotLoggedIn.to_string()),
    };

    state.sessions.clear().await?;

    Ok(Json(LogoutResponse {
        logged_out: true,
        warning,
    }))
}

/// Saved movies of the logged-in user, rendered as cards
pub async fn get_saved(State(state): State<AppState>) -> AppResult<Json<Vec<SavedMovieCard>>> {
    let session = state.sessions.load().await?;

    let movies =
        saved_movies::fetch_saved_movies(state.store.as_ref(), &state.catalog, session.as_ref())
            .await?;

    Ok(Json(movies.iter().map(SavedMovieCard::from).collect()))
}

/// Add a movie to the saved list
pub async fn save(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    PathParam(movie_id): PathParam<i64>,
) -> AppResult<(StatusCode, Json<SavedListResponse>)> {
    tracing::debug!(request_id = %request_id, movie_id, "Processing save");

    let session = state.sessions.load().await?;
    let saved =
        saved_movies::save_movie(state.store.as_ref(), &state.locks, session.as_ref(), movie_id)
            .await?;

    Ok((StatusCode::CREATED, Json(SavedListResponse { movie_id, saved })))
}

/// Remove a movie from the saved list
pub async fn unsave(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    PathParam(movie_id): PathParam<i64>,
) -> AppResult<Json<UnsaveOutcome>> {
    tracing::debug!(request_id = %request_id, movie_id, "Processing unsave");

    let session = state.sessions.load().await?;
    let outcome =
        saved_movies::unsave_movie(state.store.as_ref(), &state.locks, session.as_ref(), movie_id)
            .await?;

    Ok(Json(outcome))
}

/// Count a search for the trending list
pub async fn record_search(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SearchRequest>,
) -> AppResult<Json<SearchCounter>> {
    let term = required("term", &request.term)?;

    let counter =
        search_telemetry::record_search(state.store.as_ref(), &term, &request.movie).await?;

    Ok(Json(counter))
}

/// Most searched terms
pub async fn trending(State(state): State<AppState>) -> AppResult<Json<Vec<SearchCounter>>> {
    Ok(Json(
        search_telemetry::fetch_trending(state.store.as_ref()).await?,
    ))
}
