use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tokio::task::JoinSet;

use crate::{
    db::{Collection, DocumentStore},
    error::{AppError, AppResult},
    models::{MovieDetails, UserRecord},
    services::{locks::KeyedLocks, providers::MovieCatalog, users},
    session::Session,
};

/// Result of an unsave request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnsaveOutcome {
    /// The saved list was rewritten without the movie
    Updated { saved: Vec<i64> },
    /// Nothing to do; logged as a warning
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotLoggedIn,
    UserNotFound,
}

async fn session_user(store: &dyn DocumentStore, session: &Session) -> AppResult<UserRecord> {
    users::fetch_user_by_email(store, &session.email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(session.email.clone()))
}

/// Appends a movie to the logged-in user's saved list
///
/// Returns the saved list as written.
pub async fn save_movie(
    store: &dyn DocumentStore,
    locks: &KeyedLocks,
    session: Option<&Session>,
    movie_id: i64,
) -> AppResult<Vec<i64>> {
    let session = session.ok_or(AppError::NotLoggedIn)?;
    let _guard = locks.lock(&session.email).await;

    let user = session_user(store, session).await?;

    if user.has_saved(movie_id) {
        tracing::info!(email = %session.email, movie_id, "Movie already saved");
        return Err(AppError::AlreadySaved(movie_id));
    }

    let mut saved = user.saved;
    saved.push(movie_id);

    store
        .update_document(Collection::Users, &user.id, json!({ "saved": saved }))
        .await?;

    tracing::info!(
        email = %session.email,
        movie_id,
        saved_count = saved.len(),
        "Movie saved"
    );

    Ok(saved)
}

/// Removes a movie from the logged-in user's saved list
///
/// Without a session or a user record this is a logged no-op.
pub async fn unsave_movie(
    store: &dyn DocumentStore,
    locks: &KeyedLocks,
    session: Option<&Session>,
    movie_id: i64,
) -> AppResult<UnsaveOutcome> {
    let Some(session) = session else {
        tracing::warn!(movie_id, "Unsave skipped, user not logged in");
        return Ok(UnsaveOutcome::Skipped {
            reason: SkipReason::NotLoggedIn,
        });
    };
    let _guard = locks.lock(&session.email).await;

    let Some(user) = users::fetch_user_by_email(store, &session.email).await? else {
        tracing::warn!(email = %session.email, movie_id, "Unsave skipped, user document not found");
        return Ok(UnsaveOutcome::Skipped {
            reason: SkipReason::UserNotFound,
        });
    };

    let saved: Vec<i64> = user.saved.into_iter().filter(|id| *id != movie_id).collect();

    store
        .update_document(Collection::Users, &user.id, json!({ "saved": saved }))
        .await?;

    tracing::info!(
        email = %session.email,
        movie_id,
        saved_count = saved.len(),
        "Movie unsaved"
    );

    Ok(UnsaveOutcome::Updated { saved })
}

/// Details for every saved movie, in saved-list order
///
/// Empty saved lists never reach the catalog.
pub async fn fetch_saved_movies(
    store: &dyn DocumentStore,
    catalog: &Arc<dyn MovieCatalog>,
    session: Option<&Session>,
) -> AppResult<Vec<MovieDetails>> {
    let session = session.ok_or(AppError::NotLoggedIn)?;
    let user = session_user(store, session).await?;

    if user.saved.is_empty() {
        return Ok(Vec::new());
    }

    let movies = fetch_details_batch(catalog, &user.saved).await?;

    tracing::info!(
        email = %session.email,
        movies = movies.len(),
        provider = catalog.name(),
        "Saved movies fetched"
    );

    Ok(movies)
}

/// Fetches all ids concurrently; the first failure aborts the rest
async fn fetch_details_batch(
    catalog: &Arc<dyn MovieCatalog>,
    movie_ids: &[i64],
) -> AppResult<Vec<MovieDetails>> {
    let mut tasks = JoinSet::new();

    for (index, &movie_id) in movie_ids.iter().enumerate() {
        let catalog = Arc::clone(catalog);
        tasks.spawn(async move {
            let details = catalog.fetch_movie_details(movie_id).await;
            (index, movie_id, details)
        });
    }

    let mut slots: Vec<Option<MovieDetails>> = vec![None; movie_ids.len()];

    while let Some(joined) = tasks.join_next().await {
        let (index, movie_id, details) =
            joined.map_err(|e| AppError::Internal(format!("Detail fetch task failed: {}", e)))?;

        match details {
            Ok(details) => slots[index] = Some(details),
            Err(e) => {
                tracing::error!(
                    movie_id,
                    error = %e,
                    pending = tasks.len(),
                    "Movie detail fetch failed, discarding batch"
                );
                tasks.abort_all();
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| AppError::Internal("Missing movie detail".to_string())))
        .collect()
}
