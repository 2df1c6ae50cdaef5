use crate::{
    db::{natural_key_id, Collection, Document, DocumentStore, Query},
    error::{AppError, AppResult},
    models::{NewUser, UserRecord},
};

/// First user record with this email, if any
pub async fn fetch_user_by_email(
    store: &dyn DocumentStore,
    email: &str,
) -> AppResult<Option<UserRecord>> {
    let documents = store
        .list_documents(Collection::Users, &[Query::equal("email", email)])
        .await?;

    documents.first().map(Document::decode).transpose()
}

/// Creates a user record with an empty saved list unless the email is taken
///
/// The record's document id is derived from the email, so a registration that
/// slips past the lookup concurrently with another still collides in the store.
pub async fn register_user(
    store: &dyn DocumentStore,
    name: &str,
    email: &str,
) -> AppResult<UserRecord> {
    if fetch_user_by_email(store, email).await?.is_some() {
        tracing::warn!(email = %email, "Registration rejected, email already exists");
        return Err(AppError::DuplicateEmail(email.to_string()));
    }

    let document_id = natural_key_id(Collection::Users, email);
    let data = serde_json::to_value(NewUser::new(name, email))?;

    match store
        .create_document(Collection::Users, Some(&document_id), data)
        .await
    {
        Ok(document) => {
            tracing::info!(email = %email, user_id = %document.id, "User registered");
            document.decode()
        }
        Err(AppError::DocumentConflict(_)) => {
            tracing::warn!(email = %email, "Concurrent registration for the same email");
            Err(AppError::DuplicateEmail(email.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Deletes the first user record with this email
pub async fn delete_user_by_email(store: &dyn DocumentStore, email: &str) -> AppResult<UserRecord> {
    let user = fetch_user_by_email(store, email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(email.to_string()))?;

    store.delete_document(Collection::Users, &user.id).await?;

    tracing::info!(email = %email, user_id = %user.id, "User deleted");
    Ok(user)
}
