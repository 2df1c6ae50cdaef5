/// On-device session cache
///
/// The logged-in user is remembered as two string entries, `user_name` and
/// `user_email`, in a small key-value store. A user counts as logged in only
/// when both are present.
use std::sync::Arc;

use serde::Serialize;

use crate::error::AppResult;

pub mod store;

pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

pub const USER_NAME_KEY: &str = "user_name";
pub const USER_EMAIL_KEY: &str = "user_email";

/// The logged-in user, passed explicitly to operations that act on their behalf
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub email: String,
}

impl Session {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current session, if both entries are cached
    pub async fn load(&self) -> AppResult<Option<Session>> {
        let name = self.storage.get(USER_NAME_KEY).await?;
        let email = self.storage.get(USER_EMAIL_KEY).await?;

        Ok(match (name, email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some(Session { name, email })
            }
            _ => None,
        })
    }

    pub async fn is_logged_in(&self) -> AppResult<bool> {
        Ok(self.load().await?.is_some())
    }

    /// Caches the session without checking it against the remote record
    pub async fn persist(&self, session: &Session) -> AppResult<()> {
        self.storage
            .set_many(&[
                (USER_NAME_KEY.to_string(), session.name.clone()),
                (USER_EMAIL_KEY.to_string(), session.email.clone()),
            ])
            .await?;
        tracing::info!(email = %session.email, "Session persisted");
        Ok(())
    }

    pub async fn clear(&self) -> AppResult<()> {
        self.storage
            .remove_many(&[USER_NAME_KEY.to_string(), USER_EMAIL_KEY.to_string()])
            .await?;
        tracing::info!("Session cleared");
        Ok(())
    }
}
