use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    db::{AppwriteStore, DocumentStore, MemoryStore},
    services::{KeyedLocks, MovieCatalog, TmdbCatalog},
    session::{FileKeyValueStore, SessionStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub sessions: SessionStore,
    /// Serializes saved-list updates per user email
    pub locks: KeyedLocks,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        catalog: Arc<dyn MovieCatalog>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            store,
            catalog,
            sessions,
            locks: KeyedLocks::new(),
        }
    }

    /// Wires the configured store, TMDB and the session file together
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Appwrite => Arc::new(AppwriteStore::new(config)),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let sessions = SessionStore::new(Arc::new(FileKeyValueStore::new(&config.session_file)));

        tracing::info!(
            store = store.name(),
            session_file = %config.session_file,
            "Application state initialized"
        );

        Self::new(store, Arc::new(TmdbCatalog::new(config)), sessions)
    }
}
