use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Which document store implementation backs the service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted Appwrite database over its REST API
    #[default]
    Appwrite,
    /// Process-local store, lost on restart
    Memory,
}

/// Application configuration loaded from environment variables
///
/// Remote ids are optional here on purpose: a missing id fails the remote call
/// that needs it (see [`Config::require`]) instead of failing startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Appwrite REST endpoint
    #[serde(default = "default_appwrite_endpoint")]
    pub appwrite_endpoint: String,

    pub appwrite_project_id: Option<String>,

    /// Server API key, sent as `X-Appwrite-Key` when present
    pub appwrite_api_key: Option<String>,

    pub appwrite_database_id: Option<String>,

    /// Collection holding search counters
    pub appwrite_collection_movies_id: Option<String>,

    /// Collection holding user records
    pub appwrite_collection_users_id: Option<String>,

    /// TMDB read access token
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Key-value file holding the logged-in user's session
    #[serde(default = "default_session_file")]
    pub session_file: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_session_file() -> String {
    "reelshelf-session.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Unwraps an optional setting, naming the variable when it is absent
    pub fn require<'a>(value: &'a Option<String>, name: &'static str) -> AppResult<&'a str> {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AppError::Config(name))
    }
}
