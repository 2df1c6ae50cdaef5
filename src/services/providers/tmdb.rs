/// The Movie Database (TMDB) v3 provider
///
/// Authenticates with a v4 read access token sent as a bearer token.
use reqwest::{Client as HttpClient, StatusCode};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::MovieDetails,
    services::providers::MovieCatalog,
};

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
        }
    }

    fn movie_url(&self, movie_id: i64) -> String {
        format!("{}/movie/{}", self.api_url, movie_id)
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn fetch_movie_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        let api_key = Config::require(&self.api_key, "TMDB_API_KEY")?;

        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .bearer_auth(api_key)
            .header("accept", "application/json")
            .query(&[("language", LANGUAGE)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("movie {}", movie_id)));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                movie_id,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let details: MovieDetails = response.json().await?;

        tracing::debug!(
            movie_id,
            title = %details.title,
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
