/// Movie metadata provider abstraction
///
/// Saved movies are stored as bare ids; rendering them needs the provider to
/// resolve each id to its details. TMDB is the only provider today.
use crate::{error::AppResult, models::MovieDetails};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch full details for one movie id
    ///
    /// An id the provider does not know fails with `AppError::NotFound`.
    async fn fetch_movie_details(&self, movie_id: i64) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
