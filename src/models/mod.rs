pub mod movie;
pub mod search;
pub mod user;

pub use movie::{MovieDetails, SavedMovieCard};
pub use search::{NewSearchCounter, SearchCounter, SearchedMovie};
pub use user::{NewUser, UserRecord};

/// TMDB image CDN prefix for w500 posters
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Shown when a movie has no poster
pub const POSTER_PLACEHOLDER_URL: &str = "https://placehold.co/600x400/1a1a1a/ffffff.png";

/// Builds a full poster URL from a TMDB poster path
pub fn poster_url(poster_path: Option<&str>) -> String {
    match poster_path.map(str::trim) {
        Some(path) if !path.is_empty() => format!("{}{}", POSTER_BASE_URL, path),
        _ => POSTER_PLACEHOLDER_URL.to_string(),
    }
}
