use serde::{Deserialize, Serialize};

/// Movie details as returned by the metadata API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl MovieDetails {
    pub fn poster_url(&self) -> String {
        super::poster_url(self.poster_path.as_deref())
    }

    /// Rating on a five-star scale
    pub fn stars(&self) -> u8 {
        (self.vote_average / 2.0).round().clamp(0.0, 5.0) as u8
    }

    /// Year part of `release_date` (`YYYY-MM-DD`)
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }
}

/// One entry of the saved-movies list as shown to the user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SavedMovieCard {
    pub id: i64,
    pub title: String,
    pub poster_url: String,
    pub stars: u8,
    pub release_year: Option<String>,
}

impl From<&MovieDetails> for SavedMovieCard {
    fn from(details: &MovieDetails) -> Self {
        Self {
            id: details.id,
            title: details.title.clone(),
            poster_url: details.poster_url(),
            stars: details.stars(),
            release_year: details.release_year().map(str::to_string),
        }
    }
}
