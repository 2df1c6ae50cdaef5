use serde::{Deserialize, Serialize};

/// Per-term search counter used to compute trending movies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCounter {
    #[serde(rename(serialize = "id", deserialize = "$id"))]
    pub id: String,
    #[serde(rename(serialize = "search_term", deserialize = "searchTerm"))]
    pub search_term: String,
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    pub count: i64,
}

/// Payload for creating a search counter document
#[derive(Debug, Clone, Serialize)]
pub struct NewSearchCounter<'a> {
    #[serde(rename = "searchTerm")]
    pub search_term: &'a str,
    pub movie_id: i64,
    pub title: &'a str,
    pub count: i64,
    pub poster_url: String,
}

impl<'a> NewSearchCounter<'a> {
    /// First sighting of `term`, attributed to the movie that triggered it
    pub fn first(term: &'a str, movie: &'a SearchedMovie) -> Self {
        Self {
            search_term: term,
            movie_id: movie.id,
            title: &movie.title,
            count: 1,
            poster_url: super::poster_url(movie.poster_path.as_deref()),
        }
    }
}

/// The movie a search resolved to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchedMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_counter_uses_document_field_names() {
        let movie = SearchedMovie {
            id: 438631,
            title: "Dune".to_string(),
            poster_path: Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".to_string()),
        };

        let value = serde_json::to_value(NewSearchCounter::first("dune", &movie)).unwrap();
        assert_eq!(value["searchTerm"], "dune");
        assert_eq!(value["movie_id"], 438631);
        assert_eq!(value["count"], 1);
        assert_eq!(
            value["poster_url"],
            "https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"
        );
    }

    #[test]
    fn test_counter_reads_document_and_writes_snake_case() {
        let json = r#"{
            "$id": "c1",
            "searchTerm": "dune",
            "movie_id": 438631,
            "title": "Dune",
            "poster_url": null,
            "count": 3
        }"#;

        let counter: SearchCounter = serde_json::from_str(json).unwrap();
        assert_eq!(counter.search_term, "dune");
        assert_eq!(counter.count, 3);

        let out = serde_json::to_value(&counter).unwrap();
        assert_eq!(out["id"], "c1");
        assert_eq!(out["search_term"], "dune");
    }
}
