use crate::{
    db::{natural_key_id, Collection, Document, DocumentStore, Query},
    error::{AppError, AppResult},
    models::{NewSearchCounter, SearchCounter, SearchedMovie},
};

/// Number of search terms in the trending list
pub const TRENDING_LIMIT: u32 = 5;

const COUNT_ATTRIBUTE: &str = "count";

/// Counts one search for `term`
///
/// The first search of a term creates its counter with the triggering movie;
/// later searches increment it in the store. The counter's id is derived from
/// the term, so a create racing another create falls back to incrementing.
pub async fn record_search(
    store: &dyn DocumentStore,
    term: &str,
    movie: &SearchedMovie,
) -> AppResult<SearchCounter> {
    let existing = store
        .list_documents(
            Collection::SearchCounters,
            &[Query::equal("searchTerm", term)],
        )
        .await?;

    if let Some(document) = existing.first() {
        let counter: SearchCounter = store
            .increment_attribute(Collection::SearchCounters, &document.id, COUNT_ATTRIBUTE, 1)
            .await?
            .decode()?;

        tracing::info!(term = %term, count = counter.count, "Search count incremented");
        return Ok(counter);
    }

    let document_id = natural_key_id(Collection::SearchCounters, term);
    let data = serde_json::to_value(NewSearchCounter::first(term, movie))?;

    let document = match store
        .create_document(Collection::SearchCounters, Some(&document_id), data)
        .await
    {
        Ok(document) => document,
        Err(AppError::DocumentConflict(_)) => {
            tracing::debug!(term = %term, "Counter created concurrently, incrementing instead");
            store
                .increment_attribute(
                    Collection::SearchCounters,
                    &document_id,
                    COUNT_ATTRIBUTE,
                    1,
                )
                .await?
        }
        Err(e) => return Err(e),
    };

    let counter: SearchCounter = document.decode()?;
    tracing::info!(
        term = %term,
        movie_id = counter.movie_id,
        count = counter.count,
        "Search recorded"
    );
    Ok(counter)
}

/// Most searched terms, highest count first
pub async fn fetch_trending(store: &dyn DocumentStore) -> AppResult<Vec<SearchCounter>> {
    let documents = store
        .list_documents(
            Collection::SearchCounters,
            &[Query::Limit(TRENDING_LIMIT), Query::OrderDesc(COUNT_ATTRIBUTE)],
        )
        .await?;

    documents.iter().map(Document::decode).collect()
}
