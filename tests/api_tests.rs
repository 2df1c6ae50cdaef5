use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use reelshelf::{
    api::{create_router, AppState},
    db::{Collection, MemoryStore},
    error::{AppError, AppResult},
    models::MovieDetails,
    services::MovieCatalog,
    session::{MemoryKeyValueStore, SessionStore},
};

/// Catalog that knows every id except the ones marked missing
#[derive(Default)]
struct FakeCatalog {
    missing: HashSet<i64>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl MovieCatalog for FakeCatalog {
    async fn fetch_movie_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.missing.contains(&movie_id) {
            return Err(AppError::NotFound(format!("movie {}", movie_id)));
        }
        Ok(MovieDetails {
            id: movie_id,
            title: format!("Movie {}", movie_id),
            poster_path: Some(format!("/{}.jpg", movie_id)),
            vote_average: 7.6,
            release_date: Some("2021-10-22".to_string()),
            overview: None,
            runtime: None,
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct Harness {
    server: TestServer,
    store: MemoryStore,
    catalog: Arc<FakeCatalog>,
}

fn create_test_harness_with(catalog: FakeCatalog) -> Harness {
    let store = MemoryStore::new();
    let catalog = Arc::new(catalog);
    let sessions = SessionStore::new(Arc::new(MemoryKeyValueStore::new()));

    let state = AppState::new(Arc::new(store.clone()), catalog.clone(), sessions);
    let server = TestServer::new(create_router(state)).unwrap();

    Harness {
        server,
        store,
        catalog,
    }
}

fn create_test_harness() -> Harness {
    create_test_harness_with(FakeCatalog::default())
}

async fn register(server: &TestServer, name: &str, email: &str) -> axum_test::TestResponse {
    server
        .post("/profile")
        .json(&json!({ "name": name, "email": email }))
        .await
}

#[tokio::test]
async fn test_health_check() {
    let harness = create_test_harness();
    let response = harness.server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_register_logs_in_and_rejects_duplicate_email() {
    let harness = create_test_harness();

    let profile: Value = harness.server.get("/profile").await.json();
    assert_eq!(profile["logged_in"], false);

    let response = register(&harness.server, "Ada", "a@x.com").await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["logged_in"], true);
    assert_eq!(created["email"], "a@x.com");

    let profile: Value = harness.server.get("/profile").await.json();
    assert_eq!(profile["name"], "Ada");

    let response = register(&harness.server, "Ada Again", "a@x.com").await;
    response.assert_status(StatusCode::CONFLICT);
    let error: Value = response.json();
    assert_eq!(error["kind"], "duplicate_email");

    let users = harness.store.documents(Collection::Users).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].fields["saved"], json!([]));
}

#[tokio::test]
async fn test_register_rejects_blank_email() {
    let harness = create_test_harness();

    let response = register(&harness.server, "Ada", "   ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(harness.store.documents(Collection::Users).await.is_empty());
}

#[tokio::test]
async fn test_save_requires_login() {
    let harness = create_test_harness();

    let response = harness.server.post("/saved/10").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let error: Value = response.json();
    assert_eq!(error["kind"], "not_logged_in");

    let response = harness.server.get("/saved").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_twice_is_already_saved() {
    let harness = create_test_harness();
    register(&harness.server, "Ada", "a@x.com").await;

    harness
        .server
        .post("/saved/10")
        .await
        .assert_status(StatusCode::CREATED);

    let response = harness.server.post("/saved/10").await;
    response.assert_status(StatusCode::CONFLICT);
    let error: Value = response.json();
    assert_eq!(error["kind"], "already_saved");

    let users = harness.store.documents(Collection::Users).await;
    assert_eq!(users[0].fields["saved"], json!([10]));
}

#[tokio::test]
async fn test_save_save_unsave_scenario() {
    let harness = create_test_harness();
    register(&harness.server, "Ada", "a@x.com").await;

    harness.server.post("/saved/10").await.assert_status(StatusCode::CREATED);
    let response = harness.server.post("/saved/20").await;
    let saved: Value = response.json();
    assert_eq!(saved["saved"], json!([10, 20]));

    let response = harness.server.delete("/saved/10").await;
    response.assert_status_ok();
    let outcome: Value = response.json();
    assert_eq!(outcome, json!({ "status": "updated", "saved": [20] }));

    let users = harness.store.documents(Collection::Users).await;
    assert_eq!(users[0].fields["saved"], json!([20]));

    let response = harness.server.get("/saved").await;
    response.assert_status_ok();
    let cards: Vec<Value> = response.json();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], 20);
    assert_eq!(cards[0]["poster_url"], "https://image.tmdb.org/t/p/w500/20.jpg");
    assert_eq!(cards[0]["stars"], 4);
    assert_eq!(cards[0]["release_year"], "2021");
}

#[tokio::test]
async fn test_unsave_when_logged_out_is_skipped() {
    let harness = create_test_harness();

    let response = harness.server.delete("/saved/10").await;
    response.assert_status_ok();
    let outcome: Value = response.json();
    assert_eq!(
        outcome,
        json!({ "status": "skipped", "reason": "not_logged_in" })
    );
}

#[tokio::test]
async fn test_empty_saved_list_skips_catalog() {
    let harness = create_test_harness();
    register(&harness.server, "Ada", "a@x.com").await;

    let response = harness.server.get("/saved").await;
    response.assert_status_ok();
    let cards: Vec<Value> = response.json();
    assert!(cards.is_empty());
    assert_eq!(harness.catalog.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_one_missing_movie_fails_saved_list() {
    let harness = create_test_harness_with(FakeCatalog {
        missing: HashSet::from([404]),
        ..Default::default()
    });
    register(&harness.server, "Ada", "a@x.com").await;
    harness.server.post("/saved/10").await;
    harness.server.post("/saved/404").await;

    let response = harness.server.get("/saved").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_deletes_user_and_clears_session() {
    let harness = create_test_harness();
    register(&harness.server, "Ada", "a@x.com").await;

    let response = harness.server.delete("/profile").await;
    response.assert_status_ok();
    let logout: Value = response.json();
    assert_eq!(logout["logged_out"], true);
    assert_eq!(logout["warning"], Value::Null);

    assert!(harness.store.documents(Collection::Users).await.is_empty());
    let profile: Value = harness.server.get("/profile").await.json();
    assert_eq!(profile["logged_in"], false);

    // The email is free again
    register(&harness.server, "Ada", "a@x.com")
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_logout_without_remote_record_still_clears_session() {
    let harness = create_test_harness();
    register(&harness.server, "Ada", "a@x.com").await;
    let users = harness.store.documents(Collection::Users).await;
    {
        use reelshelf::db::DocumentStore;
        harness
            .store
            .delete_document(Collection::Users, &users[0].id)
            .await
            .unwrap();
    }

    let response = harness.server.delete("/profile").await;
    response.assert_status_ok();
    let logout: Value = response.json();
    assert_eq!(logout["warning"], "User not found: a@x.com");

    let profile: Value = harness.server.get("/profile").await.json();
    assert_eq!(profile["logged_in"], false);
}

#[tokio::test]
async fn test_search_counts_and_trending() {
    let harness = create_test_harness();
    let dune = json!({ "id": 438631, "title": "Dune", "poster_path": "/dune.jpg" });

    for _ in 0..3 {
        harness
            .server
            .post("/searches")
            .json(&json!({ "term": "dune", "movie": dune }))
            .await
            .assert_status_ok();
    }
    let response = harness
        .server
        .post("/searches")
        .json(&json!({ "term": "arrakis", "movie": dune }))
        .await;
    let counter: Value = response.json();
    assert_eq!(counter["count"], 1);
    assert_eq!(counter["poster_url"], "https://image.tmdb.org/t/p/w500/dune.jpg");

    let response = harness.server.get("/trending").await;
    response.assert_status_ok();
    let trending: Vec<Value> = response.json();

    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0]["search_term"], "dune");
    assert_eq!(trending[0]["count"], 3);
    assert_eq!(trending[1]["search_term"], "arrakis");
}

#[tokio::test]
async fn test_blank_search_term_is_rejected() {
    let harness = create_test_harness();

    let response = harness
        .server
        .post("/searches")
        .json(&json!({ "term": " ", "movie": { "id": 1, "title": "Up" } }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["kind"], "invalid_input");
}

#[tokio::test]
async fn test_search_without_movie_is_invalid_input() {
    let harness = create_test_harness();

    let response = harness
        .server
        .post("/searches")
        .json(&json!({ "term": "dune" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["kind"], "invalid_input");
    assert!(harness.store.documents(Collection::SearchCounters).await.is_empty());
}

#[tokio::test]
async fn test_non_numeric_movie_id_is_invalid_input() {
    let harness = create_test_harness();
    register(&harness.server, "Ada", "a@x.com").await;

    let response = harness.server.post("/saved/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["kind"], "invalid_input");

    let response = harness.server.delete("/saved/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let users = harness.store.documents(Collection::Users).await;
    assert_eq!(users[0].fields["saved"], json!([]));
}

#[tokio::test]
async fn test_register_without_email_is_invalid_input() {
    let harness = create_test_harness();

    let response = harness
        .server
        .post("/profile")
        .json(&json!({ "name": "Ada" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["kind"], "invalid_input");
    assert!(error["error"].as_str().unwrap().starts_with("Invalid input:"));
    assert!(harness.store.documents(Collection::Users).await.is_empty());
}
