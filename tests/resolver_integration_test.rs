//! Full-chain tests: resolver over a real SQLite store and a mocked
//! upstream provider.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use lookupd::domain::models::{LookupKey, OmdbConfig};
use lookupd::infrastructure::database::{DatabaseHandle, SqliteMovieStore};
use lookupd::infrastructure::providers::OmdbClient;
use lookupd::services::{EntityCache, Resolver};
use mockito::Matcher;

use helpers::database::{setup_test_db, teardown_test_db};

const INCEPTION_BODY: &str = r#"{
    "Title": "Inception",
    "Year": "2010",
    "Plot": "A thief...",
    "Language": "English",
    "Poster": "https://example.com/p.jpg",
    "imdbRating": "8.8",
    "imdbID": "tt1375666",
    "Response": "True"
}"#;

fn omdb_client(base_url: String) -> Arc<OmdbClient> {
    Arc::new(
        OmdbClient::new(&OmdbConfig {
            base_url,
            api_key: "test-key".to_string(),
            timeout_secs: 2,
        })
        .expect("client"),
    )
}

#[tokio::test]
async fn upstream_hit_is_cached_and_persisted_for_future_lookups() {
    let pool = setup_test_db().await;
    let store = Arc::new(SqliteMovieStore::new(DatabaseHandle::ready(pool.clone())));

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("t".into(), "INCEPTION".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(INCEPTION_BODY)
        .expect(1)
        .create_async()
        .await;

    let resolver = Resolver::new(EntityCache::new(), store.clone(), omdb_client(server.url()));

    // Cold lookup goes all the way to the provider.
    let movie = resolver.resolve("inception").await.expect("resolve");
    assert_eq!(movie.title, "INCEPTION");

    // Same process, different casing: served from cache, no second
    // provider call (the mock allows exactly one).
    let cached = resolver.resolve("INCEPTION").await.expect("resolve");
    assert_eq!(cached, movie);

    // The detached write-back lands in the store.
    assert!(resolver.drain_persists(Duration::from_secs(2)).await);
    let persisted = store_get(&store, "inception").await;
    assert_eq!(persisted, Some(movie.clone()));

    // A fresh process (new cache, same store) is served by the store
    // tier and still never reaches the provider again.
    let restarted = Resolver::new(EntityCache::new(), store, omdb_client(server.url()));
    let from_store = restarted.resolve("Inception").await.expect("resolve");
    assert_eq!(from_store, movie);

    mock.assert_async().await;
    teardown_test_db(pool).await;
}

#[tokio::test]
async fn provider_no_result_does_not_touch_store_or_cache() {
    let pool = setup_test_db().await;
    let store = Arc::new(SqliteMovieStore::new(DatabaseHandle::ready(pool.clone())));

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Response": "False", "Error": "Movie not found!"}"#)
        .create_async()
        .await;

    let resolver = Resolver::new(EntityCache::new(), store.clone(), omdb_client(server.url()));

    assert!(resolver.resolve("no such movie").await.is_err());
    assert!(resolver.drain_persists(Duration::from_secs(1)).await);
    assert_eq!(store_get(&store, "no such movie").await, None);

    teardown_test_db(pool).await;
}

async fn store_get(
    store: &SqliteMovieStore,
    raw: &str,
) -> Option<lookupd::domain::models::Movie> {
    use lookupd::domain::ports::EntityStore;
    store
        .get(&LookupKey::normalize(raw))
        .await
        .expect("store get")
}
