use sqlx::SqlitePool;

/// Create an in-memory SQLite database for testing
///
/// Creates a fresh in-memory database with migrations applied.
/// Each call creates a completely isolated database instance.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("failed to create test database");

    lookupd::infrastructure::database::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Teardown test database
///
/// Closes the connection pool and cleans up resources.
pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}
