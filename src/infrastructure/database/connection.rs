use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::models::DatabaseConfig;
use crate::domain::ports::StoreError;

/// Embedded migrations, shared with the test helpers.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Readiness gate for the out-of-band database connection.
///
/// The connection is established by a background task which publishes
/// the pool through a watch channel exactly once. Store adapters wait
/// on this gate before every operation; callers bound that wait with
/// their own deadline, so a permanently absent database resolves as
/// [`StoreError::Unavailable`] instead of hanging.
#[derive(Debug, Clone)]
pub struct DatabaseHandle {
    rx: watch::Receiver<Option<SqlitePool>>,
}

impl DatabaseHandle {
    /// Create an unfired gate plus the sender that fires it.
    pub fn channel() -> (watch::Sender<Option<SqlitePool>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self { rx })
    }

    /// Gate that is ready from the start. Useful when the pool already
    /// exists, as in integration tests.
    pub fn ready(pool: SqlitePool) -> Self {
        let (_tx, rx) = watch::channel(Some(pool));
        Self { rx }
    }

    /// Non-blocking readiness check.
    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until the connection task has published the pool.
    ///
    /// Does not time out on its own; callers wrap it in their request
    /// deadline. Returns `Unavailable` if the gate is torn down before
    /// it ever fires.
    pub async fn wait_ready(&self) -> Result<SqlitePool, StoreError> {
        let mut rx = self.rx.clone();
        let guard = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| StoreError::Unavailable)?;
        guard.as_ref().cloned().ok_or(StoreError::Unavailable)
    }

    /// Wait for readiness with an explicit deadline.
    pub async fn wait_ready_timeout(&self, budget: Duration) -> Result<SqlitePool, StoreError> {
        tokio::time::timeout(budget, self.wait_ready())
            .await
            .map_err(|_| StoreError::Unavailable)?
    }
}

/// Establish the SQLite connection out-of-band.
///
/// Retries until a connection succeeds and migrations have run, then
/// fires the readiness gate once. Lookups proceed meanwhile and treat
/// the store tier as a miss.
pub fn connect_in_background(config: DatabaseConfig) -> DatabaseHandle {
    let (tx, handle) = DatabaseHandle::channel();

    tokio::spawn(async move {
        let retry_interval = Duration::from_secs(config.retry_interval_secs.max(1));
        loop {
            match try_connect(&config).await {
                Ok(pool) => {
                    info!(url = %config.url, "connected to database");
                    let _ = tx.send(Some(pool));
                    return;
                }
                Err(err) => {
                    warn!(url = %config.url, error = %err, "database connection failed, retrying");
                    tokio::time::sleep(retry_interval).await;
                }
            }
        }
    });

    handle
}

async fn try_connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .context("invalid database URL")?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await
        .context("failed to open connection pool")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("database ping failed")?;

    MIGRATOR.run(&pool).await.context("migrations failed")?;

    Ok(pool)
}
