use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::connection::DatabaseHandle;
use crate::domain::models::{LookupKey, Movie};
use crate::domain::ports::{EntityStore, StoreError};

/// SQLite implementation of `EntityStore<Movie>`.
///
/// Rows are keyed by the canonical title. Every operation waits on the
/// readiness gate first; the caller's deadline bounds that wait.
pub struct SqliteMovieStore {
    db: DatabaseHandle,
}

impl SqliteMovieStore {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct MovieRow {
    title: String,
    imdb_id: String,
    year: String,
    plot: String,
    language: String,
    poster: String,
    rating: String,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            imdb_id: row.imdb_id,
            title: row.title,
            year: row.year,
            plot: row.plot,
            language: row.language,
            poster: row.poster,
            rating: row.rating,
        }
    }
}

#[async_trait]
impl EntityStore<Movie> for SqliteMovieStore {
    async fn get(&self, key: &LookupKey) -> Result<Option<Movie>, StoreError> {
        let pool = self.db.wait_ready().await?;

        let row = sqlx::query_as::<_, MovieRow>(
            r"
            SELECT title, imdb_id, year, plot, language, poster, rating
            FROM movies
            WHERE title = ?
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&pool)
        .await
        .map_err(|err| StoreError::Query(anyhow::Error::new(err).context("movie lookup failed")))?;

        Ok(row.map(Movie::from))
    }

    async fn insert(&self, key: &LookupKey, movie: &Movie) -> Result<(), StoreError> {
        let pool = self.db.wait_ready().await?;

        sqlx::query(
            r"
            INSERT INTO movies (title, imdb_id, year, plot, language, poster, rating, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(key.as_str())
        .bind(&movie.imdb_id)
        .bind(&movie.year)
        .bind(&movie.plot)
        .bind(&movie.language)
        .bind(&movie.poster)
        .bind(&movie.rating)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .context("movie insert failed")
        .map_err(StoreError::Query)?;

        Ok(())
    }
}
