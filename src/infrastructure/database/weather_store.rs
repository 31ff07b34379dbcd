use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::connection::DatabaseHandle;
use crate::domain::models::{Coord, LookupKey, Weather, WeatherCondition, WeatherMain};
use crate::domain::ports::{EntityStore, StoreError};

/// SQLite implementation of `EntityStore<Weather>`.
///
/// Rows are keyed by the canonical city name. The nested coordinate,
/// condition, and measurement structures are stored as JSON text.
pub struct SqliteWeatherStore {
    db: DatabaseHandle,
}

impl SqliteWeatherStore {
    pub fn new(db: DatabaseHandle) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct WeatherRow {
    name: String,
    city_id: i64,
    coord: String,
    conditions: String,
    main_data: String,
}

impl WeatherRow {
    fn decode(self) -> Result<Weather, StoreError> {
        let coord: Coord = serde_json::from_str(&self.coord)
            .context("corrupt coord column")
            .map_err(StoreError::Query)?;
        let conditions: Vec<WeatherCondition> = serde_json::from_str(&self.conditions)
            .context("corrupt conditions column")
            .map_err(StoreError::Query)?;
        let main_data: WeatherMain = serde_json::from_str(&self.main_data)
            .context("corrupt main_data column")
            .map_err(StoreError::Query)?;

        Ok(Weather {
            id: self.city_id,
            coord,
            conditions,
            main_data,
            name: self.name,
        })
    }
}

#[async_trait]
impl EntityStore<Weather> for SqliteWeatherStore {
    async fn get(&self, key: &LookupKey) -> Result<Option<Weather>, StoreError> {
        let pool = self.db.wait_ready().await?;

        let row = sqlx::query_as::<_, WeatherRow>(
            r"
            SELECT name, city_id, coord, conditions, main_data
            FROM weather
            WHERE name = ?
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&pool)
        .await
        .map_err(|err| {
            StoreError::Query(anyhow::Error::new(err).context("weather lookup failed"))
        })?;

        row.map(WeatherRow::decode).transpose()
    }

    async fn insert(&self, key: &LookupKey, weather: &Weather) -> Result<(), StoreError> {
        let pool = self.db.wait_ready().await?;

        let coord = serde_json::to_string(&weather.coord)
            .context("failed to serialize coord")
            .map_err(StoreError::Query)?;
        let conditions = serde_json::to_string(&weather.conditions)
            .context("failed to serialize conditions")
            .map_err(StoreError::Query)?;
        let main_data = serde_json::to_string(&weather.main_data)
            .context("failed to serialize main_data")
            .map_err(StoreError::Query)?;

        sqlx::query(
            r"
            INSERT INTO weather (name, city_id, coord, conditions, main_data, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(key.as_str())
        .bind(weather.id)
        .bind(coord)
        .bind(conditions)
        .bind(main_data)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .context("weather insert failed")
        .map_err(StoreError::Query)?;

        Ok(())
    }
}
