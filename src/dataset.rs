//! Read-only access to the climate observations store
//!
//! The store is a pre-populated SQLite file with two tables, `measurement`
//! and `station`. Every query here is a plain read; shaping the rows into
//! API responses happens in [`crate::api`].

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;
use crate::models::{AggregateRow, PrecipitationRow, TemperatureRow, TemperatureStats};
use crate::{ClimateApiError, Result};

const STATS_SINCE: &str = "SELECT MIN(tobs) AS min_temp, MAX(tobs) AS max_temp, AVG(tobs) AS avg_temp \
     FROM measurement WHERE date >= ?1";

const STATS_BETWEEN: &str = "SELECT MIN(tobs) AS min_temp, MAX(tobs) AS max_temp, AVG(tobs) AS avg_temp \
     FROM measurement WHERE date >= ?1 AND date <= ?2";

/// Shared handle on the dataset; cloning shares the underlying pool
#[derive(Debug, Clone)]
pub struct Dataset {
    pool: SqlitePool,
}

impl Dataset {
    /// Open the SQLite file read-only. A missing file is an error, never created.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let path = Path::new(&config.path);
        if !path.exists() {
            return Err(ClimateApiError::config(format!(
                "Dataset file not found: {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            "Opened dataset {} with up to {} connections",
            config.path, config.max_connections
        );
        Ok(Self { pool })
    }

    /// Wrap an already-connected pool
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// All `(date, prcp)` pairs with `date >= min_date`, in store order
    #[instrument(level = "debug", skip(self))]
    pub async fn measurements_since(&self, min_date: &str) -> Result<Vec<PrecipitationRow>> {
        let rows = sqlx::query_as::<_, PrecipitationRow>(
            "SELECT date, prcp FROM measurement WHERE date >= ?1",
        )
        .bind(min_date)
        .fetch_all(&self.pool)
        .await?;
        debug!("Fetched {} precipitation rows", rows.len());
        Ok(rows)
    }

    /// Every station id in the `station` table
    #[instrument(level = "debug", skip(self))]
    pub async fn all_stations(&self) -> Result<Vec<String>> {
        let stations = sqlx::query_scalar::<_, String>("SELECT station FROM station")
            .fetch_all(&self.pool)
            .await?;
        Ok(stations)
    }

    /// `(date, tobs)` pairs for one station with `date >= min_date`
    #[instrument(level = "debug", skip(self))]
    pub async fn measurements_for_station_since(
        &self,
        station_id: &str,
        min_date: &str,
    ) -> Result<Vec<TemperatureRow>> {
        let rows = sqlx::query_as::<_, TemperatureRow>(
            "SELECT date, tobs FROM measurement WHERE station = ?1 AND date >= ?2",
        )
        .bind(station_id)
        .bind(min_date)
        .fetch_all(&self.pool)
        .await?;
        debug!("Fetched {} temperature rows", rows.len());
        Ok(rows)
    }

    /// Min, max and mean temperature for `min_date <= date [<= max_date]`.
    ///
    /// Returns `None` when no measurement falls in the range. SQLite answers an
    /// aggregate over an empty set with a single all-NULL row, which is treated
    /// the same as no row at all.
    #[instrument(level = "debug", skip(self))]
    pub async fn temperature_stats(
        &self,
        min_date: &str,
        max_date: Option<&str>,
    ) -> Result<Option<TemperatureStats>> {
        let row = match max_date {
            Some(max_date) => {
                sqlx::query_as::<_, AggregateRow>(STATS_BETWEEN)
                    .bind(min_date)
                    .bind(max_date)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, AggregateRow>(STATS_SINCE)
                    .bind(min_date)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row.and_then(AggregateRow::into_stats))
    }

    /// Most recent measurement date, `None` for an empty table
    #[instrument(level = "debug", skip(self))]
    pub async fn latest_measurement_date(&self) -> Result<Option<String>> {
        let date = sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;
        Ok(date)
    }

    /// Station with the most measurements; ties go to the lowest station id
    #[instrument(level = "debug", skip(self))]
    pub async fn most_active_station(&self) -> Result<Option<String>> {
        let station = sqlx::query_scalar::<_, String>(
            "SELECT station FROM measurement GROUP BY station \
             ORDER BY COUNT(*) DESC, station ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(station)
    }
}
