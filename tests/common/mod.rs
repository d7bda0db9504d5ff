//! Store fixtures shared by the unit tests in `src/` and the tests in `tests/`
//!
//! The including crate root must have `Dataset`, `Measurement` and `Station`
//! in scope.
#![allow(dead_code)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use super::{Dataset, Measurement, Station};

/// `measurement` table as laid out in the hawaii store
pub const MEASUREMENT_TABLE: &str = "CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT)";

/// `station` table as laid out in the hawaii store
pub const STATION_TABLE: &str = "CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT, name TEXT, latitude FLOAT, longitude FLOAT, elevation FLOAT)";

pub fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

pub fn station(id: &str) -> Station {
    Station {
        station: id.to_string(),
        name: format!("{id} name"),
        latitude: 21.2716,
        longitude: -157.8168,
        elevation: 3.0,
    }
}

/// Create both tables and insert the given rows
pub async fn populate(pool: &SqlitePool, measurements: &[Measurement], stations: &[Station]) {
    sqlx::query(MEASUREMENT_TABLE).execute(pool).await.unwrap();
    sqlx::query(STATION_TABLE).execute(pool).await.unwrap();

    for m in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)")
            .bind(&m.station)
            .bind(&m.date)
            .bind(m.prcp)
            .bind(m.tobs)
            .execute(pool)
            .await
            .unwrap();
    }
    for s in stations {
        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&s.station)
        .bind(&s.name)
        .bind(s.latitude)
        .bind(s.longitude)
        .bind(s.elevation)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// Single-connection in-memory pool, kept open for the life of the test
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

pub async fn seeded_dataset(measurements: &[Measurement], stations: &[Station]) -> Dataset {
    let pool = memory_pool().await;
    populate(&pool, measurements, stations).await;
    Dataset::from_pool(pool)
}
