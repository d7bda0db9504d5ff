//! Row types read from the dataset and the JSON shapes returned by the API

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One observation record from the `measurement` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Measurement {
    pub station: String,
    /// ISO 8601 date, stored as text
    pub date: String,
    /// Precipitation, missing for some observations
    pub prcp: Option<f64>,
    /// Temperature observation
    pub tobs: f64,
}

/// Metadata record from the `station` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// `(date, prcp)` projection of a measurement
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PrecipitationRow {
    pub date: String,
    pub prcp: Option<f64>,
}

/// `(date, tobs)` projection of a measurement
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TemperatureRow {
    pub date: String,
    pub tobs: f64,
}

/// Aggregate row as returned by SQLite, which yields NULLs over an empty set
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct AggregateRow {
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub avg_temp: Option<f64>,
}

/// Temperature statistics over a date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
}

impl AggregateRow {
    /// Statistics when every aggregate is present, `None` for an empty range
    #[must_use]
    pub fn into_stats(self) -> Option<TemperatureStats> {
        match (self.min_temp, self.max_temp, self.avg_temp) {
            (Some(min_temp), Some(max_temp), Some(avg_temp)) => Some(TemperatureStats {
                min_temp,
                max_temp,
                avg_temp,
            }),
            _ => None,
        }
    }
}

/// Element of the tobs response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

impl From<TemperatureRow> for TemperatureObservation {
    fn from(row: TemperatureRow) -> Self {
        Self {
            date: row.date,
            temperature: row.tobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_observation_field_names() {
        let observation = TemperatureObservation::from(TemperatureRow {
            date: "2017-08-24".to_string(),
            tobs: 80.1,
        });
        let json = serde_json::to_value(&observation).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Date": "2017-08-24", "Temperature": 80.1})
        );
    }

    #[test]
    fn test_aggregate_row_with_values() {
        let row = AggregateRow {
            min_temp: Some(58.0),
            max_temp: Some(87.0),
            avg_temp: Some(74.5),
        };
        let stats = row.into_stats().unwrap();
        assert_eq!(stats.min_temp, 58.0);
        assert_eq!(stats.max_temp, 87.0);
        assert_eq!(stats.avg_temp, 74.5);
    }

    #[test]
    fn test_aggregate_row_all_null_is_empty() {
        let row = AggregateRow {
            min_temp: None,
            max_temp: None,
            avg_temp: None,
        };
        assert!(row.into_stats().is_none());
    }

    #[test]
    fn test_stats_serialization_keys() {
        let stats = TemperatureStats {
            min_temp: 1.0,
            max_temp: 3.0,
            avg_temp: 2.0,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"min_temp": 1.0, "max_temp": 3.0, "avg_temp": 2.0})
        );
    }
}
