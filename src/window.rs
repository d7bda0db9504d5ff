//! One-year lookback window used by the precipitation and tobs routes

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use crate::config::QueryConfig;
use crate::dataset::Dataset;
use crate::{ClimateApiError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reference date, lookback length and the station reported by `/tobs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    reference_date: NaiveDate,
    lookback_days: u32,
    station_id: String,
}

impl QueryWindow {
    pub fn fixed(reference_date: &str, station_id: &str, lookback_days: u32) -> Result<Self> {
        Ok(Self {
            reference_date: parse_date(reference_date)?,
            lookback_days,
            station_id: station_id.to_string(),
        })
    }

    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        Self::fixed(&config.reference_date, &config.station_id, config.lookback_days)
    }

    /// Replace the reference date and station with values computed from the
    /// dataset. Anything the dataset cannot supply keeps the configured value.
    pub async fn derive(dataset: &Dataset, fallback: Self) -> Result<Self> {
        let mut window = fallback;

        match dataset.latest_measurement_date().await? {
            Some(latest) => match parse_date(&latest) {
                Ok(date) => window.reference_date = date,
                Err(_) => warn!("Latest measurement date '{}' is not YYYY-MM-DD", latest),
            },
            None => warn!("No measurements found, keeping configured reference date"),
        }

        match dataset.most_active_station().await? {
            Some(station) => window.station_id = station,
            None => warn!("No measurements found, keeping configured station"),
        }

        info!(
            "Derived query window: reference date {}, station {}",
            window.reference_date, window.station_id
        );
        Ok(window)
    }

    #[must_use]
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    #[must_use]
    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Earliest date included, as a string comparable with the stored dates
    #[must_use]
    pub fn lower_bound(&self) -> String {
        (self.reference_date - Duration::days(i64::from(self.lookback_days)))
            .format(DATE_FORMAT)
            .to_string()
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ClimateApiError::invalid_date(value))
}
