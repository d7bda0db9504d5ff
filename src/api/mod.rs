//! Route handlers for the climate API
//!
//! Each handler translates its path parameters into a dataset query and
//! shapes the rows into the route's JSON contract.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::{Html, Json},
    routing::get,
};
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::NO_DATA_MESSAGE;
use crate::models::{TemperatureObservation, TemperatureStats};
use crate::window::QueryWindow;
use crate::{ClimateApiError, Result};

/// Version prefix the JSON routes are mounted under
pub const API_PREFIX: &str = "/api/v1.0";

const INDEX_HTML: &str = "Welcome to the Climate App API!<br/>\
Available Routes:<br/>\
<a href='/api/v1.0/precipitation'>/api/v1.0/precipitation</a><br/>\
<a href='/api/v1.0/stations'>/api/v1.0/stations</a><br/>\
<a href='/api/v1.0/tobs'>/api/v1.0/tobs</a><br/>\
/api/v1.0/temp_stats/&lt;start_date&gt;<br/>\
/api/v1.0/temp_stats/&lt;start_date&gt;/&lt;end_date&gt;<br/>";

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Dataset,
    pub window: Arc<QueryWindow>,
}

impl AppState {
    #[must_use]
    pub fn new(dataset: Dataset, window: QueryWindow) -> Self {
        Self {
            dataset,
            window: Arc::new(window),
        }
    }
}

/// Date to precipitation; a later row for the same date replaces an earlier one
pub type PrecipitationByDate = BTreeMap<String, Option<f64>>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/precipitation", get(get_precipitation))
        .route("/stations", get(get_stations))
        .route("/tobs", get(get_tobs))
        .route("/temp_stats/{start_date}", get(get_temp_stats_since))
        .route("/temp_stats/{start_date}/{end_date}", get(get_temp_stats_between))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_precipitation(State(state): State<AppState>) -> Result<Json<PrecipitationByDate>> {
    let rows = state
        .dataset
        .measurements_since(&state.window.lower_bound())
        .await?;

    let by_date: PrecipitationByDate = rows.into_iter().map(|row| (row.date, row.prcp)).collect();
    Ok(Json(by_date))
}

async fn get_stations(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.dataset.all_stations().await?))
}

async fn get_tobs(State(state): State<AppState>) -> Result<Json<Vec<TemperatureObservation>>> {
    let rows = state
        .dataset
        .measurements_for_station_since(state.window.station_id(), &state.window.lower_bound())
        .await?;

    Ok(Json(rows.into_iter().map(TemperatureObservation::from).collect()))
}

async fn get_temp_stats_since(
    State(state): State<AppState>,
    Path(start_date): Path<String>,
) -> Result<Json<TemperatureStats>> {
    temperature_stats(&state.dataset, &start_date, None).await
}

async fn get_temp_stats_between(
    State(state): State<AppState>,
    Path((start_date, end_date)): Path<(String, String)>,
) -> Result<Json<TemperatureStats>> {
    temperature_stats(&state.dataset, &start_date, Some(&end_date)).await
}

async fn temperature_stats(
    dataset: &Dataset,
    start_date: &str,
    end_date: Option<&str>,
) -> Result<Json<TemperatureStats>> {
    match dataset.temperature_stats(start_date, end_date).await? {
        Some(stats) => Ok(Json(stats)),
        None => {
            debug!("No measurements between {} and {:?}", start_date, end_date);
            Err(ClimateApiError::not_found(NO_DATA_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::test_support::{measurement, seeded_dataset, station};

    async fn state() -> AppState {
        let dataset = seeded_dataset(
            &[
                measurement("USC00519281", "2017-08-24", Some(0.5), 80.1),
                measurement("USC00519281", "2016-01-01", Some(0.0), 75.0),
                measurement("USC00513117", "2017-03-01", Some(0.3), 71.0),
                measurement("USC00519397", "2017-03-01", None, 72.0),
            ],
            &[station("USC00519281"), station("USC00513117")],
        )
        .await;
        let window = QueryWindow::from_config(&QueryConfig::default()).unwrap();
        AppState::new(dataset, window)
    }

    #[tokio::test]
    async fn test_index_lists_routes() {
        let Html(body) = index().await;
        assert!(body.contains("<a href='/api/v1.0/precipitation'>"));
        assert!(body.contains("<a href='/api/v1.0/stations'>"));
        assert!(body.contains("<a href='/api/v1.0/tobs'>"));
    }

    #[tokio::test]
    async fn test_precipitation_last_row_wins() {
        let Json(by_date) = get_precipitation(State(state().await)).await.unwrap();
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date.get("2017-08-24"), Some(&Some(0.5)));
        // second 2017-03-01 row has no precipitation
        assert_eq!(by_date.get("2017-03-01"), Some(&None));
        assert!(!by_date.contains_key("2016-01-01"));
    }

    #[tokio::test]
    async fn test_tobs_uses_window_station() {
        let Json(observations) = get_tobs(State(state().await)).await.unwrap();
        assert_eq!(
            observations,
            vec![TemperatureObservation {
                date: "2017-08-24".to_string(),
                temperature: 80.1,
            }]
        );
    }

    #[tokio::test]
    async fn test_temp_stats_not_found() {
        let result = get_temp_stats_since(State(state().await), Path("2018-01-01".to_string())).await;
        match result {
            Err(ClimateApiError::NotFound { message }) => assert_eq!(message, NO_DATA_MESSAGE),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_temp_stats_between() {
        let Json(stats) = get_temp_stats_between(
            State(state().await),
            Path(("2017-01-01".to_string(), "2017-12-31".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(stats.min_temp, 71.0);
        assert_eq!(stats.max_temp, 80.1);
        assert!(stats.min_temp <= stats.avg_temp && stats.avg_temp <= stats.max_temp);
    }
}
