//! Error types and handling for the climate API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message returned when an aggregate query matches no measurements
pub const NO_DATA_MESSAGE: &str = "No data available for the specified date range";

/// Main error type for the climate API
#[derive(Error, Debug)]
pub enum ClimateApiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Query matched nothing where a result is required
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A date literal that could not be parsed as `YYYY-MM-DD`
    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    /// Connectivity or query execution errors from the store
    #[error("Database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },
}

impl ClimateApiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new invalid-date error
    pub fn invalid_date<S: Into<String>>(value: S) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// HTTP status this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClimateApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateApiError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            ClimateApiError::NotFound { message } => message.clone(),
            ClimateApiError::InvalidDate { value } => {
                format!("Invalid date '{value}', expected YYYY-MM-DD")
            }
            ClimateApiError::Database { .. } => {
                "Unable to read the climate dataset. Please check the database file.".to_string()
            }
        }
    }
}

/// JSON body of a 404 response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ClimateApiError {
    fn into_response(self) -> Response {
        match self {
            ClimateApiError::NotFound { message } => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error: message })).into_response()
            }
            other => {
                tracing::error!("Request failed: {} ({})", other.user_message(), other);
                other.status_code().into_response()
            }
        }
    }
}
