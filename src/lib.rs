//! Climate API
//!
//! Read-only JSON endpoints over a climate observations dataset of station
//! metadata and daily precipitation and temperature measurements.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod web;
pub mod window;

// Re-export core types for public API
pub use api::AppState;
pub use config::ClimateApiConfig;
pub use dataset::Dataset;
pub use error::ClimateApiError;
pub use models::{Measurement, Station, TemperatureObservation, TemperatureStats};
pub use window::QueryWindow;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod test_support;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
