pub mod openweather;
pub mod sample;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;
use self::types::{CurrentResponse, ForecastResponse};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rate limited, retry after: {0}s")]
    RateLimited(u64),
    #[error("API error: {0}")]
    Api(String),
}

/// Provider of weather data for a free-text location.
#[async_trait]
pub trait WeatherSource {
    async fn fetch_current(&self, location: &str) -> Result<CurrentResponse, SourceError>;
    async fn fetch_forecast(&self, location: &str) -> Result<ForecastResponse, SourceError>;
}
