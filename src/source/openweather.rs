use super::types::{CurrentResponse, ForecastResponse};
use super::{SourceError, WeatherSource};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    current_path: String,
    forecast_path: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let api_key = config
            .openweather_api_key
            .clone()
            .ok_or_else(|| SourceError::Api("OPENWEATHER_API_KEY not set".to_string()))?;

        let client = Client::builder()
            .user_agent("Weathry/1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.openweather_base_url.clone(),
            current_path: config.openweather_current_path.clone(),
            forecast_path: config.openweather_forecast_path.clone(),
            units: config.units.clone(),
        })
    }

    async fn make_request_with_retry(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, SourceError> {
        let mut retry_count = 0;
        let max_retries = 3;
        let mut delay = Duration::from_millis(1000);

        loop {
            let response = self.client.get(url).query(params).send().await?;

            match response.status() {
                reqwest::StatusCode::OK => {
                    let json: Value = response.json().await?;
                    return Ok(json);
                }
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    if retry_count >= max_retries {
                        return Err(SourceError::RateLimited(delay.as_secs()));
                    }

                    tracing::warn!(
                        "Rate limited by OpenWeather API, retrying in {}ms",
                        delay.as_millis()
                    );

                    sleep(delay).await;
                    delay = delay.mul_f32(2.0 + fastrand::f32() * 0.5); // Exponential backoff with jitter
                    retry_count += 1;
                }
                status => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(SourceError::Api(format!("HTTP {}: {}", status, error_text)));
                }
            }
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, location: &str) -> Result<CurrentResponse, SourceError> {
        let url = format!("{}{}", self.base_url, self.current_path);

        let response = self
            .make_request_with_retry(
                &url,
                &[
                    ("q", location),
                    ("units", &self.units),
                    ("appid", &self.api_key),
                ],
            )
            .await?;

        let current: CurrentResponse = serde_json::from_value(response)?;
        Ok(current)
    }

    async fn fetch_forecast(&self, location: &str) -> Result<ForecastResponse, SourceError> {
        let url = format!("{}{}", self.base_url, self.forecast_path);

        let response = self
            .make_request_with_retry(
                &url,
                &[
                    ("q", location),
                    ("units", &self.units),
                    ("appid", &self.api_key),
                ],
            )
            .await?;

        let forecast: ForecastResponse = serde_json::from_value(response)?;
        Ok(forecast)
    }
}
