use super::types::*;
use super::{SourceError, WeatherSource};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;

const THREE_HOURS: i64 = 3 * 3600;

/// In-memory stand-in for the remote API, used when no API key is configured
/// and as the default data source in tests.
pub struct SampleWeatherSource;

impl SampleWeatherSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WeatherSource for SampleWeatherSource {
    async fn fetch_current(&self, location: &str) -> Result<CurrentResponse, SourceError> {
        let now = Utc::now();
        let (city, region) = split_location(location);

        // Diurnal temperature variation around a mild baseline
        let hour_frac = (now.timestamp() % 86_400) as f64 / 86_400.0;
        let temp = 18.0 + 6.0 * (hour_frac * std::f64::consts::TAU).sin();

        let start_of_day = now.timestamp() - now.timestamp() % 86_400;

        let uv_forecast = (12..17)
            .map(|hour| UvForecastPoint {
                time: format!("{} PM", hour - 12 + 1),
                uv: 4.0 + 3.0 * fastrand::f64(),
            })
            .collect();

        Ok(CurrentResponse {
            name: city,
            sys: CurrentSys {
                country: region,
                sunrise: start_of_day + 6 * 3600 + 42 * 60,
                sunset: start_of_day + 19 * 3600 + 23 * 60,
            },
            main: CurrentMain {
                temp,
                feels_like: temp - 1.5,
                temp_min: temp - 4.0,
                temp_max: temp + 3.0,
                pressure: 1010.0 + 8.0 * fastrand::f64(),
                humidity: 45.0 + 30.0 * fastrand::f64(),
            },
            weather: vec![WeatherCondition {
                main: "Clouds".to_string(),
                description: "scattered clouds".to_string(),
            }],
            wind: Wind {
                speed: 2.0 + 4.0 * fastrand::f64(),
                deg: 360.0 * fastrand::f64(),
            },
            dt: now.timestamp(),
            timezone: 0,
            aqi: 42,
            uvi: 6.0,
            uv_forecast,
        })
    }

    async fn fetch_forecast(&self, _location: &str) -> Result<ForecastResponse, SourceError> {
        // Align entries to 3-hour boundaries like the real forecast endpoint
        let base = (Utc::now().timestamp() / THREE_HOURS) * THREE_HOURS;

        let list = (0..16)
            .map(|step| {
                let mut rain = None;
                let mut snow = None;
                if step % 4 == 1 {
                    // Occasional rain
                    let mut amounts = HashMap::new();
                    amounts.insert("3h".to_string(), (1.0 + fastrand::f64() * 29.0).round() / 10.0);
                    rain = Some(amounts);
                } else if step == 11 {
                    let mut amounts = HashMap::new();
                    amounts.insert("3h".to_string(), 0.5);
                    snow = Some(amounts);
                }

                ForecastEntry {
                    dt: base + step * THREE_HOURS,
                    rain,
                    snow,
                }
            })
            .collect();

        Ok(ForecastResponse { list })
    }
}

fn split_location(location: &str) -> (String, String) {
    match location.split_once(',') {
        Some((city, region)) => (city.trim().to_string(), region.trim().to_string()),
        None => (location.trim().to_string(), "US".to_string()),
    }
}
