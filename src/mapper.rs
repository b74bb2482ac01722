//! Pure transformations from raw weather payloads to per-section prop
//! bundles. Each mapper produces exactly the shape its section renders; no
//! mapper touches shared state.

use crate::sections::props_from;
use crate::source::types::{CurrentResponse, ForecastEntry, ForecastResponse};
use chrono::{DateTime, FixedOffset};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Number of 3-hour forecast entries kept for display (24 hours).
const PRECIPITATION_ENTRIES: usize = 8;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Response has no weather condition entries")]
    MissingCondition,
    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("UTC offset of {0}s is out of range")]
    InvalidOffset(i32),
}

pub fn main_props(current: &CurrentResponse) -> Result<Map<String, Value>, MapError> {
    let condition = current.weather.first().ok_or(MapError::MissingCondition)?;

    Ok(props_from(json!({
        "city": current.name,
        "region": current.sys.country,
        "temperature": format_temp(current.main.temp),
        "condition": condition.main,
        "feelsLike": format_temp(current.main.feels_like),
        "highTemp": format_temp(current.main.temp_max),
        "lowTemp": format_temp(current.main.temp_min),
        "lastUpdated": local_clock(current.dt, current.timezone)?,
        "sunrise": local_clock(current.sys.sunrise, current.timezone)?,
        "sunset": local_clock(current.sys.sunset, current.timezone)?,
    })))
}

pub fn metrics_props(current: &CurrentResponse) -> Map<String, Value> {
    props_from(json!({
        "city": current.name,
        "windSpeed": current.wind.speed,
        "windDirection": current.wind.deg,
        "pressure": current.main.pressure,
        "humidity": current.main.humidity,
    }))
}

pub fn air_quality_props(current: &CurrentResponse) -> Map<String, Value> {
    props_from(json!({
        "city": current.name,
        "aqi": current.aqi,
        "description": aqi_bucket(current.aqi),
    }))
}

pub fn precipitation_props(
    current: &CurrentResponse,
    forecast: &ForecastResponse,
) -> Result<Map<String, Value>, MapError> {
    let entries = forecast
        .list
        .iter()
        .take(PRECIPITATION_ENTRIES)
        .map(|entry| precipitation_entry(entry, current.timezone))
        .collect::<Result<Vec<Value>, MapError>>()?;

    Ok(props_from(json!({ "forecast": entries })))
}

pub fn uv_props(current: &CurrentResponse) -> Map<String, Value> {
    props_from(json!({
        "city": current.name,
        "currentUv": current.uvi,
        "forecast": current.uv_forecast,
    }))
}

/// EPA-style descriptive bucket for an AQI value. Upper bounds are inclusive
/// and checked in ascending order.
pub fn aqi_bucket(aqi: i64) -> &'static str {
    match aqi {
        v if v <= 50 => "Good",
        v if v <= 100 => "Moderate",
        v if v <= 150 => "Unhealthy for Sensitive Groups",
        v if v <= 200 => "Unhealthy",
        v if v <= 300 => "Very Unhealthy",
        _ => "Hazardous",
    }
}

fn precipitation_entry(entry: &ForecastEntry, offset_secs: i32) -> Result<Value, MapError> {
    let rain = entry.rain.as_ref().and_then(|r| r.get("3h")).copied();
    let snow = entry.snow.as_ref().and_then(|s| s.get("3h")).copied();

    let (kind, amount) = match (rain, snow) {
        (Some(mm), _) => ("rain", format!("{} mm", mm)),
        (None, Some(mm)) => ("snow", format!("{} mm", mm)),
        (None, None) => ("clear", "0 mm".to_string()),
    };

    Ok(json!({
        "time": local_clock(entry.dt, offset_secs)?,
        "type": kind,
        "amount": amount,
    }))
}

fn format_temp(value: f64) -> String {
    format!("{:.1}", value)
}

/// Renders an epoch-seconds instant as a time-of-day string in the
/// location's UTC offset, e.g. `2:30 PM`.
fn local_clock(epoch: i64, offset_secs: i32) -> Result<String, MapError> {
    let offset =
        FixedOffset::east_opt(offset_secs).ok_or(MapError::InvalidOffset(offset_secs))?;
    let instant =
        DateTime::from_timestamp(epoch, 0).ok_or(MapError::InvalidTimestamp(epoch))?;

    Ok(instant.with_timezone(&offset).format("%-I:%M %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::types::{CurrentMain, CurrentSys, UvForecastPoint, WeatherCondition, Wind};
    use std::collections::HashMap;

    // 2023-11-14T22:13:20Z
    const EPOCH: i64 = 1_700_000_000;

    fn current_fixture() -> CurrentResponse {
        CurrentResponse {
            name: "San Francisco".to_string(),
            sys: CurrentSys {
                country: "US".to_string(),
                sunrise: EPOCH - 8 * 3600,
                sunset: EPOCH + 3600,
            },
            main: CurrentMain {
                temp: 21.96,
                feels_like: 20.4,
                temp_min: 17.0,
                temp_max: 24.32,
                pressure: 1013.0,
                humidity: 45.0,
            },
            weather: vec![WeatherCondition {
                main: "Clouds".to_string(),
                description: "scattered clouds".to_string(),
            }],
            wind: Wind {
                speed: 3.8,
                deg: 247.5,
            },
            dt: EPOCH,
            timezone: 0,
            aqi: 42,
            uvi: 6.0,
            uv_forecast: vec![UvForecastPoint {
                time: "12 PM".to_string(),
                uv: 5.0,
            }],
        }
    }

    fn rain_entry(dt: i64, mm: f64) -> ForecastEntry {
        let mut amounts = HashMap::new();
        amounts.insert("3h".to_string(), mm);
        ForecastEntry {
            dt,
            rain: Some(amounts),
            snow: None,
        }
    }

    fn snow_entry(dt: i64, mm: f64) -> ForecastEntry {
        let mut amounts = HashMap::new();
        amounts.insert("3h".to_string(), mm);
        ForecastEntry {
            dt,
            rain: None,
            snow: Some(amounts),
        }
    }

    fn clear_entry(dt: i64) -> ForecastEntry {
        ForecastEntry {
            dt,
            rain: None,
            snow: None,
        }
    }

    #[test]
    fn test_temperature_rounds_to_one_decimal() {
        let props = main_props(&current_fixture()).unwrap();

        assert_eq!(props["temperature"], "22.0");
        assert_eq!(props["highTemp"], "24.3");
        assert_eq!(props["feelsLike"], "20.4");
    }

    #[test]
    fn test_main_props_render_local_times() {
        let props = main_props(&current_fixture()).unwrap();

        assert_eq!(props["lastUpdated"], "10:13 PM");
        assert_eq!(props["sunrise"], "2:13 PM");
        assert_eq!(props["sunset"], "11:13 PM");
    }

    #[test]
    fn test_main_props_honor_timezone_offset() {
        let mut current = current_fixture();
        current.timezone = 3600;

        let props = main_props(&current).unwrap();
        assert_eq!(props["lastUpdated"], "11:13 PM");
    }

    #[test]
    fn test_missing_condition_is_an_error() {
        let mut current = current_fixture();
        current.weather.clear();

        assert!(matches!(
            main_props(&current),
            Err(MapError::MissingCondition)
        ));
    }

    #[test]
    fn test_metrics_pass_through_verbatim() {
        let props = metrics_props(&current_fixture());

        assert_eq!(props["windSpeed"], 3.8);
        assert_eq!(props["windDirection"], 247.5);
        assert_eq!(props["pressure"], 1013.0);
        assert_eq!(props["humidity"], 45.0);
        assert_eq!(props["city"], "San Francisco");
    }

    #[test]
    fn test_aqi_buckets_at_boundaries() {
        assert_eq!(aqi_bucket(0), "Good");
        assert_eq!(aqi_bucket(50), "Good");
        assert_eq!(aqi_bucket(51), "Moderate");
        assert_eq!(aqi_bucket(75), "Moderate");
        assert_eq!(aqi_bucket(100), "Moderate");
        assert_eq!(aqi_bucket(150), "Unhealthy for Sensitive Groups");
        assert_eq!(aqi_bucket(200), "Unhealthy");
        assert_eq!(aqi_bucket(300), "Very Unhealthy");
        assert_eq!(aqi_bucket(301), "Hazardous");
    }

    #[test]
    fn test_aqi_severity_is_monotonic() {
        let order = [
            "Good",
            "Moderate",
            "Unhealthy for Sensitive Groups",
            "Unhealthy",
            "Very Unhealthy",
            "Hazardous",
        ];
        let severity =
            |label: &str| order.iter().position(|l| *l == label).unwrap_or(usize::MAX);

        let mut last = 0;
        for v in 0..400 {
            let current = severity(aqi_bucket(v));
            assert!(current >= last, "severity regressed at aqi {}", v);
            last = current;
        }
    }

    #[test]
    fn test_air_quality_props_describe_bucket() {
        let mut current = current_fixture();
        current.aqi = 75;

        let props = air_quality_props(&current);
        assert_eq!(props["aqi"], 75);
        assert_eq!(props["description"], "Moderate");
    }

    #[test]
    fn test_precipitation_caps_at_eight_entries_in_order() {
        let list: Vec<ForecastEntry> = (0..12)
            .map(|i| clear_entry(EPOCH + i * 3 * 3600))
            .collect();
        let forecast = ForecastResponse { list };

        let props = precipitation_props(&current_fixture(), &forecast).unwrap();
        let entries = props["forecast"].as_array().unwrap();

        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0]["time"], "10:13 PM");
        assert_eq!(entries[1]["time"], "1:13 AM");
    }

    #[test]
    fn test_precipitation_kinds_and_amounts() {
        let forecast = ForecastResponse {
            list: vec![
                rain_entry(EPOCH, 0.5),
                snow_entry(EPOCH + 3 * 3600, 1.2),
                clear_entry(EPOCH + 6 * 3600),
            ],
        };

        let props = precipitation_props(&current_fixture(), &forecast).unwrap();
        let entries = props["forecast"].as_array().unwrap();

        assert_eq!(entries[0]["type"], "rain");
        assert_eq!(entries[0]["amount"], "0.5 mm");
        assert_eq!(entries[1]["type"], "snow");
        assert_eq!(entries[1]["amount"], "1.2 mm");
        assert_eq!(entries[2]["type"], "clear");
        assert_eq!(entries[2]["amount"], "0 mm");
    }

    #[test]
    fn test_rain_wins_when_both_amounts_present() {
        let mut entry = rain_entry(EPOCH, 0.4);
        let mut snow = HashMap::new();
        snow.insert("3h".to_string(), 0.9);
        entry.snow = Some(snow);

        let forecast = ForecastResponse { list: vec![entry] };
        let props = precipitation_props(&current_fixture(), &forecast).unwrap();

        assert_eq!(props["forecast"][0]["type"], "rain");
    }

    #[test]
    fn test_uv_props_pass_through() {
        let props = uv_props(&current_fixture());

        assert_eq!(props["currentUv"], 6.0);
        assert_eq!(props["city"], "San Francisco");
        assert_eq!(props["forecast"][0]["uv"], 5.0);
    }

    #[test]
    fn test_invalid_timestamp_is_an_error() {
        let mut current = current_fixture();
        current.dt = i64::MAX;

        assert!(matches!(
            main_props(&current),
            Err(MapError::InvalidTimestamp(_))
        ));
    }
}
