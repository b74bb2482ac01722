use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub sys: CurrentSys,
    pub main: CurrentMain,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    #[serde(default)]
    pub dt: i64,
    /// Shift from UTC in seconds for the requested location.
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub aqi: i64,
    #[serde(default)]
    pub uvi: f64,
    #[serde(default, rename = "uvForecast")]
    pub uv_forecast: Vec<UvForecastPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvForecastPoint {
    pub time: String,
    pub uv: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    #[serde(default)]
    pub rain: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub snow: Option<HashMap<String, f64>>,
}
