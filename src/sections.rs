use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SectionError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

/// The fixed set of display sections, in place of a per-section renderer
/// reference stored as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Main,
    Metrics,
    AirQuality,
    Precipitation,
    UvIndex,
    WindForecast,
    PollenCount,
    Astronomy,
    WeatherMap,
    Alerts,
    Hourly,
    Daily,
}

impl SectionKind {
    /// Stable identifier used to address a section in the registry.
    pub fn key(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Metrics => "metrics",
            Self::AirQuality => "aqi",
            Self::Precipitation => "precipitation",
            Self::UvIndex => "uvIndex",
            Self::WindForecast => "windForecast",
            Self::PollenCount => "pollenCount",
            Self::Astronomy => "astronomy",
            Self::WeatherMap => "weatherMap",
            Self::Alerts => "alerts",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Main => "Current Conditions",
            Self::Metrics => "Weather Metrics",
            Self::AirQuality => "Air Quality Index",
            Self::Precipitation => "Precipitation Forecast",
            Self::UvIndex => "UV Index",
            Self::WindForecast => "Wind Forecast",
            Self::PollenCount => "Pollen Count",
            Self::Astronomy => "Astronomy",
            Self::WeatherMap => "Weather Map",
            Self::Alerts => "Weather Alerts",
            Self::Hourly => "Hourly Forecast",
            Self::Daily => "Daily Forecast",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub props: Map<String, Value>,
}

/// Ordered list of sections addressed by key. Updates produce a new registry
/// so a renderer can diff against the previous one; section order and
/// membership never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    /// Registry seeded with the placeholder data shown before the first fetch.
    pub fn with_sample_data() -> Self {
        let sections = vec![
            section(
                SectionKind::Main,
                json!({
                    "city": "San Francisco",
                    "region": "CA",
                    "temperature": "72",
                    "condition": "Partly Cloudy",
                    "feelsLike": "70",
                    "highTemp": "75",
                    "lowTemp": "65",
                    "lastUpdated": "2:30 PM",
                    "sunrise": "6:42 AM",
                    "sunset": "7:23 PM",
                }),
            ),
            section(
                SectionKind::Metrics,
                json!({
                    "city": "San Francisco",
                    "windSpeed": 8.5,
                    "windDirection": 247.5,
                    "pressure": 1013,
                    "humidity": 45,
                }),
            ),
            section(
                SectionKind::AirQuality,
                json!({ "aqi": 42, "description": "Good" }),
            ),
            section(
                SectionKind::Precipitation,
                json!({
                    "forecast": [
                        { "time": "3 PM", "type": "rain", "amount": "0.1 mm" },
                        { "time": "4 PM", "type": "rain", "amount": "0.3 mm" },
                        { "time": "5 PM", "type": "rain", "amount": "0.2 mm" },
                        { "time": "6 PM", "type": "rain", "amount": "0.1 mm" },
                        { "time": "7 PM", "type": "snow", "amount": "0.5 mm" },
                    ],
                }),
            ),
            section(
                SectionKind::UvIndex,
                json!({
                    "currentUv": 6,
                    "forecast": [
                        { "time": "12 PM", "uv": 5 },
                        { "time": "1 PM", "uv": 6 },
                        { "time": "2 PM", "uv": 7 },
                        { "time": "3 PM", "uv": 6 },
                        { "time": "4 PM", "uv": 5 },
                    ],
                }),
            ),
            section(
                SectionKind::WindForecast,
                json!({
                    "currentWind": { "speed": 10, "direction": 225 },
                    "forecast": [
                        { "time": "12 PM", "speed": 12, "direction": 240 },
                        { "time": "1 PM", "speed": 11, "direction": 235 },
                        { "time": "2 PM", "speed": 13, "direction": 230 },
                        { "time": "3 PM", "speed": 12, "direction": 225 },
                        { "time": "4 PM", "speed": 10, "direction": 220 },
                    ],
                }),
            ),
            section(
                SectionKind::PollenCount,
                json!({
                    "overall": 5.6,
                    "types": [
                        { "name": "Tree", "count": 3.2 },
                        { "name": "Grass", "count": 6.8 },
                        { "name": "Weed", "count": 4.5 },
                        { "name": "Mold", "count": 2.1 },
                    ],
                }),
            ),
            section(
                SectionKind::Astronomy,
                json!({
                    "moonPhase": "Waxing Crescent",
                    "moonrise": "3:45 PM",
                    "moonset": "2:30 AM",
                    "starVisibility": "Good",
                }),
            ),
            section(
                SectionKind::WeatherMap,
                json!({
                    "region": { "latitude": 29.8543, "longitude": 77.888 },
                    "weatherData": [
                        { "latitude": 29.8543, "longitude": 77.888, "weight": 1.0 },
                        { "latitude": 29.855, "longitude": 77.889, "weight": 0.8 },
                        { "latitude": 29.854, "longitude": 77.887, "weight": 0.6 },
                        { "latitude": 29.856, "longitude": 77.886, "weight": 0.7 },
                        { "latitude": 29.853, "longitude": 77.89, "weight": 0.5 },
                    ],
                }),
            ),
            section(
                SectionKind::Alerts,
                json!({
                    "alerts": [
                        {
                            "title": "Severe Thunderstorm Warning",
                            "description": "Possible hail and strong winds expected in the area.",
                            "expirationTime": "8:00 PM",
                        },
                        {
                            "title": "Flash Flood Watch",
                            "description": "Heavy rainfall may lead to flash flooding in low-lying areas.",
                            "expirationTime": "10:00 PM",
                        },
                    ],
                }),
            ),
            section(SectionKind::Hourly, json!({})),
            section(SectionKind::Daily, json!({})),
        ];

        Self { sections }
    }

    /// Replaces the props of the section with the given key, returning an
    /// updated copy of the registry. Unknown keys are an error, never an
    /// insertion.
    pub fn update_section(
        &self,
        key: &str,
        props: Map<String, Value>,
    ) -> Result<Self, SectionError> {
        let index = self
            .sections
            .iter()
            .position(|s| s.kind.key() == key)
            .ok_or_else(|| SectionError::UnknownSection(key.to_string()))?;

        let mut sections = self.sections.clone();
        sections[index].props = props;
        Ok(Self { sections })
    }

    pub fn get(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn section(kind: SectionKind, props: Value) -> Section {
    Section {
        kind,
        props: props_from(props),
    }
}

/// Extracts the object map from a `json!` literal; non-objects become an
/// empty bundle.
pub fn props_from(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
