use crate::mapper::{self, MapError};
use crate::sections::{SectionError, SectionKind, SectionRegistry};
use crate::source::types::{CurrentResponse, ForecastResponse};
use crate::source::{SourceError, WeatherSource};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Weather source failed: {0}")]
    Source(#[from] SourceError),
    #[error("Mapping fetched data failed: {0}")]
    Map(#[from] MapError),
    #[error("Section update failed: {0}")]
    Section(#[from] SectionError),
}

/// What a `change_location` call did to the application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Fetched data was applied and the registry re-derived.
    Updated,
    /// Empty input; no fetch was issued.
    Ignored,
    /// A newer request was issued while this one was in flight; its results
    /// were discarded.
    Stale,
}

/// Confirmation signal emitted after a successful location change.
pub trait Haptics: Send + Sync {
    fn pulse(&self);
}

/// The process has no vibration motor, so the confirmation lands in the log.
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&self) {
        tracing::debug!("haptic pulse");
    }
}

/// Everything the display reads: the current location, the last fetched
/// payloads, and the ordered section list. Mutated only by the controller,
/// one whole-state commit per applied request.
#[derive(Debug)]
pub struct AppState {
    pub location: String,
    pub current: Option<CurrentResponse>,
    pub forecast: Option<ForecastResponse>,
    pub sections: SectionRegistry,
}

impl AppState {
    pub fn new(location: String) -> Self {
        Self {
            location,
            current: None,
            forecast: None,
            sections: SectionRegistry::with_sample_data(),
        }
    }
}

pub struct AppController<S> {
    source: S,
    haptics: Box<dyn Haptics>,
    state: AppState,
    latest_request: u64,
}

impl<S: WeatherSource> AppController<S> {
    pub fn new(source: S, haptics: Box<dyn Haptics>, initial_location: String) -> Self {
        Self {
            source,
            haptics,
            state: AppState::new(initial_location),
            latest_request: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn location(&self) -> &str {
        &self.state.location
    }

    pub fn sections(&self) -> &SectionRegistry {
        &self.state.sections
    }

    /// Fetches weather for the new location and re-derives every
    /// data-dependent section. Empty input is a no-op; a failed fetch or
    /// mapping leaves the state exactly as it was and surfaces the error.
    pub async fn change_location(&mut self, input: &str) -> Result<ChangeOutcome, ControllerError> {
        let location = input.trim();
        if location.is_empty() {
            return Ok(ChangeOutcome::Ignored);
        }

        let token = self.begin_request();

        let current = match self.source.fetch_current(location).await {
            Ok(current) => current,
            Err(error) => {
                tracing::warn!(location, %error, "current conditions fetch failed");
                return Err(error.into());
            }
        };

        let forecast = match self.source.fetch_forecast(location).await {
            Ok(forecast) => forecast,
            Err(error) => {
                tracing::warn!(location, %error, "forecast fetch failed");
                return Err(error.into());
            }
        };

        self.apply_update(token, location.to_string(), current, forecast)
    }

    /// Issues a sequence number for a new request. Only the most recently
    /// issued number may commit, so overlapping calls resolve to the newest
    /// request rather than to whichever response lands last.
    fn begin_request(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    fn apply_update(
        &mut self,
        token: u64,
        location: String,
        current: CurrentResponse,
        forecast: ForecastResponse,
    ) -> Result<ChangeOutcome, ControllerError> {
        if token != self.latest_request {
            tracing::debug!(token, latest = self.latest_request, "discarding stale response");
            return Ok(ChangeOutcome::Stale);
        }

        // Derive every data-dependent section before committing anything, so
        // a mapping failure cannot leave a partial update behind. Sections
        // with no data dependency keep their existing props.
        let sections = self
            .state
            .sections
            .update_section(SectionKind::Main.key(), mapper::main_props(&current)?)?
            .update_section(SectionKind::Metrics.key(), mapper::metrics_props(&current))?
            .update_section(
                SectionKind::AirQuality.key(),
                mapper::air_quality_props(&current),
            )?
            .update_section(
                SectionKind::Precipitation.key(),
                mapper::precipitation_props(&current, &forecast)?,
            )?
            .update_section(SectionKind::UvIndex.key(), mapper::uv_props(&current))?;

        self.state.location = location;
        self.state.current = Some(current);
        self.state.forecast = Some(forecast);
        self.state.sections = sections;
        self.haptics.pulse();

        Ok(ChangeOutcome::Updated)
    }
}
