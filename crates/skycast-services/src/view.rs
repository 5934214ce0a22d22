//! State behind the current-weather screen, and the lookup pipeline that
//! feeds it.

use chrono::NaiveDate;
use skycast_weather::{classify, DailyForecast, DisplayWeather};

use crate::client::WeatherApiClient;
use crate::error::LookupError;
use crate::records::{DateRange, WeatherResponse};

/// Where a lookup's location string came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupInput {
    /// Free text; classified before anything is sent.
    Typed(String),
    /// A typeahead candidate's location, sent as-is.
    Selected(String),
}

#[derive(Debug, Clone, Default)]
pub struct WeatherView {
    loading: bool,
    error: Option<String>,
    location_name: Option<String>,
    current: Option<DisplayWeather>,
    forecast: DailyForecast,
    map_url: Option<String>,
}

impl WeatherView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    pub fn current(&self) -> Option<&DisplayWeather> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> &DailyForecast {
        &self.forecast
    }

    /// One display row per forecast day, in date order.
    pub fn forecast_days(&self) -> Vec<(NaiveDate, DisplayWeather)> {
        self.forecast
            .iter()
            .map(|(day, sample)| (*day, DisplayWeather::from_sample(sample)))
            .collect()
    }

    pub fn map_url(&self) -> Option<&str> {
        self.map_url.as_deref()
    }

    pub fn has_data(&self) -> bool {
        self.current.is_some()
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Settle a fetch. Success replaces everything shown; failure clears it
    /// so stale weather is never shown next to an error.
    pub fn finish(&mut self, result: &Result<WeatherResponse, LookupError>) {
        self.loading = false;
        match result {
            Ok(response) => {
                self.error = None;
                self.location_name = response
                    .weather_data
                    .name
                    .clone()
                    .or_else(|| response.location.clone());
                self.current = Some(DisplayWeather::from_current(&response.weather_data));
                self.forecast = response.daily_forecast();
                self.map_url = response.map_url().map(str::to_string);
            }
            Err(e) => {
                self.clear_data();
                self.error = Some(e.user_message());
            }
        }
    }

    /// Report bad input. Whatever is on screen stays.
    pub fn reject_input(&mut self, error: &LookupError) {
        self.loading = false;
        self.error = Some(error.user_message());
    }

    fn clear_data(&mut self) {
        self.location_name = None;
        self.current = None;
        self.forecast = DailyForecast::default();
        self.map_url = None;
    }
}

/// Turn input into the location string to send, or say why not.
pub fn prepare_location(input: &LookupInput, range: DateRange) -> Result<String, LookupError> {
    let location = match input {
        LookupInput::Typed(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(LookupError::EmptyInput);
            }
            classify(raw)?.to_string()
        }
        LookupInput::Selected(location) => {
            if location.trim().is_empty() {
                return Err(LookupError::EmptyInput);
            }
            location.clone()
        }
    };

    if !range.is_ordered() {
        return Err(LookupError::InvalidDateRange {
            start: range.start.to_string(),
            end: range.end.to_string(),
        });
    }

    Ok(location)
}

/// Validate, fetch and settle `view`. Input problems never reach the network.
pub async fn lookup(
    client: &WeatherApiClient,
    view: &mut WeatherView,
    input: &LookupInput,
    range: DateRange,
) -> Result<WeatherResponse, LookupError> {
    let location = match prepare_location(input, range) {
        Ok(location) => location,
        Err(e) => {
            tracing::debug!("Rejected lookup input {:?}: {}", input, e);
            view.reject_input(&e);
            return Err(e);
        }
    };

    view.begin_fetch();
    let result = client
        .fetch_weather(&location, range)
        .await
        .map_err(LookupError::from);
    view.finish(&result);
    result
}
