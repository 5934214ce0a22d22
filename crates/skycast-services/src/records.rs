//! Wire types for the weather backend and the local list of stored records.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use skycast_weather::{CurrentWeather, DailyForecast, DisplayWeather, ForecastPayload};

use crate::backend::RecordStore;
use crate::error::ApiError;

/// Inclusive date range attached to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start` through `start + days`
    pub fn starting(start: NaiveDate, days: i64) -> Self {
        Self {
            start,
            end: start + Duration::days(days),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    pub(crate) fn check(&self) -> Result<(), ApiError> {
        if self.is_ordered() {
            Ok(())
        } else {
            Err(ApiError::InvalidRequest(
                "Start date cannot be after end date.".to_string(),
            ))
        }
    }
}

/// Body of `POST /weather` and `PUT /weather/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRequest {
    pub location: String,
    pub date_range: DateRange,
}

/// Response of `POST /weather`.
///
/// The backend echoes the whole stored record; only the weather payloads and
/// map URL are required here, and even those may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherResponse {
    pub id: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather_data: CurrentWeather,
    pub forecast_data: Option<ForecastPayload>,
    pub google_map_url: Option<String>,
}

impl WeatherResponse {
    pub fn map_url(&self) -> Option<&str> {
        non_empty(self.google_map_url.as_deref())
    }

    pub fn daily_forecast(&self) -> DailyForecast {
        self.forecast_data
            .as_ref()
            .map(DailyForecast::from_payload)
            .unwrap_or_default()
    }
}

/// A stored weather query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: String,
    pub location: String,
    pub date_range: DateRange,
    #[serde(default)]
    pub weather_data: serde_json::Value,
    #[serde(default)]
    pub forecast_data: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub youtube_videos: Vec<String>,
    #[serde(default)]
    pub google_map_url: Option<String>,
}

impl WeatherRecord {
    pub fn map_url(&self) -> Option<&str> {
        non_empty(self.google_map_url.as_deref())
    }

    /// Current conditions as stored; `None` if the stored payload is not an
    /// object we understand.
    pub fn current_weather(&self) -> Option<CurrentWeather> {
        if !self.weather_data.is_object() {
            return None;
        }
        serde_json::from_value(self.weather_data.clone()).ok()
    }

    pub fn display(&self) -> DisplayWeather {
        DisplayWeather::from_current(&self.current_weather().unwrap_or_default())
    }

    pub fn daily_forecast(&self) -> DailyForecast {
        if !self.forecast_data.is_object() {
            return DailyForecast::default();
        }
        serde_json::from_value::<ForecastPayload>(self.forecast_data.clone())
            .map(|payload| DailyForecast::from_payload(&payload))
            .unwrap_or_default()
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Locally held copy of the stored records.
///
/// Changes are only applied after the remote store confirms them.
#[derive(Debug, Clone, Default)]
pub struct RecordList {
    records: Vec<WeatherRecord>,
}

impl RecordList {
    pub fn new(records: Vec<WeatherRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&WeatherRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swap in a record confirmed by the store. Returns false if no record
    /// with that id is held.
    pub fn replace(&mut self, updated: WeatherRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Delete remotely, then locally. On failure the list is left untouched.
    pub async fn delete<S: RecordStore>(&mut self, store: &S, id: &str) -> Result<(), ApiError> {
        store.delete_record(id).await?;
        self.records.retain(|r| r.id != id);
        tracing::info!("Deleted record {}", id);
        Ok(())
    }
}
