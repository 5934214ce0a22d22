//! HTTP client for the SkyCast weather backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use skycast_core::Config;
use skycast_weather::LocationCandidate;
use tracing::instrument;

use crate::backend::{LocationSearch, RecordStore};
use crate::error::ApiError;
use crate::records::{DateRange, WeatherRecord, WeatherRequest, WeatherResponse};
use crate::retry::{with_retry, RetryConfig};

/// Body fields checked, in order, for a human-readable failure message.
const MESSAGE_FIELDS: [&str; 3] = ["detail", "error", "message"];

pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl WeatherApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = Self::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )?;
        Ok(client.with_retry_config(RetryConfig::from(&config.retry)))
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/weather/{}", self.base_url, urlencoding::encode(id))
    }

    /// Fetch current weather and forecast for `location`.
    ///
    /// Creates a record on the backend, so it is sent exactly once.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(
        &self,
        location: &str,
        date_range: DateRange,
    ) -> Result<WeatherResponse, ApiError> {
        date_range.check()?;

        let body = WeatherRequest {
            location: location.to_string(),
            date_range,
        };

        let response = self
            .client
            .post(self.url("/weather"))
            .json(&body)
            .send()
            .await?;

        let weather: WeatherResponse = self.handle_response(response).await?;
        tracing::info!("Fetched weather for {}", location);
        Ok(weather)
    }

    /// Location suggestions for partial text.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, ApiError> {
        let url = format!(
            "{}/search?query={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = with_retry(&self.retry, || self.client.get(&url).send()).await?;
        self.handle_response(response).await
    }

    /// All stored records.
    #[instrument(skip(self), level = "info")]
    pub async fn list_records(&self) -> Result<Vec<WeatherRecord>, ApiError> {
        let url = self.url("/weather");

        let response = with_retry(&self.retry, || self.client.get(&url).send()).await?;
        let records: Vec<WeatherRecord> = self.handle_response(response).await?;
        tracing::info!("Loaded {} records", records.len());
        Ok(records)
    }

    #[instrument(skip(self), level = "info")]
    pub async fn update_record(
        &self,
        id: &str,
        location: &str,
        date_range: DateRange,
    ) -> Result<WeatherRecord, ApiError> {
        let url = self.record_url(id);
        let body = WeatherRequest {
            location: location.to_string(),
            date_range,
        };

        let response = with_retry(&self.retry, || self.client.put(&url).json(&body).send()).await?;
        let record: WeatherRecord = self.handle_response(response).await?;
        tracing::info!("Updated record {}", id);
        Ok(record)
    }

    #[instrument(skip(self), level = "info")]
    pub async fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        let url = self.record_url(id);

        let response = with_retry(&self.retry, || self.client.delete(&url).send()).await?;

        // Body is only a confirmation message
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    /// CSV export of every record, as raw bytes.
    #[instrument(skip(self), level = "info")]
    pub async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        let url = self.url("/export/csv");

        let response = with_retry(&self.retry, || self.client.get(&url).send()).await?;
        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }

        let bytes = response.bytes().await?;
        tracing::info!("Exported {} bytes of CSV", bytes.len());
        Ok(bytes.to_vec())
    }

    /// JSON export of every record.
    #[instrument(skip(self), level = "info")]
    pub async fn export_json(&self) -> Result<Vec<WeatherRecord>, ApiError> {
        let url = self.url("/export/json");

        let response = with_retry(&self.retry, || self.client.get(&url).send()).await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    async fn remote_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        tracing::debug!("Backend returned {}: {}", status, body);
        ApiError::Remote { status, message }
    }
}

/// First non-empty string among the known message fields of a JSON body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    MESSAGE_FIELDS
        .iter()
        .filter_map(|field| value.get(field).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl LocationSearch for WeatherApiClient {
    async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, ApiError> {
        WeatherApiClient::search(self, query).await
    }
}

impl RecordStore for WeatherApiClient {
    async fn update_record(
        &self,
        id: &str,
        location: &str,
        date_range: DateRange,
    ) -> Result<WeatherRecord, ApiError> {
        WeatherApiClient::update_record(self, id, location, date_range).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        WeatherApiClient::delete_record(self, id).await
    }
}
