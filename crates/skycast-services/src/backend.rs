//! Seams between the UI-facing services and the weather backend.
//!
//! [`WeatherApiClient`](crate::WeatherApiClient) implements both traits over
//! HTTP; tests swap in in-memory fakes.

#![allow(async_fn_in_trait)]

use skycast_weather::LocationCandidate;

use crate::error::ApiError;
use crate::records::{DateRange, WeatherRecord};

/// Location suggestion lookup used by the typeahead.
pub trait LocationSearch {
    /// Candidates matching `query`, best first. An empty list is not an error.
    async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, ApiError>;
}

/// Persistent store of weather records.
pub trait RecordStore {
    /// Replace the location of record `id`, keeping `date_range` as given.
    ///
    /// Returns the record as the store now holds it.
    async fn update_record(
        &self,
        id: &str,
        location: &str,
        date_range: DateRange,
    ) -> Result<WeatherRecord, ApiError>;

    async fn delete_record(&self, id: &str) -> Result<(), ApiError>;
}
