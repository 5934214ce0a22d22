//! Reduce a 3-hourly forecast to one representative sample per day.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};

use crate::types::{utc_offset, ForecastPayload, ForecastSample};

/// One sample per calendar day, ordered by day.
///
/// A day's sample is the one nearest to local noon; on an exact tie the
/// first sample seen is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyForecast {
    days: BTreeMap<NaiveDate, ForecastSample>,
}

impl DailyForecast {
    /// Reduce a forecast payload using the payload's own time reference.
    pub fn from_payload(payload: &ForecastPayload) -> Self {
        reduce(&payload.samples(), payload.time_reference())
    }

    pub fn get(&self, day: &NaiveDate) -> Option<&ForecastSample> {
        self.days.get(day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, ForecastSample> {
        self.days.iter()
    }

    pub fn days(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    /// Offer a sample for its day; it replaces the current one only if
    /// strictly closer to noon.
    fn offer(&mut self, offset: FixedOffset, sample: &ForecastSample) {
        let Some(local) = local_time(sample.timestamp_seconds, offset) else {
            tracing::warn!(
                "Skipping forecast sample with unrepresentable timestamp {}",
                sample.timestamp_seconds
            );
            return;
        };

        match self.days.entry(local.date_naive()) {
            Entry::Vacant(slot) => {
                slot.insert(sample.clone());
            }
            Entry::Occupied(mut slot) => {
                let current = local_time(slot.get().timestamp_seconds, offset)
                    .map(|t| hours_from_noon(&t))
                    .unwrap_or(u32::MAX);
                if hours_from_noon(&local) < current {
                    slot.insert(sample.clone());
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a DailyForecast {
    type Item = (&'a NaiveDate, &'a ForecastSample);
    type IntoIter = btree_map::Iter<'a, NaiveDate, ForecastSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// Reduce `samples` to one sample per day under the fixed `offset`.
///
/// All day boundaries and hours are computed in the same offset. Never fails;
/// empty input gives an empty result.
pub fn reduce(samples: &[ForecastSample], offset: FixedOffset) -> DailyForecast {
    let daily = samples
        .iter()
        .fold(DailyForecast::default(), |mut daily, sample| {
            daily.offer(offset, sample);
            daily
        });

    tracing::debug!(
        "Reduced {} forecast samples to {} days",
        samples.len(),
        daily.len()
    );
    daily
}

/// Reduce in UTC.
pub fn reduce_utc(samples: &[ForecastSample]) -> DailyForecast {
    reduce(samples, utc_offset())
}

fn local_time(timestamp_seconds: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp_seconds, 0).map(|t| t.with_timezone(&offset))
}

fn hours_from_noon(time: &DateTime<FixedOffset>) -> u32 {
    time.hour().abs_diff(12)
}
