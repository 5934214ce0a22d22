//! Weather domain logic for SkyCast
//!
//! Classifies free-text location input, reduces 3-hourly forecasts to one
//! reading per day, and derives unit-converted display values. Everything
//! here is pure: no I/O.

pub mod display;
pub mod forecast;
pub mod location;
pub mod types;
pub mod units;

pub use display::{icon_url, DisplayWeather};
pub use forecast::{reduce, reduce_utc, DailyForecast};
pub use location::{classify, ClassificationError, LocationCandidate, LocationQuery};
pub use types::*;
pub use units::{convert_temperature, convert_wind, to_display, ConvertedUnits};
