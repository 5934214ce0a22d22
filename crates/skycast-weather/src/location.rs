//! Location input classification.
//!
//! Free text typed by the user is one of three shapes: a `lat,lon` pair, a
//! numeric postal code, or a place name. The shape decides how the weather
//! service is queried.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A classified location query
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    PostalCode { code: String },
    PlaceName { text: String },
}

impl fmt::Display for LocationQuery {
    /// The `location` string sent to the weather service. Coordinates are
    /// normalised through `f64` formatting, so `"40.0, -74.0"` becomes `"40,-74"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates { lat, lon } => write!(f, "{},{}", lat, lon),
            Self::PostalCode { code } => f.write_str(code),
            Self::PlaceName { text } => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("invalid coordinate format: {0:?}")]
    InvalidCoordinates(String),
}

/// A typeahead suggestion: what to show, and what to query with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub label: String,
    /// Resolved query string, usually `"lat,lon"`
    pub location: String,
}

/// Classify raw user input.
///
/// Any comma commits the input to the coordinate shape; a malformed pair is
/// an error rather than a fallback to a place name. Empty input must be
/// rejected by the caller.
pub fn classify(raw: &str) -> Result<LocationQuery, ClassificationError> {
    if raw.contains(',') {
        return parse_coordinates(raw)
            .map(|(lat, lon)| LocationQuery::Coordinates { lat, lon })
            .ok_or_else(|| ClassificationError::InvalidCoordinates(raw.to_string()));
    }

    if is_postal_code(raw) {
        return Ok(LocationQuery::PostalCode {
            code: raw.to_string(),
        });
    }

    Ok(LocationQuery::PlaceName {
        text: raw.to_string(),
    })
}

fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parse_component(parts[0])?, parse_component(parts[1])?))
}

fn parse_component(part: &str) -> Option<f64> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return None;
    }
    // `f64::from_str` accepts "inf" and "NaN", which are not coordinates
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_postal_code(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())
}
