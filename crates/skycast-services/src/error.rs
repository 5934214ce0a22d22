//! Errors raised while talking to the weather backend.

use skycast_core::{AppError, InputError, NetworkError, ReqwestErrorExt};
use skycast_weather::ClassificationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success response. `message` comes from the body when present.
    #[error("{status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Message for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::InvalidRequest(msg) => msg.clone(),
            Self::Decode(_) => "Received an unexpected response from the weather service.".to_string(),
            Self::Network(_) => "Network error. Is the weather service reachable?".to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Remote { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            ApiError::InvalidRequest(msg) => AppError::Input(InputError::Invalid(msg)),
            ApiError::Decode(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            ApiError::Network(e) => AppError::Network(e.into_network_error()),
        }
    }
}

/// Failure of a location-only record edit.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("No record is being edited")]
    NoSession,

    #[error("Location is empty")]
    EmptyLocation,

    #[error("Update rejected: {0}")]
    Rejected(#[from] ApiError),
}

impl EditError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSession => "Select a record to edit first.".to_string(),
            Self::EmptyLocation => "Please enter a location.".to_string(),
            Self::Rejected(e) => format!("Failed to update record: {}", e.user_message()),
        }
    }
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::NoSession => {
                AppError::Input(InputError::Invalid("Select a record to edit first.".to_string()))
            }
            EditError::EmptyLocation => AppError::Input(InputError::EmptyLocation),
            EditError::Rejected(api) => api.into(),
        }
    }
}

/// Failure of a weather lookup, from input to response.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Location is empty")]
    EmptyInput,

    #[error(transparent)]
    Input(#[from] ClassificationError),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error(transparent)]
    Remote(#[from] ApiError),
}

impl LookupError {
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => InputError::EmptyLocation.user_message(),
            Self::Input(e) => InputError::InvalidCoordinates(e.to_string()).user_message(),
            Self::InvalidDateRange { start, end } => InputError::InvalidDateRange {
                start: start.clone(),
                end: end.clone(),
            }
            .user_message(),
            Self::Remote(e) => e.user_message(),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::EmptyInput => AppError::Input(InputError::EmptyLocation),
            LookupError::Input(e) => AppError::Input(InputError::InvalidCoordinates(e.to_string())),
            LookupError::InvalidDateRange { start, end } => {
                AppError::Input(InputError::InvalidDateRange { start, end })
            }
            LookupError::Remote(e) => e.into(),
        }
    }
}
