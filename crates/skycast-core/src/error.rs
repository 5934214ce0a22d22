//! Centralized error types for SkyCast.
//!
//! Every failure in the pipeline resolves to an [`AppError`], whose
//! `user_message()` is what the front end shows. Full context stays in the
//! `Display` form for logs.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Input(e) => e.user_message(),
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Problems with what the user typed. No request is issued for these.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Location is empty")]
    EmptyLocation,

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinates(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    /// Anything else the user must fix; the message is shown as-is.
    #[error("{0}")]
    Invalid(String),
}

impl InputError {
    pub fn user_message(&self) -> String {
        match self {
            InputError::EmptyLocation => "Please enter a location.".to_string(),
            InputError::InvalidCoordinates(_) => {
                "Invalid coordinate format. Use 'lat,lon'.".to_string()
            }
            InputError::InvalidDateRange { .. } => {
                "Start date cannot be after end date.".to_string()
            }
            InputError::Invalid(msg) => msg.clone(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    /// Non-success response. `message` is what the backend said, when it said
    /// anything.
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to reach the weather service. Is the backend running?".to_string()
            }
            NetworkError::Timeout => "The request timed out. Please try again.".to_string(),
            NetworkError::ServerError { message, .. } if !message.is_empty() => message.clone(),
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
                    .to_string()
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.".to_string(),
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again.".to_string()
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: String::new(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
