use serde::Serialize;
use thiserror::Error;

/// Every way a weather query can fail before reaching the renderer.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid location: {0}")]
    InvalidInput(String),

    #[error("No API key configured for the weather provider")]
    MissingCredential,

    #[error("Device positioning is not available")]
    PositioningUnavailable,

    #[error("Device positioning was denied: {0}")]
    PositioningDenied(String),

    #[error("Device positioning timed out")]
    PositioningTimeout,

    #[error("Request to the {endpoint} endpoint failed")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Provider has no {endpoint} data for this location")]
    NotFound { endpoint: &'static str },

    #[error("Provider rejected the {endpoint} request with code {code}: {message}")]
    ProviderRejected {
        endpoint: &'static str,
        code: u16,
        message: String,
    },

    #[error("Malformed {endpoint} response: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
}

/// Machine-readable classification of a [`WeatherError`], kept in the
/// published query state next to the display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    MissingCredential,
    PositioningUnavailable,
    PositioningDenied,
    PositioningTimeout,
    NetworkError,
    NotFound,
    ProviderRejected,
    MalformedResponse,
    /// The query was abandoned before it settled.
    Cancelled,
}

impl WeatherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WeatherError::InvalidInput(_) => FailureKind::InvalidInput,
            WeatherError::MissingCredential => FailureKind::MissingCredential,
            WeatherError::PositioningUnavailable => FailureKind::PositioningUnavailable,
            WeatherError::PositioningDenied(_) => FailureKind::PositioningDenied,
            WeatherError::PositioningTimeout => FailureKind::PositioningTimeout,
            WeatherError::Network { .. } => FailureKind::NetworkError,
            WeatherError::NotFound { .. } => FailureKind::NotFound,
            WeatherError::ProviderRejected { .. } => FailureKind::ProviderRejected,
            WeatherError::MalformedResponse { .. } => FailureKind::MalformedResponse,
        }
    }

    pub(crate) fn malformed(endpoint: &'static str, reason: impl ToString) -> Self {
        WeatherError::MalformedResponse {
            endpoint,
            reason: reason.to_string(),
        }
    }
}
