//! Location resolution.
//!
//! Turns user input (a city name, a coordinate pair, or the device's own
//! position) into a [`LocationQuery`] the weather client accepts.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, LocationQuery},
};

/// Raw user input before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Name(String),
    Coordinates(f64, f64),
}

/// Errors a platform positioning source can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission denied: {0}")]
    Denied(String),
    #[error("timed out")]
    Timeout,
    #[error("position unavailable")]
    Unavailable,
}

impl From<PositionError> for WeatherError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::Denied(reason) => WeatherError::PositioningDenied(reason),
            PositionError::Timeout => WeatherError::PositioningTimeout,
            PositionError::Unavailable => WeatherError::PositioningUnavailable,
        }
    }
}

/// Host capability that reports where the device currently is.
///
/// Single-shot: each call yields one position or one error. Any timeout is
/// the implementation's business.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// A position source that always reports the same coordinates, e.g. a home
/// location from the config file.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

pub struct LocationResolver;

impl LocationResolver {
    pub fn resolve(input: LocationInput) -> Result<LocationQuery, WeatherError> {
        debug!("Resolving location input: {:?}", input);

        match input {
            LocationInput::Name(name) => {
                if name.trim().is_empty() {
                    return Err(WeatherError::InvalidInput(
                        "city name must not be empty".to_string(),
                    ));
                }
                Ok(LocationQuery::ByName(name))
            }
            LocationInput::Coordinates(lat, lon) => Self::resolve_coordinates(lat, lon),
        }
    }

    /// Ask the host for the device position. `None` means the platform has
    /// no positioning capability at all.
    pub async fn resolve_device(
        source: Option<&dyn PositionSource>,
    ) -> Result<LocationQuery, WeatherError> {
        let source = source.ok_or(WeatherError::PositioningUnavailable)?;
        let position = source.current_position().await?;

        debug!(
            "Device reported position ({}, {})",
            position.latitude, position.longitude
        );

        Self::resolve_coordinates(position.latitude, position.longitude)
    }

    fn resolve_coordinates(lat: f64, lon: f64) -> Result<LocationQuery, WeatherError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(WeatherError::InvalidInput(format!(
                "latitude {lat} is outside -90..=90"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidInput(format!(
                "longitude {lon} is outside -180..=180"
            )));
        }

        Ok(LocationQuery::ByCoordinates { lat, lon })
    }
}
