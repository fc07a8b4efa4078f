//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (city names, coordinates, device position)
//! - The OpenWeather client for current conditions and the 5-day forecast
//! - Forecast reduction to one midday sample per day
//! - The query state machine that renderers subscribe to
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{QueryController, Submission};
pub use error::{FailureKind, WeatherError};
pub use location::{FixedPosition, LocationInput, LocationResolver, PositionError, PositionSource};
pub use model::{
    Coordinates, CurrentConditions, DailyForecast, ForecastPoint, LocationQuery, Phase, QueryState,
};
pub use provider::{WeatherClient, client_from_config, openweather::OpenWeatherClient};
