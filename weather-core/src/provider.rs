use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::WeatherError,
    model::{CurrentConditions, ForecastPoint, LocationQuery},
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// The two provider calls a query needs. Each is an independent request;
/// implementations share no retry state between them.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError>;

    async fn fetch_forecast_series(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ForecastPoint>, WeatherError>;
}

/// Construct the OpenWeather client from config.
///
/// A missing API key is not an error here: the client reports
/// `MissingCredential` on first use so the query state machine can surface it.
pub fn client_from_config(config: &Config) -> OpenWeatherClient {
    let client = OpenWeatherClient::new(config.api_key().map(str::to_owned));

    match config.endpoint.as_deref() {
        Some(base) => client.with_base_url(base),
        None => client,
    }
}
