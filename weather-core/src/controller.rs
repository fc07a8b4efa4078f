//! Query state machine.
//!
//! `Idle -> Loading -> {Success, Error} -> Loading | Idle`
//!
//! The controller is the only writer of [`QueryState`]. Renderers hold a
//! [`watch::Receiver`] from [`QueryController::subscribe`] and read each
//! published state. While a query is Loading, new submissions are refused
//! with [`Submission::Busy`] instead of racing the one in flight.

use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{FailureKind, WeatherError},
    forecast,
    location::{LocationInput, LocationResolver, PositionSource},
    model::{CurrentConditions, DailyForecast, LocationQuery, QueryState},
    provider::WeatherClient,
};

/// What happened to a submitted query.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The query ran; this is the state it settled in.
    Completed(QueryState),
    /// Another query was still loading, so this one was not started.
    Busy,
}

impl Submission {
    pub fn state(&self) -> Option<&QueryState> {
        match self {
            Submission::Completed(state) => Some(state),
            Submission::Busy => None,
        }
    }
}

#[derive(Debug)]
pub struct QueryController<C> {
    client: C,
    state: watch::Sender<QueryState>,
}

impl<C: WeatherClient> QueryController<C> {
    pub fn new(client: C) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self { client, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub async fn search_city(&self, city: &str) -> Submission {
        let input = LocationInput::Name(city.to_string());
        self.run(async move { LocationResolver::resolve(input) })
            .await
    }

    pub async fn search_coordinates(&self, lat: f64, lon: f64) -> Submission {
        let input = LocationInput::Coordinates(lat, lon);
        self.run(async move { LocationResolver::resolve(input) })
            .await
    }

    /// Query the weather wherever the device is. Pass `None` when the host
    /// has no positioning capability.
    pub async fn search_device(&self, source: Option<&dyn PositionSource>) -> Submission {
        self.run(LocationResolver::resolve_device(source)).await
    }

    /// Return to Idle. Refused (returns `false`) while a query is loading.
    pub fn reset(&self) -> bool {
        let mut refused = false;
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                refused = true;
                return false;
            }
            if *state == QueryState::default() {
                return false;
            }
            *state = QueryState::default();
            true
        });
        !refused
    }

    /// Atomically move to Loading unless a query is already in flight.
    fn begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = QueryState::loading();
            true
        })
    }

    async fn run<F>(&self, resolve: F) -> Submission
    where
        F: Future<Output = Result<LocationQuery, WeatherError>>,
    {
        if !self.begin() {
            debug!("Query ignored: another query is still loading");
            return Submission::Busy;
        }
        let guard = LoadingGuard {
            state: &self.state,
            settled: false,
        };
        info!("Query started");

        let outcome = match resolve.await {
            Ok(query) => self.fetch(&query).await,
            Err(err) => Err(err),
        };

        let next = match outcome {
            Ok((current, forecast)) => {
                info!(
                    "Query succeeded for {}, {} with {} forecast days",
                    current.location_name,
                    current.country_code,
                    forecast.len()
                );
                QueryState::success(current, forecast)
            }
            Err(err) => {
                warn!("Query failed: {err}");
                let kind = err.kind();
                QueryState::error(kind, failure_message(kind))
            }
        };

        guard.settle(next.clone());
        Submission::Completed(next)
    }

    /// Current conditions first; the forecast is only requested once they
    /// succeeded. Any failure discards whatever was already fetched.
    async fn fetch(
        &self,
        query: &LocationQuery,
    ) -> Result<(CurrentConditions, Vec<DailyForecast>), WeatherError> {
        let current = self.client.fetch_current(query).await?;
        let series = self.client.fetch_forecast_series(query).await?;
        let daily = forecast::reduce(&series);

        debug!(
            "Reduced {} forecast samples to {} days",
            series.len(),
            daily.len()
        );

        Ok((current, daily))
    }
}

/// Leaves Loading when a query future is dropped before it settles, e.g.
/// under `tokio::time::timeout`, so later submissions are not refused forever.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<QueryState>,
    settled: bool,
}

impl LoadingGuard<'_> {
    fn settle(mut self, next: QueryState) {
        self.state.send_replace(next);
        self.settled = true;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            warn!("Query dropped before it settled");
            let kind = FailureKind::Cancelled;
            *state = QueryState::error(kind, failure_message(kind));
            true
        });
    }
}

fn failure_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::InvalidInput => "Please enter a valid location",
        FailureKind::MissingCredential => "Weather API key is missing",
        FailureKind::PositioningUnavailable => "Geolocation is not supported on this device",
        FailureKind::PositioningDenied => "Location access was denied",
        FailureKind::PositioningTimeout => "Timed out waiting for device location",
        FailureKind::NetworkError => "Unable to fetch weather data",
        FailureKind::NotFound => "City not found",
        FailureKind::ProviderRejected => "The weather service rejected the request",
        FailureKind::MalformedResponse => "Received an unexpected response from the weather service",
        FailureKind::Cancelled => "Query cancelled",
    }
}
