use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::FailureKind;

/// A location accepted by the weather client.
///
/// Build it through [`crate::LocationResolver`] so that names are never empty
/// and coordinates are in range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LocationQuery {
    ByName(String),
    ByCoordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Query-string pairs identifying this location for the provider.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::ByName(city) => vec![("q", city.clone())],
            LocationQuery::ByCoordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::ByName(city) => f.write_str(city),
            LocationQuery::ByCoordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

/// A latitude/longitude pair as reported by a positioning source or stored
/// in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current observation for a location, already rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country_code: String,
    pub observed_temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub wind_speed_kmh: i32,
    pub pressure_hpa: u32,
    pub condition_summary: String,
    pub condition_icon: String,
}

/// One 3-hour sample from the forecast series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub min_c: f64,
    pub max_c: f64,
    pub condition_main: String,
    pub condition_icon: String,
}

/// The representative (midday) sample for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub sample: ForecastPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// View state published to renderers after every transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryState {
    pub phase: Phase,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Vec<DailyForecast>>,
    pub error_message: Option<String>,
    pub failure: Option<FailureKind>,
}

impl QueryState {
    pub fn loading() -> Self {
        Self {
            phase: Phase::Loading,
            ..Self::default()
        }
    }

    pub fn success(current: CurrentConditions, forecast: Vec<DailyForecast>) -> Self {
        Self {
            phase: Phase::Success,
            current: Some(current),
            forecast: Some(forecast),
            ..Self::default()
        }
    }

    pub fn error(failure: FailureKind, message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Error,
            error_message: Some(message.into()),
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Success or Error.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Success | Phase::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_query_params() {
        let q = LocationQuery::ByName("Paris".into());
        assert_eq!(q.query_params(), vec![("q", "Paris".to_string())]);
    }

    #[test]
    fn coordinate_query_params() {
        let q = LocationQuery::ByCoordinates {
            lat: 48.85,
            lon: -2.5,
        };
        assert_eq!(
            q.query_params(),
            vec![("lat", "48.85".to_string()), ("lon", "-2.5".to_string())]
        );
    }

    #[test]
    fn error_state_has_no_data() {
        let state = QueryState::error(FailureKind::NotFound, "City not found");
        assert_eq!(state.phase, Phase::Error);
        assert!(state.current.is_none());
        assert!(state.forecast.is_none());
        assert!(state.is_settled());
    }

    #[test]
    fn loading_state_is_empty() {
        let state = QueryState::loading();
        assert!(state.is_loading());
        assert!(state.error_message.is_none());
        assert!(state.current.is_none());
    }
}
