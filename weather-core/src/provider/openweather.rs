use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastPoint, LocationQuery},
};

use super::WeatherClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Endpoint::Current => "current weather",
            Endpoint::Forecast => "forecast",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout; an expired request fails as a network error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GET and return the body once its `cod` says success.
    async fn get(&self, endpoint: Endpoint, query: &LocationQuery) -> Result<Value, WeatherError> {
        if matches!(query, LocationQuery::ByName(name) if name.trim().is_empty()) {
            return Err(WeatherError::InvalidInput("city name is empty".into()));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingCredential)?;

        let url = format!("{}/{}", self.base_url, endpoint.path());
        let mut params = query.query_params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));

        debug!("Requesting OpenWeather {} for {}", endpoint.name(), query);

        let res = self
            .http
            .get(&url)
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| WeatherError::Network {
                endpoint: endpoint.name(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| WeatherError::Network {
            endpoint: endpoint.name(),
            source,
        })?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(
                "OpenWeather {} returned non-JSON body with HTTP {}",
                endpoint.name(),
                status
            );
            WeatherError::malformed(
                endpoint.name(),
                format!("{e} (HTTP {status}: {})", truncate_body(&body)),
            )
        })?;

        check_status(endpoint, &value)?;
        Ok(value)
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
        let value = self.get(Endpoint::Current, query).await?;
        parse_current(value)
    }

    async fn fetch_forecast_series(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ForecastPoint>, WeatherError> {
        let value = self.get(Endpoint::Forecast, query).await?;
        let points = parse_forecast(value)?;
        debug!("OpenWeather forecast returned {} samples", points.len());
        Ok(points)
    }
}

/// OpenWeather sends `cod` as a number on the current endpoint and as a
/// string on the forecast endpoint and in error bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(u16),
    Text(String),
}

impl OwCode {
    fn as_u16(&self) -> Option<u16> {
        match self {
            OwCode::Number(n) => Some(*n),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    cod: OwCode,
    #[serde(default)]
    message: Value,
}

fn check_status(endpoint: Endpoint, body: &Value) -> Result<(), WeatherError> {
    let status = OwStatus::deserialize(body)
        .map_err(|e| WeatherError::malformed(endpoint.name(), format!("status field: {e}")))?;

    let code = status.cod.as_u16().ok_or_else(|| {
        WeatherError::malformed(endpoint.name(), format!("unrecognised cod {:?}", status.cod))
    })?;

    match code {
        200 => Ok(()),
        404 => Err(WeatherError::NotFound {
            endpoint: endpoint.name(),
        }),
        code => {
            let message = match status.message {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            warn!("OpenWeather {} rejected request: {} {}", endpoint.name(), code, message);
            Err(WeatherError::ProviderRejected {
                endpoint: endpoint.name(),
                code,
                message,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn parse_current(value: Value) -> Result<CurrentConditions, WeatherError> {
    let endpoint = Endpoint::Current.name();
    let parsed: OwCurrentResponse =
        serde_json::from_value(value).map_err(|e| WeatherError::malformed(endpoint, e))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::malformed(endpoint, "empty `weather` array"))?;

    Ok(CurrentConditions {
        location_name: parsed.name,
        country_code: parsed.sys.country.unwrap_or_default(),
        observed_temperature_c: parsed.main.temp.round() as i32,
        feels_like_c: parsed.main.feels_like.round() as i32,
        humidity_pct: parsed.main.humidity,
        wind_speed_kmh: (parsed.wind.speed * 3.6).round() as i32,
        pressure_hpa: parsed.main.pressure,
        condition_summary: condition.description,
        condition_icon: condition.icon,
    })
}

fn parse_forecast(value: Value) -> Result<Vec<ForecastPoint>, WeatherError> {
    let endpoint = Endpoint::Forecast.name();
    let parsed: OwForecastResponse =
        serde_json::from_value(value).map_err(|e| WeatherError::malformed(endpoint, e))?;

    parsed
        .list
        .into_iter()
        .map(|entry| {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT).map_err(
                |e| WeatherError::malformed(endpoint, format!("dt_txt {:?}: {e}", entry.dt_txt)),
            )?;
            let condition = entry.weather.into_iter().next().ok_or_else(|| {
                WeatherError::malformed(endpoint, format!("no conditions at {}", entry.dt_txt))
            })?;

            Ok(ForecastPoint {
                timestamp,
                temperature_c: entry.main.temp,
                min_c: entry.main.temp_min,
                max_c: entry.main.temp_max,
                condition_main: condition.main,
                condition_icon: condition.icon,
            })
        })
        .collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
