//! Shared fixtures for the wiremock-backed tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use weather_core::OpenWeatherClient;
use wiremock::MockServer;

pub const API_KEY: &str = "TEST_KEY";

pub fn client_for(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(Some(API_KEY.to_string())).with_base_url(&server.uri())
}

pub fn paris_current() -> Value {
    json!({
        "cod": 200,
        "name": "Paris",
        "sys": { "country": "FR" },
        "main": { "temp": 15.2, "feels_like": 14.8, "humidity": 60, "pressure": 1012 },
        "weather": [{ "description": "clear sky", "icon": "01d" }],
        "wind": { "speed": 3.0 }
    })
}

/// Five days of 3-hourly samples (00:00 through 21:00), so exactly five
/// of them fall at midday.
pub fn five_day_forecast() -> Value {
    let mut list = Vec::new();
    for day in 10..15 {
        for hour in (0..24).step_by(3) {
            list.push(json!({
                "dt_txt": format!("2025-06-{day} {hour:02}:00:00"),
                "main": {
                    "temp": 18.0 + f64::from(hour) / 3.0,
                    "feels_like": 17.5,
                    "temp_min": 16.0,
                    "temp_max": 24.0,
                    "pressure": 1014,
                    "humidity": 55
                },
                "weather": [{ "main": "Clouds", "description": "scattered clouds", "icon": "03d" }]
            }));
        }
    }

    json!({
        "cod": "200",
        "message": 0,
        "cnt": list.len(),
        "list": list,
        "city": { "name": "Paris", "country": "FR", "timezone": 7200 }
    })
}

pub fn city_not_found() -> Value {
    json!({ "cod": "404", "message": "city not found" })
}
