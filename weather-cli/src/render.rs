//! Human-friendly output of a settled query state.

use chrono::Local;
use weather_core::{CurrentConditions, DailyForecast, Phase, QueryState};

pub fn loading() {
    eprintln!("Fetching weather...");
}

pub fn state(state: &QueryState) {
    match state.phase {
        Phase::Idle | Phase::Loading => {}
        Phase::Error => {
            let message = state.error_message.as_deref().unwrap_or("Something went wrong");
            eprintln!("Error: {message}");
        }
        Phase::Success => {
            if let (Some(current), Some(forecast)) = (&state.current, &state.forecast) {
                println!("{}", current_block(current));
                println!();
                println!("{}", forecast_block(forecast));
            }
        }
    }
}

fn current_block(current: &CurrentConditions) -> String {
    let place = if current.country_code.is_empty() {
        current.location_name.clone()
    } else {
        format!("{}, {}", current.location_name, current.country_code)
    };

    [
        place,
        Local::now().format("%A, %B %-d, %Y").to_string(),
        format!(
            "{} [{}]  {}°C",
            current.condition_summary, current.condition_icon, current.observed_temperature_c
        ),
        format!(
            "Feels like {}°C | Humidity {}% | Wind {} km/h | Pressure {} hPa",
            current.feels_like_c,
            current.humidity_pct,
            current.wind_speed_kmh,
            current.pressure_hpa
        ),
    ]
    .join("\n")
}

fn forecast_block(days: &[DailyForecast]) -> String {
    if days.is_empty() {
        return "No forecast available".to_string();
    }

    let mut lines = vec![format!("{}-Day Forecast", days.len())];
    lines.extend(days.iter().map(forecast_line));
    lines.join("\n")
}

fn forecast_line(day: &DailyForecast) -> String {
    let s = &day.sample;
    let condition = format!("({})", s.condition_main);
    format!(
        "{}  {:>4}°C  {:<12} min {}°C / max {}°C",
        day.date.format("%a %b %-d"),
        s.temperature_c.round() as i32,
        condition,
        s.min_c.round() as i32,
        s.max_c.round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use weather_core::ForecastPoint;

    fn sample_current() -> CurrentConditions {
        CurrentConditions {
            location_name: "Paris".into(),
            country_code: "FR".into(),
            observed_temperature_c: 15,
            feels_like_c: 15,
            humidity_pct: 60,
            wind_speed_kmh: 11,
            pressure_hpa: 1012,
            condition_summary: "clear sky".into(),
            condition_icon: "01d".into(),
        }
    }

    #[test]
    fn current_block_lists_readings() {
        let text = current_block(&sample_current());
        assert!(text.starts_with("Paris, FR"));
        assert!(text.contains("clear sky [01d]  15°C"));
        assert!(text.contains("Wind 11 km/h"));
        assert!(text.contains("Pressure 1012 hPa"));
    }

    #[test]
    fn forecast_line_rounds_temperatures() {
        let day = DailyForecast {
            date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
            sample: ForecastPoint {
                timestamp: NaiveDateTime::parse_from_str("2025-06-13 12:00:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
                temperature_c: 21.6,
                min_c: 18.2,
                max_c: 23.5,
                condition_main: "Rain".into(),
                condition_icon: "10d".into(),
            },
        };

        let line = forecast_line(&day);
        assert!(line.starts_with("Fri Jun 13"));
        assert!(line.contains("22°C"));
        assert!(line.contains("(Rain)"));
        assert!(line.contains("min 18°C / max 24°C"));
    }

    #[test]
    fn empty_forecast_says_so() {
        assert_eq!(forecast_block(&[]), "No forecast available");
    }
}
