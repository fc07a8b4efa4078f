use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::model::{DailyForecast, ForecastPoint};

const MIDDAY_HOUR: u32 = 12;

fn is_midday(time: NaiveTime) -> bool {
    time.hour() == MIDDAY_HOUR && time.minute() == 0 && time.second() == 0
}

/// Keep one midday sample per calendar day, ordered by date.
///
/// Days without a 12:00:00 sample are dropped rather than filled in. If a
/// day somehow carries several midday samples the first one wins.
pub fn reduce(points: &[ForecastPoint]) -> Vec<DailyForecast> {
    let mut days: BTreeMap<NaiveDate, &ForecastPoint> = BTreeMap::new();

    for point in points.iter().filter(|p| is_midday(p.timestamp.time())) {
        days.entry(point.timestamp.date()).or_insert(point);
    }

    days.into_iter()
        .map(|(date, point)| DailyForecast {
            date,
            sample: point.clone(),
        })
        .collect()
}
