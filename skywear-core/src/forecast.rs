//! Folding 3-hour forecast samples into one summary per calendar date.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};

use crate::model::{DaySummary, WeatherSample};
use crate::units::format_short_day;

/// How many day summaries the forecast view shows.
pub const FORECAST_DAYS: usize = 5;

/// Hours (inclusive) whose sample represents the day.
const NOON_HOURS: std::ops::RangeInclusive<u32> = 11..=13;

/// Group samples by UTC calendar date.
pub fn group_by_day(samples: &[WeatherSample]) -> Vec<DaySummary> {
    group_by_day_at(samples, Utc.fix())
}

/// Group samples by calendar date in `offset`.
///
/// Days appear in the order their first sample was seen. The condition shown
/// for a day comes from a sample between 11:00 and 13:00 if there is one;
/// otherwise it is the first sample of that day.
pub fn group_by_day_at(samples: &[WeatherSample], offset: FixedOffset) -> Vec<DaySummary> {
    let mut days: Vec<DaySummary> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let Some(local) = DateTime::from_timestamp(sample.dt, 0).map(|t| t.with_timezone(&offset))
        else {
            tracing::debug!(dt = sample.dt, "skipping sample with out-of-range timestamp");
            continue;
        };
        let date = local.date_naive();

        let slot = *index.entry(date).or_insert_with(|| {
            days.push(DaySummary {
                date,
                day: format_short_day(&local),
                icon: String::new(),
                condition: String::new(),
                min_temp: f64::INFINITY,
                max_temp: f64::NEG_INFINITY,
                samples: Vec::new(),
            });
            days.len() - 1
        });
        let day = &mut days[slot];

        let (lo, hi) = sample_range(sample);
        day.min_temp = day.min_temp.min(lo);
        day.max_temp = day.max_temp.max(hi);

        if NOON_HOURS.contains(&local.hour()) || day.icon.is_empty() {
            day.icon = sample.condition.icon.clone();
            day.condition = sample.condition.main.clone();
        }

        day.samples.push(sample.clone());
    }

    days
}

fn sample_range(sample: &WeatherSample) -> (f64, f64) {
    let lo = sample.temp_min_c.min(sample.temp_max_c);
    let hi = sample.temp_min_c.max(sample.temp_max_c);
    (lo, hi)
}
