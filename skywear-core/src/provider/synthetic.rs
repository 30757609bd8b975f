//! Placeholder weather for when no API key is configured or the service is down.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::model::{Condition, CurrentWeather, Forecast, Location, WeatherSample};

const DEFAULT_CITY: &str = "New York";
const DEFAULT_COUNTRY: &str = "US";
const FORECAST_SAMPLES: i64 = 40;
const STEP_SECS: i64 = 3 * 3600;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticWeather;

impl SyntheticWeather {
    pub fn current_for(&self, location: &Location) -> CurrentWeather {
        self.current_at(location, Utc::now())
    }

    pub fn forecast_for(&self, location: &Location) -> Forecast {
        self.forecast_at(location, Utc::now())
    }

    /// A mild clear day, with `now` one hour after sunrise and one hour before sunset.
    pub fn current_at(&self, location: &Location, now: DateTime<Utc>) -> CurrentWeather {
        let dt = now.timestamp();

        CurrentWeather {
            location_name: city_name(location),
            country: DEFAULT_COUNTRY.to_string(),
            sample: WeatherSample {
                dt,
                temperature_c: 22.5,
                feels_like_c: 23.2,
                temp_min_c: 21.0,
                temp_max_c: 24.8,
                humidity_pct: 65,
                pressure_hpa: 1012.0,
                wind_speed_mps: 3.6,
                wind_deg: 220.0,
                condition: clear(),
            },
            sunrise: dt - 3600,
            sunset: dt + 3600,
            timezone_offset: 0,
        }
    }

    /// Forty 3-hourly samples from `now`; every fifth one is light rain.
    pub fn forecast_at(&self, location: &Location, now: DateTime<Utc>) -> Forecast {
        let mut rng = rand::rng();
        let start = now.timestamp();

        let samples = (0..FORECAST_SAMPLES)
            .map(|i| WeatherSample {
                dt: start + i * STEP_SECS,
                temperature_c: 20.0 + rng.random_range(0.0..10.0),
                feels_like_c: 21.0 + rng.random_range(0.0..10.0),
                temp_min_c: 19.0 + rng.random_range(0.0..5.0),
                temp_max_c: 24.0 + rng.random_range(0.0..5.0),
                humidity_pct: rng.random_range(60..80),
                pressure_hpa: 1010.0 + rng.random_range(0.0..10.0),
                wind_speed_mps: 3.0 + rng.random_range(0.0..5.0),
                wind_deg: rng.random_range(0.0..360.0),
                condition: if i % 5 == 0 { light_rain() } else { clear() },
            })
            .collect();

        Forecast {
            city: city_name(location),
            country: DEFAULT_COUNTRY.to_string(),
            timezone_offset: 0,
            samples,
        }
    }
}

fn city_name(location: &Location) -> String {
    match location {
        Location::City(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => DEFAULT_CITY.to_string(),
    }
}

fn clear() -> Condition {
    Condition {
        id: 800,
        main: "Clear".to_string(),
        description: "clear sky".to_string(),
        icon: "01d".to_string(),
    }
}

fn light_rain() -> Condition {
    Condition {
        id: 500,
        main: "Rain".to_string(),
        description: "light rain".to_string(),
        icon: "10d".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::group_by_day;
    use chrono::TimeZone;

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("valid time")
    }

    #[test]
    fn current_is_a_clear_day() {
        let current = SyntheticWeather.current_at(&Location::city("Lisbon"), midnight());

        assert_eq!(current.location_name, "Lisbon");
        assert_eq!(current.sample.condition.main, "Clear");
        assert!(current.is_day());
    }

    #[test]
    fn coordinates_use_the_default_city() {
        let location = Location::coordinates(1.0, 2.0).expect("valid coordinates");
        assert_eq!(SyntheticWeather.current_at(&location, midnight()).location_name, "New York");
    }

    #[test]
    fn forecast_spans_five_days_of_three_hour_steps() {
        let forecast = SyntheticWeather.forecast_at(&Location::city("Lisbon"), midnight());

        assert_eq!(forecast.samples.len(), 40);
        assert!(forecast.samples.windows(2).all(|w| w[1].dt - w[0].dt == STEP_SECS));
        assert_eq!(forecast.samples[0].condition.main, "Rain");
        assert_eq!(forecast.samples[1].condition.main, "Clear");
        assert_eq!(forecast.samples[5].condition.main, "Rain");

        let days = group_by_day(&forecast.samples);
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| d.min_temp <= d.max_temp));
    }
}
