use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    /// Rounded reading in this unit, e.g. "72°F".
    pub fn format(&self, celsius: f64, show_unit: bool) -> String {
        // Halves round toward positive infinity, so -2.5 shows as -2.
        let value = (self.convert(celsius) + 0.5).floor();
        if show_unit {
            format!("{value}{}", self.symbol())
        } else {
            format!("{value}")
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}

/// Rounded Celsius reading, e.g. "23°C".
pub fn format_temperature(temp: f64, show_unit: bool) -> String {
    TemperatureUnit::Celsius.format(temp, show_unit)
}

/// 12-hour clock, e.g. "3:00 PM".
pub fn format_time<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%-I:%M %p").to_string()
}

/// Full weekday, e.g. "Monday".
pub fn format_day<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%A").to_string()
}

/// Abbreviated weekday, e.g. "Mon".
pub fn format_short_day<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%a").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn converts_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn formats_rounded_temperature() {
        assert_eq!(format_temperature(22.5, true), "23°C");
        assert_eq!(format_temperature(-0.4, false), "0");
        assert_eq!(TemperatureUnit::Fahrenheit.format(20.0, true), "68°F");
    }

    #[test]
    fn negative_halves_round_up() {
        assert_eq!(format_temperature(-2.5, false), "-2");
        assert_eq!(format_temperature(-0.5, false), "0");
        assert_eq!(format_temperature(-2.6, true), "-3°C");
        // -20.5°C is -4.9°F
        assert_eq!(TemperatureUnit::Fahrenheit.format(-20.5, false), "-5");
    }

    #[test]
    fn wind_speed_in_kmh() {
        assert!((ms_to_kmh(10.0) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn formats_clock_and_weekday() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).single().expect("valid time");
        assert_eq!(format_time(&t), "3:00 PM");
        assert_eq!(format_day(&t), "Monday");
        assert_eq!(format_short_day(&t), "Mon");
    }
}
