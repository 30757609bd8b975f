use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::WeatherError;

/// Where to look up the weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Location {
    pub fn city(name: impl Into<String>) -> Self {
        Location::City(name.into())
    }

    /// Coordinates outside ±90 latitude / ±180 longitude are rejected.
    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, WeatherError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidCoordinates { lat, lon });
        }
        Ok(Location::Coordinates { lat, lon })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::City(name) => f.write_str(name),
            Location::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

/// Coarse category plus free-text description, e.g. "Rain" / "light rain".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// One timestamped observation or forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Seconds since the Unix epoch.
    pub dt: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub wind_deg: f64,
    pub condition: Condition,
}

impl WeatherSample {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: String,
    pub sample: WeatherSample,
    pub sunrise: i64,
    pub sunset: i64,
    /// Shift from UTC in seconds.
    pub timezone_offset: i32,
}

impl CurrentWeather {
    pub fn is_day(&self) -> bool {
        crate::classify::is_daytime(self.sample.dt, self.sunrise, self.sunset)
    }

    pub fn offset(&self) -> FixedOffset {
        offset_or_utc(self.timezone_offset)
    }

    pub fn local_time(&self) -> Option<DateTime<FixedOffset>> {
        self.sample.time().map(|t| t.with_timezone(&self.offset()))
    }
}

/// Ordered 3-hour forecast samples for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub timezone_offset: i32,
    pub samples: Vec<WeatherSample>,
}

impl Forecast {
    pub fn offset(&self) -> FixedOffset {
        offset_or_utc(self.timezone_offset)
    }
}

/// Aggregate of all samples falling on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// Serialised as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub day: String,
    pub icon: String,
    pub condition: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub samples: Vec<WeatherSample>,
}

/// Clothing suggestion for a single set of conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitRecommendation {
    pub top_wear: String,
    pub bottom_wear: String,
    pub footwear: String,
    pub accessories: Vec<String>,
    pub advice: String,
}

fn offset_or_utc(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        assert!(Location::coordinates(91.0, 0.0).is_err());
        assert!(Location::coordinates(0.0, -181.0).is_err());
        assert!(Location::coordinates(59.91, 10.75).is_ok());
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::city("Oslo").to_string(), "Oslo");
        let loc = Location::coordinates(59.9139, 10.7522).expect("valid coordinates");
        assert_eq!(loc.to_string(), "59.9139, 10.7522");
    }

    #[test]
    fn day_summary_serializes_iso_date() {
        let summary = DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date"),
            day: "Sat".into(),
            icon: "01d".into(),
            condition: "Clear".into(),
            min_temp: 3.0,
            max_temp: 9.5,
            samples: vec![],
        };

        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(json["minTemp"], 3.0);
    }

    #[test]
    fn outfit_uses_camel_case_on_the_wire() {
        let rec = OutfitRecommendation {
            top_wear: "T-shirt".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&rec).expect("serializable");
        assert_eq!(json["topWear"], "T-shirt");
        assert!(json["accessories"].as_array().is_some_and(|a| a.is_empty()));
    }
}
