use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::model::{Condition, CurrentWeather, Forecast, Location, WeatherSample};

use super::{WeatherError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        location: &Location,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        match location {
            Location::City(name) => query.push(("q", name.clone())),
            Location::Coordinates { lat, lon } => {
                query.push(("lat", lat.to_string()));
                query.push(("lon", lon.to_string()));
            }
        }

        debug!(%url, "requesting OpenWeather {endpoint}");

        let res = self.http.get(&url).query(&query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip_all, fields(location = %location))]
    async fn current(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        parsed.try_into()
    }

    #[instrument(skip_all, fields(location = %location))]
    async fn forecast(&self, location: &Location) -> Result<Forecast, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;
        parsed.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn to_sample(dt: i64, main: OwMain, weather: Vec<OwWeather>, wind: OwWind) -> Result<WeatherSample, WeatherError> {
    let readings = [main.temp, main.feels_like, main.temp_min, main.temp_max];
    if readings.iter().any(|t| !t.is_finite()) {
        return Err(WeatherError::InvalidSample(format!("non-finite temperature at dt={dt}")));
    }

    let first = weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::InvalidSample(format!("no weather condition at dt={dt}")))?;

    Ok(WeatherSample {
        dt,
        temperature_c: main.temp,
        feels_like_c: main.feels_like,
        temp_min_c: main.temp_min,
        temp_max_c: main.temp_max,
        humidity_pct: main.humidity,
        pressure_hpa: main.pressure,
        wind_speed_mps: wind.speed,
        wind_deg: wind.deg,
        condition: Condition {
            id: first.id,
            main: first.main,
            description: first.description,
            icon: first.icon,
        },
    })
}

impl TryFrom<OwCurrentResponse> for CurrentWeather {
    type Error = WeatherError;

    fn try_from(raw: OwCurrentResponse) -> Result<Self, Self::Error> {
        Ok(CurrentWeather {
            location_name: raw.name,
            country: raw.sys.country.unwrap_or_default(),
            sample: to_sample(raw.dt, raw.main, raw.weather, raw.wind)?,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
            timezone_offset: raw.timezone,
        })
    }
}

impl TryFrom<OwForecastResponse> for Forecast {
    type Error = WeatherError;

    fn try_from(raw: OwForecastResponse) -> Result<Self, Self::Error> {
        let samples = raw
            .list
            .into_iter()
            .map(|e| to_sample(e.dt, e.main, e.weather, e.wind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast {
            city: raw.city.name,
            country: raw.city.country.unwrap_or_default(),
            timezone_offset: raw.city.timezone,
            samples,
        })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_payload() {
        let raw: OwCurrentResponse = serde_json::from_value(serde_json::json!({
            "name": "Oslo",
            "dt": 1_705_320_000,
            "timezone": 3600,
            "main": { "temp": -3.2, "feels_like": -7.0, "temp_min": -4.0, "temp_max": -2.0, "humidity": 80, "pressure": 1021 },
            "weather": [{ "id": 600, "main": "Snow", "description": "light snow", "icon": "13d" }],
            "wind": { "speed": 4.1, "deg": 350 },
            "sys": { "country": "NO", "sunrise": 1_705_305_000, "sunset": 1_705_328_000 }
        }))
        .expect("valid payload");

        let current = CurrentWeather::try_from(raw).expect("valid sample");
        assert_eq!(current.location_name, "Oslo");
        assert_eq!(current.country, "NO");
        assert_eq!(current.sample.condition.main, "Snow");
        assert_eq!(current.sample.pressure_hpa, 1021.0);
        assert!(current.is_day());
    }

    #[test]
    fn rejects_sample_without_condition() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1_705_320_000,
            "main": { "temp": 1.0, "feels_like": 1.0, "temp_min": 1.0, "temp_max": 1.0, "humidity": 80, "pressure": 1000 },
            "weather": [],
            "wind": { "speed": 1.0 }
        }))
        .expect("valid payload");

        let err = to_sample(entry.dt, entry.main, entry.weather, entry.wind).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidSample(_)));
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
