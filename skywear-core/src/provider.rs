use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use tracing::warn;

use crate::{
    Config,
    config::ServiceId,
    model::{CurrentWeather, Forecast, Location},
    provider::{openweather::OpenWeatherProvider, synthetic::SyntheticWeather},
};

pub mod openweather;
pub mod synthetic;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to reach the weather service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse weather {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid weather sample: {0}")]
    InvalidSample(String),

    #[error("Invalid coordinates ({lat}, {lon}): latitude must be -90..90, longitude -180..180")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("No API key configured for OpenWeather")]
    MissingApiKey,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &Location) -> Result<CurrentWeather, WeatherError>;

    /// 3-hour samples for the next five days, in time order.
    async fn forecast(&self, location: &Location) -> Result<Forecast, WeatherError>;
}

/// Whether a result came from the network or was made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: DataSource,
}

/// Serves live data when possible and placeholder data otherwise.
///
/// Without a primary provider, or when it fails, the call is logged and
/// answered from [`SyntheticWeather`], so callers always get something to show.
#[derive(Debug)]
pub struct FallbackProvider {
    primary: Option<Box<dyn WeatherProvider>>,
    synthetic: SyntheticWeather,
}

impl FallbackProvider {
    pub fn new(primary: Option<Box<dyn WeatherProvider>>) -> Self {
        Self { primary, synthetic: SyntheticWeather }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn current(&self, location: &Location) -> Fetched<CurrentWeather> {
        if let Some(primary) = &self.primary {
            match primary.current(location).await {
                Ok(value) => return Fetched { value, source: DataSource::Live },
                Err(err) => warn!(%location, error = %err, "current weather fetch failed, using synthetic data"),
            }
        } else {
            warn!("No API key provided for weather service, using synthetic data");
        }

        Fetched { value: self.synthetic.current_for(location), source: DataSource::Synthetic }
    }

    pub async fn forecast(&self, location: &Location) -> Fetched<Forecast> {
        if let Some(primary) = &self.primary {
            match primary.forecast(location).await {
                Ok(value) => return Fetched { value, source: DataSource::Live },
                Err(err) => warn!(%location, error = %err, "forecast fetch failed, using synthetic data"),
            }
        } else {
            warn!("No API key provided for weather service, using synthetic data");
        }

        Fetched { value: self.synthetic.forecast_for(location), source: DataSource::Synthetic }
    }
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key(ServiceId::OpenWeather).ok_or(WeatherError::MissingApiKey)?;
    let base_url = config
        .service_config(ServiceId::OpenWeather)
        .and_then(|svc| svc.base_url.clone());

    let provider = match base_url {
        Some(url) => OpenWeatherProvider::with_base_url(api_key, url)?,
        None => OpenWeatherProvider::new(api_key)?,
    };

    Ok(Box::new(provider))
}

/// Like [`provider_from_config`], but a missing key yields a synthetic-only provider.
pub fn fallback_from_config(config: &Config) -> Result<FallbackProvider, WeatherError> {
    match provider_from_config(config) {
        Ok(primary) => Ok(FallbackProvider::new(Some(primary))),
        Err(WeatherError::MissingApiKey) => Ok(FallbackProvider::new(None)),
        Err(err) => Err(err),
    }
}
