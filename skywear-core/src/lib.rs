//! Core library for the `skywear` CLI.
//!
//! This crate defines:
//! - Shared domain models (samples, day summaries, outfits)
//! - Pure classification, forecast grouping and outfit rules
//! - Configuration & credentials handling
//! - Weather providers with a synthetic fallback
//! - Optional language-model phrasing of outfit advice
//!
//! It is used by `skywear-cli`, but can also be reused by other binaries or services.

pub mod assistant;
pub mod classify;
pub mod config;
pub mod forecast;
pub mod model;
pub mod outfit;
pub mod provider;
pub mod units;

pub use assistant::{Assistant, AssistantConfig, AssistantError};
pub use classify::{Gradient, IconCategory, Theme, classify_background, classify_condition, is_daytime};
pub use config::{Config, ServiceConfig, ServiceId};
pub use forecast::{FORECAST_DAYS, group_by_day, group_by_day_at};
pub use model::{Condition, CurrentWeather, DaySummary, Forecast, Location, OutfitRecommendation, WeatherSample};
pub use outfit::recommend;
pub use provider::{DataSource, FallbackProvider, Fetched, WeatherError, WeatherProvider};
pub use units::TemperatureUnit;
