use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use serde::Serialize;
use skywear_core::{
    Assistant, AssistantConfig, Config, CurrentWeather, DataSource, DaySummary, FORECAST_DAYS,
    Location, OutfitRecommendation, ServiceId, TemperatureUnit, classify_background,
    classify_condition, group_by_day_at, provider::fallback_from_config, recommend,
};
use tracing::warn;

use crate::render;

const DEFAULT_CITY: &str = "New York";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywear", version, about = "Weather lookup with outfit suggestions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a service.
    Configure {
        /// Service short name: "openweather" or "openai".
        service: String,
    },

    /// Show current weather, the forecast and an outfit suggestion.
    Show(ShowArgs),

    /// Suggest an outfit for given conditions without fetching anything.
    Outfit {
        /// Temperature in °C.
        #[arg(allow_negative_numbers = true)]
        temperature: f64,

        /// Condition category, e.g. "Rain" or "Clear".
        condition: String,

        /// Treat it as night time.
        #[arg(long)]
        night: bool,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City name; defaults to the configured city.
    #[arg(conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude, used together with --lon.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude, used together with --lat.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Show temperatures in Fahrenheit.
    #[arg(long)]
    pub fahrenheit: bool,

    /// Number of forecast days to show.
    #[arg(long, default_value_t = FORECAST_DAYS)]
    pub days: usize,

    /// Ask the language model to phrase the outfit advice.
    #[arg(long)]
    pub advise: bool,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Everything `show` prints, in machine-readable form.
#[derive(Debug, Serialize)]
pub struct Report {
    pub synthetic: bool,
    pub current: CurrentWeather,
    pub is_day: bool,
    pub icon: skywear_core::IconCategory,
    pub theme: skywear_core::Theme,
    pub gradient: skywear_core::Gradient,
    pub forecast: Vec<DaySummary>,
    pub outfit: OutfitRecommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { service } => configure(&service),
            Command::Show(args) => show(args).await,
            Command::Outfit { temperature, condition, night } => {
                let outfit = recommend(temperature, &condition, !night);
                print!("{}", render::outfit(&outfit)?);
                Ok(())
            }
        }
    }
}

fn configure(service: &str) -> anyhow::Result<()> {
    let id = ServiceId::try_from(service)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_service_api_key(id, api_key.trim().to_string());

    match id {
        ServiceId::OpenWeather => {
            let city = Text::new("Default city (leave empty to skip):")
                .with_default(config.default_city.as_deref().unwrap_or(""))
                .prompt()
                .context("Failed to read default city")?;
            if !city.trim().is_empty() {
                config.set_default_city(city.trim());
            }
        }
        ServiceId::OpenAi => {
            let base_url = Text::new("API base URL:")
                .with_default(skywear_core::assistant::DEFAULT_BASE_URL)
                .prompt()
                .context("Failed to read base URL")?;
            let model = Text::new("Model:")
                .with_default(skywear_core::assistant::DEFAULT_MODEL)
                .prompt()
                .context("Failed to read model name")?;

            if let Some(svc) = config.service_config_mut(id) {
                svc.base_url = Some(base_url.trim().to_string());
                svc.model = Some(model.trim().to_string());
            }
        }
    }

    config.save()?;
    println!("Saved {id} settings to {}", Config::config_file_path()?.display());

    Ok(())
}

fn resolve_location(args: &ShowArgs, config: &Config) -> anyhow::Result<Location> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        return Ok(Location::coordinates(lat, lon)?);
    }

    let city = args
        .city
        .clone()
        .or_else(|| config.default_city.clone())
        .unwrap_or_else(|| DEFAULT_CITY.to_string());

    if city.trim().is_empty() {
        bail!("City name must not be empty");
    }

    Ok(Location::city(city.trim()))
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let location = resolve_location(&args, &config)?;
    let unit = if args.fahrenheit { TemperatureUnit::Fahrenheit } else { config.units };

    let provider = fallback_from_config(&config)?;

    let current = provider.current(&location).await;
    let forecast = provider.forecast(&location).await;
    let synthetic = current.source == DataSource::Synthetic || forecast.source == DataSource::Synthetic;

    let current = current.value;
    let is_day = current.is_day();
    let sample = &current.sample;

    let mut days = group_by_day_at(&forecast.value.samples, forecast.value.offset());
    days.truncate(args.days);

    let outfit = recommend(sample.temperature_c, &sample.condition.main, is_day);
    let advice = match (args.advise, advise_hint(&config)) {
        (false, _) => None,
        (true, Some(hint)) => {
            eprintln!("{hint}");
            None
        }
        (true, None) => phrase(&config, &current, &outfit).await,
    };

    let theme = classify_background(&sample.condition.main, is_day);
    let report = Report {
        synthetic,
        icon: classify_condition(&sample.condition.description, is_day),
        theme,
        gradient: theme.gradient(),
        is_day,
        forecast: days,
        outfit,
        advice,
        current,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::report(&report, unit)?);
    }

    Ok(())
}

/// What to tell the user when `--advise` has no API key to work with.
fn advise_hint(config: &Config) -> Option<String> {
    let id = ServiceId::OpenAi;
    (!config.is_service_configured(id)).then(|| {
        format!("--advise needs an API key: run `skywear configure {id}` or set {}", id.env_var())
    })
}

/// Language-model phrasing, or `None` with a warning when it is unavailable.
async fn phrase(config: &Config, current: &CurrentWeather, outfit: &OutfitRecommendation) -> Option<String> {
    let assistant = AssistantConfig::from_config(config).and_then(Assistant::new);

    let result = match assistant {
        Ok(assistant) => assistant.phrase(current, outfit).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(error = %err, "could not phrase outfit advice, showing rule-based advice");
            None
        }
    }
}
