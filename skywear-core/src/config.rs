use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::units::TemperatureUnit;

/// External services skywear can hold credentials for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    OpenWeather,
    OpenAi,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "openweather",
            ServiceId::OpenAi => "openai",
        }
    }

    /// Environment variable that overrides the stored API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "OPENWEATHER_API_KEY",
            ServiceId::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::OpenWeather, ServiceId::OpenAi]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ServiceId::OpenWeather),
            "openai" => Ok(ServiceId::OpenAi),
            _ => Err(anyhow!(
                "Unknown service '{value}'. Supported services: openweather, openai."
            )),
        }
    }
}

/// Credentials and endpoint overrides for a single service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Only meaningful for the language-model service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// City shown when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_city: Option<String>,

    #[serde(default)]
    pub units: TemperatureUnit,

    /// Example TOML:
    /// [services.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

impl Config {
    pub fn service_config(&self, id: ServiceId) -> Option<&ServiceConfig> {
        self.services.get(id.as_str())
    }

    pub fn service_config_mut(&mut self, id: ServiceId) -> Option<&mut ServiceConfig> {
        self.services.get_mut(id.as_str())
    }

    pub fn set_default_city(&mut self, city: impl Into<String>) {
        self.default_city = Some(city.into());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skywear", "skywear")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a service API key, keeping any endpoint overrides.
    pub fn upsert_service_api_key(&mut self, id: ServiceId, api_key: String) {
        match self.service_config_mut(id) {
            Some(existing) => existing.api_key = api_key,
            None => {
                self.services.insert(
                    id.as_str().to_string(),
                    ServiceConfig { api_key, base_url: None, model: None },
                );
            }
        }
    }

    /// Stored API key for a service, if present and non-empty.
    pub fn stored_api_key(&self, id: ServiceId) -> Option<&str> {
        self.service_config(id)
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    /// API key for a service; the service's environment variable wins over the file.
    pub fn api_key(&self, id: ServiceId) -> Option<String> {
        self.api_key_with(id, |name| std::env::var(name).ok())
    }

    fn api_key_with(&self, id: ServiceId, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        env(id.env_var())
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.stored_api_key(id).map(str::to_owned))
    }

    pub fn is_service_configured(&self, id: ServiceId) -> bool {
        self.api_key(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn service_id_as_str_roundtrip() {
        for id in ServiceId::all() {
            let parsed = ServiceId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
        assert_eq!(ServiceId::try_from("OpenWeather").ok(), Some(ServiceId::OpenWeather));
    }

    #[test]
    fn unknown_service_error() {
        let err = ServiceId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown service"));
    }

    #[test]
    fn set_api_key_for_service() {
        let mut cfg = Config::default();

        cfg.upsert_service_api_key(ServiceId::OpenWeather, "OPEN_KEY".into());

        assert_eq!(cfg.stored_api_key(ServiceId::OpenWeather), Some("OPEN_KEY"));
        assert_eq!(cfg.api_key_with(ServiceId::OpenWeather, no_env), Some("OPEN_KEY".into()));
        assert_eq!(cfg.api_key_with(ServiceId::OpenAi, no_env), None);
    }

    #[test]
    fn upsert_keeps_endpoint_overrides() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenAi, "OLD".into());
        if let Some(svc) = cfg.service_config_mut(ServiceId::OpenAi) {
            svc.model = Some("llama3".into());
        }

        cfg.upsert_service_api_key(ServiceId::OpenAi, "NEW".into());

        let svc = cfg.service_config(ServiceId::OpenAi).expect("service must exist");
        assert_eq!(svc.api_key, "NEW");
        assert_eq!(svc.model.as_deref(), Some("llama3"));
    }

    #[test]
    fn environment_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "FILE_KEY".into());

        let env = |name: &str| (name == "OPENWEATHER_API_KEY").then(|| "ENV_KEY".to_string());

        assert_eq!(cfg.api_key_with(ServiceId::OpenWeather, env), Some("ENV_KEY".into()));
    }

    #[test]
    fn stored_key_marks_service_configured() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "KEY".into());

        assert!(cfg.is_service_configured(ServiceId::OpenWeather));
        if std::env::var(ServiceId::OpenAi.env_var()).is_err() {
            assert!(!cfg.is_service_configured(ServiceId::OpenAi));
        }
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "   ".into());

        assert_eq!(cfg.api_key_with(ServiceId::OpenWeather, no_env), None);
        assert_eq!(cfg.api_key_with(ServiceId::OpenWeather, |_| Some(String::new())), None);
    }

    #[test]
    fn parses_toml_with_defaults() {
        let cfg = Config::from_toml(
            r#"
            default_city = "Oslo"
            units = "fahrenheit"

            [services.openai]
            api_key = "sk-test"
            model = "gpt-4o-mini"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.default_city.as_deref(), Some("Oslo"));
        assert_eq!(cfg.units, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.stored_api_key(ServiceId::OpenAi), Some("sk-test"));
        assert!(cfg.service_config(ServiceId::OpenWeather).is_none());

        let empty = Config::from_toml("").expect("empty toml is valid");
        assert_eq!(empty.units, TemperatureUnit::Celsius);
        assert!(empty.services.is_empty());
    }

    #[test]
    fn toml_roundtrip_preserves_services() {
        let mut cfg = Config::default();
        cfg.set_default_city("Reykjavik");
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "KEY".into());

        let text = toml::to_string_pretty(&cfg).expect("serializable");
        let back = Config::from_toml(&text).expect("parsable");

        assert_eq!(back.default_city.as_deref(), Some("Reykjavik"));
        assert_eq!(back.stored_api_key(ServiceId::OpenWeather), Some("KEY"));
    }
}
