use crate::advisories::NotificationPreferences;
use crate::error::{Result, SkywiseError};
use crate::models::SoilType;
use dialoguer::{Confirm, Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
const DATA_DIR_ENV: &str = "SKYWISE_DATA_DIR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub openweathermap: Option<OpenWeatherMapConfig>,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

impl OpenWeatherMapConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            enabled: true,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub default_city: String,
    pub default_soil: String,
    pub forecast_days: usize,
    pub notification_cap: usize,
    /// Fixes template choice and jitter; unset draws from the OS
    pub random_seed: Option<u64>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            default_city: "London".into(),
            default_soil: "loamy".into(),
            forecast_days: 7,
            notification_cap: 10,
            random_seed: None,
        }
    }
}

impl AdvisorConfig {
    pub fn soil(&self) -> SoilType {
        SoilType::parse_or_default(&self.default_soil)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub forecast_ttl_minutes: i64,
    pub climate_ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            forecast_ttl_minutes: 30,
            climate_ttl_hours: 24,
        }
    }
}

fn input_error(e: dialoguer::Error) -> SkywiseError {
    SkywiseError::Config(format!("Input error: {}", e))
}

impl Config {
    /// Load the config file, or defaults when none exists. The API key may
    /// also come from the environment.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        let mut config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .map_err(|e| SkywiseError::Config(format!("Failed to read config: {}", e)))?;
            let config_str = Self::substitute_env_vars(&config_str);
            serde_yaml::from_str(&config_str)
                .map_err(|e| SkywiseError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("No config at {:?}, using defaults", config_path);
            Config::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() && config.openweathermap.is_none() {
                info!("Using OpenWeatherMap key from {}", API_KEY_ENV);
                config.openweathermap = Some(OpenWeatherMapConfig::new(key));
            }
        }

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }
        Self::default_config_path()
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/skywise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SkywiseError::Config("Cannot determine config directory".into()))?
            .join("skywise");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up Skywise!");
        println!();

        println!("Advisories");
        let default_city: String = Input::new()
            .with_prompt("  Default city")
            .default("London".into())
            .interact_text()
            .map_err(input_error)?;

        let default_soil: String = Input::new()
            .with_prompt("  Garden soil (sandy, loamy, clay, silty)")
            .default("loamy".into())
            .validate_with(|s: &String| match SoilType::from_str(s) {
                Some(_) => Ok(()),
                None => Err("unknown soil type"),
            })
            .interact_text()
            .map_err(input_error)?;

        let forecast_days: usize = Input::new()
            .with_prompt("  Days to look ahead (3-14)")
            .default(7)
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("OpenWeatherMap (leave API key blank to use simulated weather)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)?;

        let openweathermap =
            (!owm_api_key.trim().is_empty()).then(|| OpenWeatherMapConfig::new(owm_api_key));

        println!();

        let cache_enabled = Confirm::new()
            .with_prompt("Cache provider responses locally?")
            .default(true)
            .interact()
            .map_err(input_error)?;

        let config = Config {
            openweathermap,
            advisor: AdvisorConfig {
                default_city,
                default_soil,
                forecast_days,
                ..AdvisorConfig::default()
            },
            cache: CacheConfig {
                enabled: cache_enabled,
                ..CacheConfig::default()
            },
            notifications: NotificationPreferences::default(),
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)?;
        let content = format!(
            "# Skywise Configuration\n# Generated by `skywise init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| SkywiseError::Config("Cannot determine data directory".into()))?
            .join("skywise");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("skywise.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str(
            "advisor:\n  default_city: Sydney\ncache:\n  forecast_ttl_minutes: 5\n",
        )
        .unwrap();
        assert_eq!(config.advisor.default_city, "Sydney");
        assert_eq!(config.advisor.forecast_days, 7);
        assert_eq!(config.cache.forecast_ttl_minutes, 5);
        assert_eq!(config.cache.climate_ttl_hours, 24);
        assert!(config.openweathermap.is_none());
        assert_eq!(config.notifications.max_daily_notifications, 5);
    }

    #[test]
    fn api_key_is_redacted() {
        let owm = OpenWeatherMapConfig::new("secret-key".into());
        let shown = format!("{:?}", owm);
        assert!(!shown.contains("secret-key"));
        assert!(shown.contains("[REDACTED]"));
        assert!(owm.is_usable());
        assert!(!OpenWeatherMapConfig::new("  ".into()).is_usable());
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("SKYWISE_TEST_CITY", "Lisbon");
        let out = Config::substitute_env_vars("city: ${SKYWISE_TEST_CITY} ${SKYWISE_UNSET_VAR}");
        assert_eq!(out, "city: Lisbon ${SKYWISE_UNSET_VAR}");
    }

    #[test]
    fn unknown_soil_falls_back_to_loamy() {
        let advisor = AdvisorConfig {
            default_soil: "peat".into(),
            ..AdvisorConfig::default()
        };
        assert_eq!(advisor.soil(), SoilType::Loamy);
    }
}
