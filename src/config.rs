//! Configuration file loading and validation

use crate::catalog::RequestedItems;
use crate::error::{HostfetchError, Result};
use crate::utils::file::expand_tilde;
use dirs::{cache_dir, config_dir};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const APP_DIR: &str = "hostfetch";

/// The file as written by the user; every key is optional
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub items: Option<Vec<String>>,
    pub cache: Option<bool>,
    pub cache_file: Option<String>,
    pub weather_cache_file: Option<String>,
    pub display_logo: Option<bool>,
    pub logo_file: Option<String>,
    pub nerd_symbols: Option<bool>,
    pub weather: Option<WeatherFile>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct WeatherFile {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name_en: Option<String>,
    pub location_state_en: Option<String>,
    pub location_country_en: Option<String>,
    pub units: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl FromStr for Units {
    type Err = HostfetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            other => Err(HostfetchError::Config(format!("invalid weather units: {}", other))),
        }
    }
}

/// Language of weather descriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Fr,
}

impl FromStr for Lang {
    type Err = HostfetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Lang::En),
            "fr" => Ok(Lang::Fr),
            other => Err(HostfetchError::Config(format!("invalid language: {}", other))),
        }
    }
}

/// Where and how to fetch the weather
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSettings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name_en: Option<String>,
    pub location_state_en: Option<String>,
    pub location_country_en: Option<String>,
    pub units: Units,
    pub lang: Lang,
}

impl TryFrom<WeatherFile> for WeatherSettings {
    type Error = HostfetchError;

    fn try_from(file: WeatherFile) -> Result<Self> {
        if file.location_name_en.is_some() && file.location_country_en.is_none() {
            return Err(HostfetchError::Config(
                "for weather, a location name needs a country".to_string(),
            ));
        }
        Ok(Self {
            latitude: file.latitude,
            longitude: file.longitude,
            location_name_en: file.location_name_en,
            location_state_en: file.location_state_en.filter(|state| !state.is_empty()),
            location_country_en: file.location_country_en,
            units: file.units.as_deref().map(Units::from_str).transpose()?.unwrap_or_default(),
            lang: file.lang.as_deref().map(Lang::from_str).transpose()?.unwrap_or_default(),
        })
    }
}

/// Validated configuration with defaults applied
#[derive(Debug, Clone)]
pub struct Config {
    pub items: RequestedItems,
    pub cache: bool,
    pub cache_file: PathBuf,
    pub weather_cache_file: PathBuf,
    pub display_logo: bool,
    /// `None` selects the built-in logo
    pub logo_file: Option<PathBuf>,
    pub nerd_symbols: bool,
    pub weather: WeatherSettings,
}

impl Default for Config {
    fn default() -> Self {
        let cache_base = cache_dir().unwrap_or_else(std::env::temp_dir).join(APP_DIR);
        Self {
            items: RequestedItems::default_items(),
            cache: true,
            cache_file: cache_base.join("static.json"),
            weather_cache_file: cache_base.join("weather.json"),
            display_logo: true,
            logo_file: None,
            nerd_symbols: true,
            weather: WeatherSettings::default(),
        }
    }
}

impl Config {
    /// `<config dir>/hostfetch/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load `explicit` (which must exist) or the default file (which may not)
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(HostfetchError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => path,
                None => {
                    debug!("no config file, using defaults");
                    return Ok(Config::default());
                }
            },
        };

        debug!(path = %path.display(), "loading config");
        let data = fs::read_to_string(&path)?;
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Config> {
        let file: ConfigFile = toml::from_str(data)
            .map_err(|err| HostfetchError::Config(format!("invalid config file: {}", err)))?;
        Self::try_from(file)
    }
}

impl TryFrom<ConfigFile> for Config {
    type Error = HostfetchError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let defaults = Config::default();
        let items = match file.items {
            Some(ids) => RequestedItems::parse(&ids)?,
            None => defaults.items,
        };
        Ok(Config {
            items,
            cache: file.cache.unwrap_or(defaults.cache),
            cache_file: file.cache_file.as_deref().map(expand_tilde).unwrap_or(defaults.cache_file),
            weather_cache_file: file
                .weather_cache_file
                .as_deref()
                .map(expand_tilde)
                .unwrap_or(defaults.weather_cache_file),
            display_logo: file.display_logo.unwrap_or(defaults.display_logo),
            logo_file: file.logo_file.as_deref().map(expand_tilde),
            nerd_symbols: file.nerd_symbols.unwrap_or(defaults.nerd_symbols),
            weather: file.weather.map(WeatherSettings::try_from).transpose()?.unwrap_or_default(),
        })
    }
}
