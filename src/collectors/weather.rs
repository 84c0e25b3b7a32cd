//! Current weather from Open-Meteo

use super::network::{fetch_coordinates, fetch_public_ip, get_json};
use crate::config::{Lang, Units, WeatherSettings};
use crate::data::Weather;
use crate::error::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const FORECAST_TIMEOUT: Duration = Duration::from_secs(3);
const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,weather_code,wind_speed_10m,wind_direction_10m,wind_gusts_10m";

/// Where the forecast is requested for, and how the place is labelled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country_code: String,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    current_units: CurrentUnits,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct CurrentUnits {
    temperature_2m: String,
    wind_speed_10m: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: f64,
    apparent_temperature: f64,
    weather_code: u32,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    wind_gusts_10m: f64,
}

/// Resolve the location, then fetch the current conditions there
pub fn fetch_weather(settings: &WeatherSettings) -> Result<Weather> {
    let location = resolve_location(settings)?;
    debug!(latitude = location.latitude, longitude = location.longitude, "fetching weather");

    let mut query = vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("current", CURRENT_FIELDS.to_string()),
    ];
    if settings.units == Units::Imperial {
        query.push(("temperature_unit", "fahrenheit".to_string()));
        query.push(("wind_speed_unit", "mph".to_string()));
        query.push(("precipitation_unit", "inch".to_string()));
    }

    let forecast: Forecast = get_json(FORECAST_URL, &query, FORECAST_TIMEOUT)?;
    Ok(build_weather(forecast, settings.lang, location))
}

/// Configured place name, then configured coordinates, then public IP
fn resolve_location(settings: &WeatherSettings) -> Result<Location> {
    if let (Some(name), Some(country)) = (&settings.location_name_en, &settings.location_country_en) {
        let place = fetch_coordinates(name, settings.location_state_en.as_deref(), country)?;
        return Ok(Location {
            latitude: place.latitude,
            longitude: place.longitude,
            name: name.clone(),
            country_code: place.country_code,
        });
    }
    if let (Some(latitude), Some(longitude)) = (settings.latitude, settings.longitude) {
        return Ok(Location {
            latitude,
            longitude,
            ..Location::default()
        });
    }
    // Resolved here rather than shared with the public IP item
    let ip = fetch_public_ip()?;
    Ok(Location {
        latitude: ip.latitude,
        longitude: ip.longitude,
        name: ip.city,
        country_code: ip.country_code,
    })
}

fn build_weather(forecast: Forecast, lang: Lang, location: Location) -> Weather {
    let current = forecast.current;
    Weather {
        temperature: current.temperature_2m,
        feels_like: current.apparent_temperature,
        temp_unit: forecast.current_units.temperature_2m,
        wind_speed: current.wind_speed_10m,
        wind_gusts: current.wind_gusts_10m,
        wind_direction: current.wind_direction_10m.round() as i32,
        wind_unit: forecast.current_units.wind_speed_10m,
        current_weather: describe_wmo_code(current.weather_code, lang).to_string(),
        location_name: location.name,
        location_country_code: location.country_code,
        latitude: location.latitude,
        longitude: location.longitude,
    }
}

/// Human description of a WMO weather interpretation code
pub fn describe_wmo_code(code: u32, lang: Lang) -> &'static str {
    let (en, fr) = match code {
        0 => ("Clear sky", "Dégagé"),
        1 => ("Mainly clear", "Principalement dégagé"),
        2 => ("Partly cloudy", "Partiellement nuageux"),
        3 => ("Overcast", "Couvert"),
        45 => ("Fog", "Brouillard"),
        48 => ("Depositing rime fog", "Brouillard givrant"),
        51 => ("Light drizzle", "Légère bruine"),
        53 => ("Drizzle", "Bruine"),
        55 => ("Dense drizzle", "Bruine dense"),
        56 => ("Light freezing drizzle", "Légère bruine verglaçante"),
        57 => ("Dense freezing Drizzle", "Bruine verglaçante dense"),
        61 => ("Slight rain", "Légère pluie"),
        63 => ("Rain", "Pluie"),
        65 => ("Heavy rain", "Forte pluie"),
        66 => ("Light freezing rain", "Légère pluie verglaçante"),
        67 => ("Heavy freezing rain", "Forte pluie verglaçante"),
        71 => ("Slight snow fall", "Chute de neige"),
        73 => ("Snow fall", "Chute de neige modérée"),
        75 => ("Heavy snow fall", "Forte chute de neige"),
        77 => ("Snow grains", "Neige en grains"),
        80 => ("Slight rain showers", "Légère averse de pluie"),
        81 => ("Rain showers", "Averse de pluie"),
        82 => ("Heavy rain showers", "Forte averse de pluie"),
        85 => ("Slight snow showers", "Légère averse de neige"),
        86 => ("Heavy snow showers", "Forte averse de neige"),
        95 => ("Thunderstorm", "Orageux"),
        96 => ("Slight thunderstorm with hail", "Léger orage accompagné de grêle"),
        99 => ("Heavy thunderstorm with hail", "Fort orage accompagné de grêle"),
        _ => return "Unknown",
    };
    match lang {
        Lang::En => en,
        Lang::Fr => fr,
    }
}
