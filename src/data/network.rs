//! Network-derived information: public IP geolocation and weather

use serde::{Deserialize, Serialize};

/// Public IP address and its geolocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicIpInfo {
    #[serde(rename = "query")]
    pub ip: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current weather at the configured (or geolocated) place.
///
/// The record carries its own location label so it can be cached and
/// rendered without the public IP item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_unit: String,
    pub wind_speed: f64,
    pub wind_gusts: f64,
    pub wind_direction: i32,
    pub wind_unit: String,
    pub current_weather: String,
    pub location_name: String,
    pub location_country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}
