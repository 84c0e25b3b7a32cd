//! Public IP geolocation and place-name geocoding over HTTP

use crate::data::PublicIpInfo;
use crate::error::{HostfetchError, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const PUBLIC_IP_URL: &str = "https://ipapi.co/json/";
const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const PUBLIC_IP_TIMEOUT: Duration = Duration::from_millis(1200);
const GEOCODING_TIMEOUT: Duration = Duration::from_secs(2);

const USER_AGENT: &str = concat!("hostfetch/", env!("CARGO_PKG_VERSION"));

/// GET `url` with `query` and decode a JSON body; non-2xx is an error
pub(crate) fn get_json<T: DeserializeOwned>(url: &str, query: &[(&str, String)], timeout: Duration) -> Result<T> {
    let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
    let response = client.get(url).query(query).send()?.error_for_status()?;
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|err| HostfetchError::Parse(format!("{}: {}", url, err)))
}

#[derive(Debug, Deserialize)]
struct IpapiResponse {
    #[serde(default)]
    ip: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country_name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

impl From<IpapiResponse> for PublicIpInfo {
    fn from(response: IpapiResponse) -> Self {
        PublicIpInfo {
            ip: response.ip,
            country: response.country_name,
            country_code: response.country,
            city: response.city,
            state: response.region,
            latitude: response.latitude,
            longitude: response.longitude,
        }
    }
}

/// Public IP address and its approximate location
pub fn fetch_public_ip() -> Result<PublicIpInfo> {
    let response: IpapiResponse = get_json(PUBLIC_IP_URL, &[], PUBLIC_IP_TIMEOUT)?;
    debug!(city = %response.city, "public ip located");
    Ok(response.into())
}

/// A place resolved by the geocoding service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub admin1: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

/// Resolve a place name to coordinates
pub fn fetch_coordinates(name: &str, state: Option<&str>, country: &str) -> Result<GeoResult> {
    let response: GeoResponse = get_json(GEOCODING_URL, &[("name", name.to_string())], GEOCODING_TIMEOUT)?;
    select_location(response.results, name, state, country)
        .ok_or_else(|| HostfetchError::Detection(format!("no place named '{}' in '{}'", name, country)))
}

/// First result matching name and country (and state when given), ignoring case
pub fn select_location(results: Vec<GeoResult>, name: &str, state: Option<&str>, country: &str) -> Option<GeoResult> {
    results.into_iter().find(|result| {
        result.name.eq_ignore_ascii_case(name)
            && result.country.eq_ignore_ascii_case(country)
            && state.map_or(true, |state| result.admin1.eq_ignore_ascii_case(state))
    })
}
