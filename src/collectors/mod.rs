//! Adapters to the host: inventory tool, registry, filesystem and HTTP services

pub mod network;
pub mod packages;
pub mod profiler;
pub mod registry;
pub mod system;
pub mod weather;

pub use profiler::InventoryFields;

use crate::catalog::{DataType, ItemId};
use crate::config::WeatherSettings;
use crate::data::{Model, PublicIpInfo, SoftwareInfo, Weather};
use crate::error::Result;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Everything a run can ask of the host.
///
/// Implementations are shared by the fetch tasks, which run concurrently.
pub trait HostProbe: Send + Sync {
    /// One bulk inventory call for `data_types`, parsed for `items`
    fn inventory(&self, data_types: &BTreeSet<DataType>, items: &[ItemId]) -> Result<InventoryFields>;
    /// Name, sub-name and date of the model; `None` when the lookup failed
    fn model_name(&self) -> Option<Model>;
    fn software(&self) -> SoftwareInfo;
    fn terminal(&self) -> String;
    fn datetime(&self) -> String;
    fn public_ip(&self) -> Option<PublicIpInfo>;
    fn weather(&self) -> Option<Weather>;
}

/// The real host
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    weather: WeatherSettings,
}

impl SystemProbe {
    pub fn new(weather: WeatherSettings) -> Self {
        Self { weather }
    }
}

impl HostProbe for SystemProbe {
    fn inventory(&self, data_types: &BTreeSet<DataType>, items: &[ItemId]) -> Result<InventoryFields> {
        let output = profiler::run_system_profiler(data_types)
            .map_err(|err| crate::error::HostfetchError::BulkFetch(err.to_string()))?;
        profiler::parse_inventory(&output, items)
    }

    fn model_name(&self) -> Option<Model> {
        registry::collect_model_name()
    }

    fn software(&self) -> SoftwareInfo {
        packages::collect_software_info()
    }

    fn terminal(&self) -> String {
        system::get_terminal()
    }

    fn datetime(&self) -> String {
        system::get_datetime()
    }

    fn public_ip(&self) -> Option<PublicIpInfo> {
        network::fetch_public_ip()
            .map_err(|err| debug!(error = %err, "public ip unavailable"))
            .ok()
    }

    fn weather(&self) -> Option<Weather> {
        weather::fetch_weather(&self.weather)
            .map_err(|err| warn!(error = %err, "weather unavailable"))
            .ok()
    }
}
