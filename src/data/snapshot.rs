//! The snapshot aggregate and its cacheable subset

use super::hardware::{BatteryInfo, Cpu, DiskInfo, DisplayInfo, Memory, Model};
use super::network::{PublicIpInfo, Weather};
use super::system::{OsInfo, SoftwareInfo, UserInfo};
use crate::catalog::{self, ItemId, RequestedItems};
use serde::{Deserialize, Serialize};

/// Facts that are unlikely to change and are persisted in the long-lived cache.
///
/// Absent fields are simply not cached yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Cpu>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Memory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl CachedInfo {
    /// Whether the field backing a cacheable item is present
    pub fn has(&self, id: ItemId) -> bool {
        match id {
            ItemId::Model => self.model.is_some(),
            ItemId::Cpu => self.cpu.is_some(),
            ItemId::Gpu => self.gpu_cores.is_some(),
            ItemId::Memory => self.memory.is_some(),
            ItemId::SerialNumber => self.serial_number.is_some(),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == CachedInfo::default()
    }

    fn clear(&mut self, id: ItemId) {
        match id {
            ItemId::Model => self.model = None,
            ItemId::Cpu => self.cpu = None,
            ItemId::Gpu => self.gpu_cores = None,
            ItemId::Memory => self.memory = None,
            ItemId::SerialNumber => self.serial_number = None,
            _ => {}
        }
    }
}

/// Everything fetched or cached during one run.
///
/// Every field is optional so that structured output only contains what was
/// obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    #[serde(flatten)]
    pub cached: CachedInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_integrity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displays: Option<Vec<DisplayInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<SoftwareInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<PublicIpInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
}

impl HostInfo {
    /// Start a snapshot from a long-lived cache record
    pub fn from_cache(cached: CachedInfo) -> Self {
        Self {
            cached,
            ..Self::default()
        }
    }

    /// Drop the field(s) backing `id`
    pub fn clear(&mut self, id: ItemId) {
        match id {
            ItemId::User => self.user = None,
            ItemId::Hostname => self.hostname = None,
            ItemId::Os => self.os = None,
            ItemId::SystemIntegrity => self.system_integrity = None,
            ItemId::Disk => self.disk = None,
            ItemId::Battery => self.battery = None,
            ItemId::Display => self.displays = None,
            ItemId::Terminal => self.terminal = None,
            ItemId::Software => self.software = None,
            ItemId::PublicIp => self.public_ip = None,
            ItemId::Uptime => self.uptime = None,
            ItemId::Datetime => self.datetime = None,
            ItemId::Weather => self.weather = None,
            ItemId::SerialNumber
            | ItemId::Model
            | ItemId::Cpu
            | ItemId::Gpu
            | ItemId::Memory => self.cached.clear(id),
        }
    }

    /// Copy restricted to requested items, used for structured output so
    /// that cached-but-unrequested facts never leak.
    pub fn pruned(&self, requested: &RequestedItems) -> HostInfo {
        let mut pruned = self.clone();
        for item in catalog::all() {
            if !requested.contains(item.id) {
                pruned.clear(item.id);
            }
        }
        pruned
    }

    /// The subset eligible for the long-lived cache
    pub fn cacheable_subset(&self) -> CachedInfo {
        self.cached.clone()
    }
}
