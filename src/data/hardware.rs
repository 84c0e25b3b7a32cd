//! Hardware-specific information structures

use serde::{Deserialize, Serialize};

/// Marketing model of the machine, e.g. "MacBook Pro (16-inch, Nov 2024) Z1FE".
///
/// `name`, `sub_name` and `date` come from the device registry, `number`
/// from the hardware inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sub_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub number: String,
}

/// CPU information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub model: String,
    #[serde(default)]
    pub cores: u32,
    #[serde(default)]
    pub performance_cores: u32,
    #[serde(default)]
    pub efficiency_cores: u32,
}

/// Installed memory, e.g. 36 GB LPDDR5
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub amount: u32,
    pub unit: String,
    #[serde(rename = "type")]
    pub mem_type: String,
}

/// One attached screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub pixels_width: u32,
    pub pixels_height: u32,
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub refresh_rate_hz: f64,
}

/// Disk usage of the root volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub total_tb: f64,
    pub free_tb: f64,
    pub smart_status: String,
}

/// Battery charge and health
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub status_percent: u32,
    pub charging: bool,
    pub capacity_percent: u32,
    pub health: String,
}
