//! Hardware inventory via `system_profiler`
//!
//! One invocation returns every requested section as JSON. Parsing turns the
//! sections into the fields of the items that were asked for; a requested item
//! whose section is missing fails the whole call.

use crate::catalog::{DataType, ItemId};
use crate::data::{BatteryInfo, Cpu, DiskInfo, DisplayInfo, Memory, OsInfo, UserInfo};
use crate::error::{HostfetchError, Result};
use crate::utils::command::run_command_timeout;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::time::Duration;

const SYSTEM_PROFILER: &str = "/usr/sbin/system_profiler";
const PROFILER_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `system_profiler` once for the given sections and return raw JSON
pub fn run_system_profiler(data_types: &BTreeSet<DataType>) -> Result<String> {
    let mut args = vec!["-json", "-detailLevel", "basic"];
    args.extend(data_types.iter().map(|data_type| data_type.tag()));
    run_command_timeout(SYSTEM_PROFILER, &args, PROFILER_TIMEOUT)
}

/// Fields produced by one inventory call.
///
/// Only the model number comes from here; the rest of the model lives in the
/// device registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFields {
    pub model_number: Option<String>,
    pub cpu: Option<Cpu>,
    pub gpu_cores: Option<u32>,
    pub memory: Option<Memory>,
    pub serial_number: Option<String>,
    pub user: Option<UserInfo>,
    pub hostname: Option<String>,
    pub os: Option<OsInfo>,
    pub system_integrity: Option<String>,
    pub uptime: Option<String>,
    pub disk: Option<DiskInfo>,
    pub battery: Option<BatteryInfo>,
    pub displays: Option<Vec<DisplayInfo>>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfilerReport {
    #[serde(rename = "SPSoftwareDataType", default)]
    software: Vec<SpSoftware>,
    #[serde(rename = "SPHardwareDataType", default)]
    hardware: Vec<SpHardware>,
    #[serde(rename = "SPMemoryDataType", default)]
    memory: Vec<Value>,
    #[serde(rename = "SPDisplaysDataType", default)]
    displays: Vec<SpDisplayAdapter>,
    #[serde(rename = "SPPowerDataType", default)]
    power: Vec<SpPower>,
    #[serde(rename = "SPStorageDataType", default)]
    storage: Vec<SpStorage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpSoftware {
    user_name: String,
    local_host_name: String,
    os_version: String,
    uptime: String,
    kernel_version: String,
    system_integrity: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpHardware {
    model_number: String,
    // Apple Silicon reports chip_type, Intel reports cpu_type
    chip_type: Option<String>,
    cpu_type: Option<String>,
    // "proc 14:10:4" on Apple Silicon, an integer on Intel
    number_processors: Value,
    serial_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpDisplayAdapter {
    sppci_cores: String,
    spdisplays_ndrvs: Vec<SpScreen>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpScreen {
    #[serde(rename = "_spdisplays_pixels")]
    pixels: String,
    #[serde(rename = "_spdisplays_resolution")]
    resolution: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpPower {
    sppower_battery_charge_info: SpChargeInfo,
    sppower_battery_health_info: SpHealthInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpChargeInfo {
    sppower_battery_state_of_charge: u32,
    sppower_battery_is_charging: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpHealthInfo {
    sppower_battery_health_maximum_capacity: String,
    sppower_battery_health: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpStorage {
    free_space_in_bytes: u64,
    size_in_bytes: u64,
    mount_point: String,
    physical_drive: SpPhysicalDrive,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpPhysicalDrive {
    smart_status: String,
}

fn missing(section: &str) -> HostfetchError {
    HostfetchError::BulkFetch(format!("system_profiler returned no {} information", section))
}

/// Parse raw inventory JSON for the given items
pub fn parse_inventory(output: &str, items: &[ItemId]) -> Result<InventoryFields> {
    let report: ProfilerReport = serde_json::from_str(output)
        .map_err(|err| HostfetchError::BulkFetch(format!("invalid system_profiler output: {}", err)))?;
    let mut fields = InventoryFields::default();

    for item in items {
        match item {
            ItemId::Model => {
                let hardware = report.hardware.first().ok_or_else(|| missing("hardware"))?;
                fields.model_number = Some(hardware.model_number.clone());
            }
            ItemId::Cpu => {
                let hardware = report.hardware.first().ok_or_else(|| missing("hardware"))?;
                fields.cpu = Some(parse_cpu(hardware));
            }
            ItemId::SerialNumber => {
                let hardware = report.hardware.first().ok_or_else(|| missing("hardware"))?;
                fields.serial_number = Some(hardware.serial_number.clone());
            }
            ItemId::Gpu => {
                let adapter = report.displays.first().ok_or_else(|| missing("display"))?;
                fields.gpu_cores = Some(adapter.sppci_cores.trim().parse().unwrap_or(0));
            }
            ItemId::Memory => {
                if report.memory.is_empty() {
                    return Err(missing("memory"));
                }
                fields.memory = Some(parse_memory(&report.memory));
            }
            ItemId::User => {
                let software = report.software.first().ok_or_else(|| missing("software"))?;
                fields.user = Some(parse_user(&software.user_name));
            }
            ItemId::Hostname => {
                let software = report.software.first().ok_or_else(|| missing("software"))?;
                fields.hostname = Some(software.local_host_name.clone());
            }
            ItemId::Os => {
                let software = report.software.first().ok_or_else(|| missing("software"))?;
                fields.os = Some(parse_os(&software.os_version, &software.kernel_version));
            }
            ItemId::SystemIntegrity => {
                let software = report.software.first().ok_or_else(|| missing("software"))?;
                fields.system_integrity = Some(software.system_integrity.clone());
            }
            ItemId::Uptime => {
                let software = report.software.first().ok_or_else(|| missing("software"))?;
                fields.uptime = Some(parse_uptime(&software.uptime));
            }
            ItemId::Disk => {
                if report.storage.is_empty() {
                    return Err(missing("storage"));
                }
                fields.disk = Some(parse_disk(&report.storage));
            }
            ItemId::Battery => {
                let power = report.power.first().ok_or_else(|| missing("power"))?;
                fields.battery = Some(parse_battery(power));
            }
            ItemId::Display => {
                // The displays section is sometimes empty for no reason; not fatal
                fields.displays = Some(
                    report
                        .displays
                        .first()
                        .map(|adapter| adapter.spdisplays_ndrvs.iter().map(parse_screen).collect())
                        .unwrap_or_default(),
                );
            }
            _ => {}
        }
    }

    Ok(fields)
}

fn parse_cpu(hardware: &SpHardware) -> Cpu {
    let model = hardware
        .chip_type
        .clone()
        .or_else(|| hardware.cpu_type.clone())
        .unwrap_or_default();
    let mut cpu = Cpu {
        model,
        ..Cpu::default()
    };
    match &hardware.number_processors {
        Value::String(summary) => {
            let counts: Vec<u32> = summary
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .split(':')
                .map(|n| n.parse().unwrap_or(0))
                .collect();
            cpu.cores = counts.first().copied().unwrap_or(0);
            cpu.performance_cores = counts.get(1).copied().unwrap_or(0);
            cpu.efficiency_cores = counts.get(2).copied().unwrap_or(0);
        }
        Value::Number(n) => cpu.cores = n.as_u64().unwrap_or(0) as u32,
        _ => {}
    }
    cpu
}

/// "16 GB" -> (16, "GB")
fn split_amount(size: &str) -> (u32, String) {
    let mut parts = size.split_whitespace();
    let amount = parts.next().and_then(|n| n.parse().ok()).unwrap_or(0);
    let unit = parts.next().unwrap_or_default().to_string();
    (amount, unit)
}

fn parse_memory(entries: &[Value]) -> Memory {
    let mut memory = Memory::default();
    for entry in entries {
        // Apple Silicon: unified memory described in a single entry
        if let Some(size) = entry.get("SPMemoryDataType").and_then(Value::as_str) {
            let (amount, unit) = split_amount(size);
            memory.amount = amount;
            memory.unit = unit;
            memory.mem_type = entry
                .get("dimm_type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            continue;
        }
        // Intel: one item per DIMM, summed
        let dimms = entry
            .get("_items")
            .or_else(|| entry.get("Items"))
            .and_then(Value::as_array);
        for dimm in dimms.into_iter().flatten() {
            let (amount, unit) = split_amount(dimm.get("dimm_size").and_then(Value::as_str).unwrap_or_default());
            memory.amount += amount;
            if memory.unit.is_empty() {
                memory.unit = unit;
                memory.mem_type = dimm
                    .get("dimm_type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
            }
        }
    }
    memory
}

fn parse_user(user_name: &str) -> UserInfo {
    static USER: OnceLock<Regex> = OnceLock::new();
    let re = USER.get_or_init(|| Regex::new(r"^([\w\s]+)\s\((\w+)\)$").expect("user pattern is valid"));
    match re.captures(user_name) {
        Some(caps) => UserInfo {
            real_name: caps[1].to_string(),
            login: caps[2].to_string(),
        },
        None => UserInfo::default(),
    }
}

fn os_code_name(major: &str) -> &'static str {
    match major {
        "13" => "Ventura",
        "14" => "Sonoma",
        "15" => "Sequoia",
        "26" => "Tahoe",
        _ => "(Unknown)",
    }
}

fn parse_os(os_version: &str, kernel: &str) -> OsInfo {
    let mut os = OsInfo::default();
    static OS: OnceLock<Regex> = OnceLock::new();
    let re = OS.get_or_init(|| Regex::new(r"^(\w+)\s([\d.]+)\s\(([^)]+)\)$").expect("os pattern is valid"));
    if let Some(caps) = re.captures(os_version) {
        os.system = caps[1].to_string();
        os.system_version = caps[2].to_string();
        os.system_build = caps[3].to_string();
    }
    let mut kernel_parts = kernel.split_whitespace();
    os.kernel_type = kernel_parts.next().unwrap_or_default().to_string();
    os.kernel_version = kernel_parts.next().unwrap_or_default().to_string();
    let major = os.system_version.split('.').next().unwrap_or_default();
    os.system_version_code_name = os_code_name(major).to_string();
    os
}

/// "up 3:04:05:06" -> "3 days, 04 hours"
fn parse_uptime(uptime: &str) -> String {
    let fields: Vec<&str> = uptime
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .split(':')
        .collect();
    match fields.as_slice() {
        [days, hours, ..] => format!("{} days, {} hours", days, hours),
        _ => uptime.to_string(),
    }
}

fn parse_disk(volumes: &[SpStorage]) -> DiskInfo {
    const TB: f64 = 1_000_000_000_000.0;
    volumes
        .iter()
        .find(|volume| volume.mount_point == "/")
        .map(|root| DiskInfo {
            total_tb: root.size_in_bytes as f64 / TB,
            free_tb: root.free_space_in_bytes as f64 / TB,
            smart_status: root.physical_drive.smart_status.clone(),
        })
        .unwrap_or_default()
}

fn parse_battery(power: &SpPower) -> BatteryInfo {
    let charge = &power.sppower_battery_charge_info;
    let health = &power.sppower_battery_health_info;
    BatteryInfo {
        status_percent: charge.sppower_battery_state_of_charge,
        charging: charge.sppower_battery_is_charging != "FALSE",
        capacity_percent: health
            .sppower_battery_health_maximum_capacity
            .trim_end_matches('%')
            .parse()
            .unwrap_or(0),
        health: health.sppower_battery_health.clone(),
    }
}

fn parse_screen(screen: &SpScreen) -> DisplayInfo {
    let mut display = DisplayInfo::default();
    let mut pixels = screen.pixels.split(" x ");
    display.pixels_width = pixels.next().and_then(|n| n.trim().parse().ok()).unwrap_or(0);
    display.pixels_height = pixels.next().and_then(|n| n.trim().parse().ok()).unwrap_or(0);

    static RESOLUTION: OnceLock<Regex> = OnceLock::new();
    let re = RESOLUTION
        .get_or_init(|| Regex::new(r"^(\d+)\s*x\s*(\d+)\s*@\s*([\d.]+)Hz$").expect("resolution pattern is valid"));
    if let Some(caps) = re.captures(&screen.resolution) {
        display.resolution_width = caps[1].parse().unwrap_or(0);
        display.resolution_height = caps[2].parse().unwrap_or(0);
        display.refresh_rate_hz = caps[3].parse().unwrap_or(0.0);
    }
    display
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLE_SILICON: &str = r#"{
      "SPHardwareDataType": [{
        "_name": "hardware_overview",
        "chip_type": "Apple M4 Max",
        "machine_model": "Mac16,5",
        "machine_name": "MacBook Pro",
        "model_number": "Z1FE0003PFN/A",
        "number_processors": "proc 16:12:4",
        "serial_number": "C02XYZ"
      }],
      "SPDisplaysDataType": [{
        "_name": "Apple M4 Max",
        "sppci_cores": "40",
        "spdisplays_ndrvs": [
          {"_name": "Color LCD", "_spdisplays_pixels": "3456 x 2234", "_spdisplays_resolution": "1728 x 1117 @ 120.00Hz"},
          {"_name": "LG", "_spdisplays_pixels": "3840 x 2160", "_spdisplays_resolution": "1920 x 1080 @ 60.00Hz"}
        ]
      }],
      "SPMemoryDataType": [{"SPMemoryDataType": "64 GB", "dimm_manufacturer": "Hynix", "dimm_type": "LPDDR5"}],
      "SPSoftwareDataType": [{
        "kernel_version": "Darwin 24.2.0",
        "local_host_name": "studio",
        "os_version": "macOS 15.2 (24C101)",
        "system_integrity": "integrity_enabled",
        "uptime": "up 3:04:05:06",
        "user_name": "Jane Appleseed (jane)"
      }],
      "SPPowerDataType": [{
        "sppower_battery_charge_info": {"sppower_battery_state_of_charge": 87, "sppower_battery_is_charging": "FALSE"},
        "sppower_battery_health_info": {"sppower_battery_health_maximum_capacity": "96%", "sppower_battery_health": "Good"}
      }],
      "SPStorageDataType": [
        {"_name": "Data", "mount_point": "/System/Volumes/Data", "size_in_bytes": 1, "free_space_in_bytes": 1},
        {"_name": "Macintosh HD", "mount_point": "/", "size_in_bytes": 2000000000000, "free_space_in_bytes": 500000000000, "physical_drive": {"smart_status": "Verified"}}
      ]
    }"#;

    #[test]
    fn parses_apple_silicon_hardware() {
        let fields = parse_inventory(
            APPLE_SILICON,
            &[ItemId::Cpu, ItemId::Model, ItemId::SerialNumber, ItemId::Gpu, ItemId::Memory],
        )
        .unwrap();

        let cpu = fields.cpu.unwrap();
        assert_eq!(cpu.model, "Apple M4 Max");
        assert_eq!((cpu.cores, cpu.performance_cores, cpu.efficiency_cores), (16, 12, 4));
        assert_eq!(fields.model_number.as_deref(), Some("Z1FE0003PFN/A"));
        assert_eq!(fields.serial_number.as_deref(), Some("C02XYZ"));
        assert_eq!(fields.gpu_cores, Some(40));
        assert_eq!(
            fields.memory,
            Some(Memory {
                amount: 64,
                unit: "GB".into(),
                mem_type: "LPDDR5".into()
            })
        );
    }

    #[test]
    fn parses_software_section() {
        let fields = parse_inventory(
            APPLE_SILICON,
            &[ItemId::User, ItemId::Hostname, ItemId::Os, ItemId::SystemIntegrity, ItemId::Uptime],
        )
        .unwrap();

        let user = fields.user.unwrap();
        assert_eq!(user.real_name, "Jane Appleseed");
        assert_eq!(user.login, "jane");
        assert_eq!(fields.hostname.as_deref(), Some("studio"));
        let os = fields.os.unwrap();
        assert_eq!(os.system, "macOS");
        assert_eq!(os.system_version, "15.2");
        assert_eq!(os.system_build, "24C101");
        assert_eq!(os.system_version_code_name, "Sequoia");
        assert_eq!(os.kernel_type, "Darwin");
        assert_eq!(os.kernel_version, "24.2.0");
        assert_eq!(fields.system_integrity.as_deref(), Some("integrity_enabled"));
        assert_eq!(fields.uptime.as_deref(), Some("3 days, 04 hours"));
    }

    #[test]
    fn parses_power_storage_and_displays() {
        let fields = parse_inventory(APPLE_SILICON, &[ItemId::Battery, ItemId::Disk, ItemId::Display]).unwrap();

        let battery = fields.battery.unwrap();
        assert_eq!(battery.status_percent, 87);
        assert!(!battery.charging);
        assert_eq!(battery.capacity_percent, 96);
        assert_eq!(battery.health, "Good");

        let disk = fields.disk.unwrap();
        assert!((disk.total_tb - 2.0).abs() < 1e-9);
        assert!((disk.free_tb - 0.5).abs() < 1e-9);
        assert_eq!(disk.smart_status, "Verified");

        let displays = fields.displays.unwrap();
        assert_eq!(displays.len(), 2);
        assert_eq!((displays[0].pixels_width, displays[0].pixels_height), (3456, 2234));
        assert_eq!((displays[0].resolution_width, displays[0].resolution_height), (1728, 1117));
        assert!((displays[0].refresh_rate_hz - 120.0).abs() < 1e-9);
        assert_eq!((displays[1].resolution_width, displays[1].resolution_height), (1920, 1080));
        assert!((displays[1].refresh_rate_hz - 60.0).abs() < 1e-9);
    }

    #[test]
    fn only_requested_items_are_filled() {
        let fields = parse_inventory(APPLE_SILICON, &[ItemId::Cpu]).unwrap();
        assert!(fields.cpu.is_some());
        assert!(fields.serial_number.is_none());
        assert!(fields.model_number.is_none());
        assert!(fields.user.is_none());
    }

    #[test]
    fn intel_layout_is_supported() {
        let output = r#"{
          "SPHardwareDataType": [{"cpu_type": "6-Core Intel Core i7", "number_processors": 6, "serial_number": "X"}],
          "SPMemoryDataType": [{"_items": [
            {"dimm_size": "8 GB", "dimm_type": "DDR4"},
            {"dimm_size": "8 GB", "dimm_type": "DDR4"}
          ]}]
        }"#;
        let fields = parse_inventory(output, &[ItemId::Cpu, ItemId::Memory]).unwrap();

        let cpu = fields.cpu.unwrap();
        assert_eq!(cpu.model, "6-Core Intel Core i7");
        assert_eq!(cpu.cores, 6);
        assert_eq!(
            fields.memory,
            Some(Memory {
                amount: 16,
                unit: "GB".into(),
                mem_type: "DDR4".into()
            })
        );
    }

    #[test]
    fn missing_section_for_requested_item_is_fatal() {
        let err = parse_inventory(r#"{"SPSoftwareDataType": []}"#, &[ItemId::Hostname]).unwrap_err();
        assert!(matches!(err, HostfetchError::BulkFetch(ref msg) if msg.contains("software")));

        let err = parse_inventory("{}", &[ItemId::Battery]).unwrap_err();
        assert!(matches!(err, HostfetchError::BulkFetch(_)));
    }

    #[test]
    fn empty_displays_section_is_tolerated() {
        let fields = parse_inventory("{}", &[ItemId::Display]).unwrap();
        assert_eq!(fields.displays, Some(vec![]));
    }

    #[test]
    fn garbage_output_is_a_bulk_error() {
        assert!(matches!(
            parse_inventory("not json", &[ItemId::Cpu]),
            Err(HostfetchError::BulkFetch(_))
        ));
    }

    #[test]
    fn unknown_os_major_version() {
        let os = parse_os("macOS 11.7 (20G817)", "Darwin 20.6.0");
        assert_eq!(os.system_version_code_name, "(Unknown)");
    }
}
