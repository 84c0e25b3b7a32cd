//! Data structures shared by collectors, cache and display

pub mod hardware;
pub mod network;
pub mod snapshot;
pub mod system;

pub use hardware::{BatteryInfo, Cpu, DiskInfo, DisplayInfo, Memory, Model};
pub use network::{PublicIpInfo, Weather};
pub use snapshot::{CachedInfo, HostInfo};
pub use system::{OsInfo, SoftwareInfo, UserInfo};
