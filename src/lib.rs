//! hostfetch library
//!
//! Fetches host information through a cache-aware plan: items sharing one
//! external call are fetched together, stable hardware facts are cached on
//! disk, and every fetch of a run happens in parallel.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod logging;
pub mod merge;
pub mod planner;
pub mod utils;

pub use catalog::{ItemId, RequestedItems};
pub use collectors::{HostProbe, SystemProbe};
pub use data::{CachedInfo, HostInfo};
pub use error::{HostfetchError, Result};
pub use fetch::{collect, Collected, FetchContext};
