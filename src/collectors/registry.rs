//! Marketing model name from the I/O registry

use crate::data::Model;
use crate::error::{HostfetchError, Result};
use crate::utils::command::run_command_timeout;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const IOREG: &str = "/usr/sbin/ioreg";
const IOREG_TIMEOUT: Duration = Duration::from_secs(3);

/// Name, sub-name and date of the machine, e.g. "MacBook Pro (16-inch, Nov 2024)".
///
/// The model number is left empty: it comes from the hardware inventory.
/// `None` when ioreg fails, times out or reports an unexpected name.
pub fn collect_model_name() -> Option<Model> {
    run_command_timeout(IOREG, &["-arc", "IOPlatformDevice", "-k", "product-name"], IOREG_TIMEOUT)
        .and_then(|plist| parse_product_name(&plist))
        .map_err(|err| debug!(error = %err, "model name unavailable"))
        .ok()
}

/// Extract and decode the `product-name` data blob of an ioreg plist
pub fn parse_product_name(plist: &str) -> Result<Model> {
    static BLOB: OnceLock<Regex> = OnceLock::new();
    static NAME: OnceLock<Regex> = OnceLock::new();

    let blob_re = BLOB.get_or_init(|| {
        Regex::new(r"<key>product-name</key>\s*<data>([^<]*)</data>").expect("blob pattern is valid")
    });
    let blob: String = blob_re
        .captures(plist)
        .ok_or_else(|| HostfetchError::Parse("no product-name in ioreg output".to_string()))?[1]
        .split_whitespace()
        .collect();

    let bytes = STANDARD
        .decode(blob)
        .map_err(|err| HostfetchError::Parse(format!("product-name is not base64: {}", err)))?;
    let decoded = String::from_utf8_lossy(&bytes);
    let name = decoded.trim_end_matches('\0');

    let name_re = NAME.get_or_init(|| Regex::new(r"^([\w\s]+)\s\(([^,]+),\s([^)]+)\)$").expect("name pattern is valid"));
    let caps = name_re
        .captures(name)
        .ok_or_else(|| HostfetchError::Parse(format!("unexpected product name '{}'", name)))?;
    Ok(Model {
        name: caps[1].to_string(),
        sub_name: caps[2].to_string(),
        date: caps[3].to_string(),
        number: String::new(),
    })
}
