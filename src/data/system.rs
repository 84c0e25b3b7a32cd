//! Operating system, session and software structures

use serde::{Deserialize, Serialize};

/// User and session information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub real_name: String,
    pub login: String,
}

/// Operating system related information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub system: String,
    pub system_version: String,
    pub system_build: String,
    pub system_version_code_name: String,
    pub kernel_type: String,
    pub kernel_version: String,
}

/// Installed software counts.
///
/// `-1` means the count could not be obtained (directory unreadable, brew
/// missing or its listing failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareInfo {
    pub num_apps: i64,
    #[serde(rename = "num_homebrew_formulae")]
    pub num_brew_formulae: i64,
    #[serde(rename = "num_homebrew_casks")]
    pub num_brew_casks: i64,
}

impl Default for SoftwareInfo {
    fn default() -> Self {
        Self {
            num_apps: -1,
            num_brew_formulae: -1,
            num_brew_casks: -1,
        }
    }
}
