//! Command line arguments

use crate::config::Config;
use crate::utils::file::expand_tilde;
use clap::Parser;
use std::path::PathBuf;

pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (commit ", env!("HOSTFETCH_GIT_COMMIT"), ")");

/// Display information about the host system.
///
/// Command line values override the configuration file.
#[derive(Parser, Debug, Default)]
#[command(name = "hostfetch", version = VERSION, disable_version_flag = true)]
pub struct Cli {
    /// Path to the configuration file (default: <config dir>/hostfetch/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print information as JSON instead of plain text
    #[arg(short, long)]
    pub json: bool,

    /// List every available item and exit
    #[arg(short, long)]
    pub items: bool,

    /// Print the version and exit
    #[arg(short, long)]
    pub version: bool,

    /// Use the cache files
    #[arg(short, long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub cache: Option<bool>,

    /// Refetch everything and rewrite the cache files
    #[arg(short, long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub refresh: Option<bool>,

    /// Show the logo next to the information
    #[arg(short, long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub display_logo: Option<bool>,

    /// Path to a logo file
    #[arg(short, long, value_name = "PATH")]
    pub logo: Option<String>,
}

impl Cli {
    pub fn force_refresh(&self) -> bool {
        self.refresh.unwrap_or(false)
    }

    /// Apply explicitly given flags on top of the file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(cache) = self.cache {
            config.cache = cache;
        }
        if let Some(display_logo) = self.display_logo {
            config.display_logo = display_logo;
        }
        if let Some(logo) = &self.logo {
            config.logo_file = Some(expand_tilde(logo));
        }
    }
}
