//! Installed software counts (parallelized for speed)

use crate::data::SoftwareInfo;
use crate::utils::command::{run_command_timeout, which};
use crate::utils::file::count_dirs;
use crate::utils::parsing::count_non_empty_lines;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const APPLICATIONS_DIR: &str = "/Applications";
const BREW_TIMEOUT: Duration = Duration::from_secs(5);

/// Collect application and Homebrew counts; `-1` marks an unavailable count
pub fn collect_software_info() -> SoftwareInfo {
    // Count applications and query brew in parallel
    let (num_apps, (num_brew_formulae, num_brew_casks)) = rayon::join(
        || count_applications(Path::new(APPLICATIONS_DIR)),
        get_brew_counts,
    );

    SoftwareInfo {
        num_apps,
        num_brew_formulae,
        num_brew_casks,
    }
}

/// Number of directories in the applications folder, `-1` if unreadable
pub fn count_applications(dir: &Path) -> i64 {
    match count_dirs(dir) {
        Ok(count) => count as i64,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "cannot read applications directory");
            -1
        }
    }
}

fn get_brew_counts() -> (i64, i64) {
    let Some(brew) = which("brew") else {
        return (-1, -1);
    };
    let brew = brew.to_string_lossy().into_owned();
    let list = |kind: &str| {
        run_command_timeout(&brew, &["list", "-1", kind], BREW_TIMEOUT)
            .map(|output| count_non_empty_lines(&output))
    };

    // A failed formulae listing leaves both counts unknown
    match list("--formulae") {
        Ok(formulae) => (formulae, list("--casks").unwrap_or(-1)),
        Err(err) => {
            debug!(error = %err, "brew listing failed");
            (-1, -1)
        }
    }
}
