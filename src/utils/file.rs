//! File and path utilities

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Count the directories directly under `path`
pub fn count_dirs<P: AsRef<Path>>(path: P) -> io::Result<usize> {
    Ok(fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map_or(false, |ft| ft.is_dir()))
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn counts_only_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Safari.app")).unwrap();
        fs::create_dir(dir.path().join("Xcode.app")).unwrap();
        fs::write(dir.path().join(".localized"), b"").unwrap();

        assert_eq!(count_dirs(dir.path()).unwrap(), 2);
        assert!(count_dirs(dir.path().join("missing")).is_err());
    }

    #[test]
    fn expands_home() {
        let expanded = expand_tilde("~/.cache/hostfetch/static.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with(".cache/hostfetch/static.json"));
        assert_eq!(expand_tilde("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }
}
