//! Persisted JSON caches
//!
//! Two files share this store: the long-lived record of stable hardware facts
//! and the short-lived weather record, whose freshness is judged from the
//! file's modification time.

use crate::error::CacheError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// How long a weather record stays fresh
pub const WEATHER_TTL: Duration = Duration::from_secs(15 * 60);

/// Read and decode a cache file
pub fn read_cache<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let metadata = fs::metadata(path)?;
    if metadata.len() == 0 {
        return Err(CacheError::Empty);
    }
    let data = fs::read(path)?;
    let value = serde_json::from_slice(&data)?;
    debug!(path = %path.display(), "cache read");
    Ok(value)
}

/// Encode and write a cache file, creating parent directories as needed.
///
/// The data goes to a sibling temp file first and is renamed over the target.
pub fn write_cache<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(value).map_err(io::Error::from)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &data)?;
    fs::rename(&temp_path, path)?;
    debug!(path = %path.display(), bytes = data.len(), "cache written");
    Ok(())
}

/// Whether the file is older than `ttl`. Missing files are stale.
pub fn is_stale(path: &Path, ttl: Duration) -> bool {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "cannot stat cache file, treating as stale");
            }
            return true;
        }
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age > ttl,
        // Modified in the future (clock skew): still fresh
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CachedInfo, Cpu, Memory, Model, Weather};
    use std::fs::File;
    use tempfile::TempDir;

    fn sample_record() -> CachedInfo {
        CachedInfo {
            model: Some(Model {
                name: "MacBook Pro".into(),
                sub_name: "16-inch".into(),
                date: "Nov 2024".into(),
                number: "ABC123".into(),
            }),
            cpu: Some(Cpu {
                model: "Apple M4 Max".into(),
                cores: 16,
                performance_cores: 12,
                efficiency_cores: 4,
            }),
            gpu_cores: Some(10),
            memory: Some(Memory {
                amount: 64,
                unit: "GB".into(),
                mem_type: "LPDDR5".into(),
            }),
            serial_number: Some("SERIAL".into()),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_cache::<CachedInfo>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CacheError::NotFound));
        assert!(err.is_missing());
    }

    #[test]
    fn empty_file_is_empty_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache-empty.json");
        fs::write(&path, b"").unwrap();

        let err = read_cache::<CachedInfo>(&path).unwrap_err();
        assert!(matches!(err, CacheError::Empty));
        assert!(err.is_missing());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, b"{\"cpu\": ").unwrap();

        let err = read_cache::<CachedInfo>(&path).unwrap_err();
        assert!(matches!(err, CacheError::Parse(_)));
        assert!(!err.is_missing());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("static.json");
        let expected = sample_record();

        write_cache(&path, &expected).unwrap();
        let actual: CachedInfo = read_cache(&path).unwrap();

        assert_eq!(actual, expected);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn weather_record_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.json");
        let expected = Weather {
            temperature: 12.5,
            feels_like: 10.0,
            temp_unit: "°C".into(),
            wind_speed: 14.0,
            wind_gusts: 30.0,
            wind_direction: 250,
            wind_unit: "km/h".into(),
            current_weather: "Overcast".into(),
            location_name: "Paris".into(),
            location_country_code: "FR".into(),
            latitude: 48.85,
            longitude: 2.35,
        };

        write_cache(&path, &expected).unwrap();
        assert_eq!(read_cache::<Weather>(&path).unwrap(), expected);
    }

    #[test]
    fn staleness_follows_modification_time() {
        let dir = TempDir::new().unwrap();

        let old = dir.path().join("old-weather.json");
        fs::write(&old, b"old").unwrap();
        let old_time = SystemTime::now() - 2 * WEATHER_TTL;
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(old_time)
            .unwrap();
        assert!(is_stale(&old, WEATHER_TTL));

        let new = dir.path().join("new-weather.json");
        fs::write(&new, b"new").unwrap();
        assert!(!is_stale(&new, WEATHER_TTL));

        assert!(is_stale(&dir.path().join("absent.json"), WEATHER_TTL));
    }
}
