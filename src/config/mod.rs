//! Configuration and persisted preferences.
//!
//! Configuration is read from `~/.config/temblor/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. The two preferences the UI changes at runtime (`source` and
//! `magnitude_range`) are written back on change.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::domain::{Coordinate, MagnitudeRange, Source};

/// Main configuration struct.
///
/// The persisted preference keys are kept as strings so that an invalid
/// value falls back to its documented default (`"USGS"`, `"all"`) without
/// discarding the rest of the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: String,
    pub magnitude_range: String,
    pub quiet: bool,
    pub poll_interval_secs: u64,
    pub location: Option<LocationConfig>,
    pub alert: AlertConfig,
}

/// Explicit coordinates, overriding the startup geolocation lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub lat: f64,
    pub lon: f64,
}

impl From<LocationConfig> for Coordinate {
    fn from(l: LocationConfig) -> Self {
        Coordinate::new(l.lat, l.lon)
    }
}

/// Alert thresholds; events at or above `magnitude` within `distance_km`
/// of the user are significant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub magnitude: f64,
    pub distance_km: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            magnitude: 4.0,
            distance_km: 50.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: Source::default().to_string(),
            magnitude_range: MagnitudeRange::default().to_string(),
            quiet: false,
            poll_interval_secs: 300,
            location: None,
            alert: AlertConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &PathBuf) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(config)
    }

    /// Write the current configuration back to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(config_path, content).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })
    }

    /// The active data source; an unrecognized persisted value falls back
    /// to the default with a warning.
    pub fn source(&self) -> Source {
        Source::parse(&self.source).unwrap_or_else(|| {
            tracing::warn!(value = %self.source, "invalid source in config, using default");
            Source::default()
        })
    }

    pub fn set_source(&mut self, source: Source) {
        self.source = source.to_string();
    }

    /// The display magnitude filter; an unrecognized persisted value falls
    /// back to `all` with a warning.
    pub fn magnitude_range(&self) -> MagnitudeRange {
        MagnitudeRange::parse(&self.magnitude_range).unwrap_or_else(|| {
            tracing::warn!(value = %self.magnitude_range, "invalid magnitude_range in config, using default");
            MagnitudeRange::default()
        })
    }

    pub fn set_magnitude_range(&mut self, range: MagnitudeRange) {
        self.magnitude_range = range.to_string();
    }

    /// Get the default config file path: `~/.config/temblor/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("temblor").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Temblor Configuration
#
# source: which seismic data feed to poll (USGS, Kandilli, EMSC)
# magnitude_range: display filter for the event list (0-2, 2-4, 4-6, 6+, all)
# Both are rewritten by the TUI when you change them with the
# source-switcher or filter keys.

source = "USGS"
magnitude_range = "all"

# Suppress the audible alarm (notifications are still raised)
quiet = false

# Seconds between poll cycles
poll_interval_secs = 300

# Alert thresholds: an event is significant when its magnitude is at
# least `magnitude` and its epicenter is within `distance_km` of you.
[alert]
magnitude = 4.0
distance_km = 50.0

# Uncomment to pin your coordinates instead of the startup IP lookup.
# [location]
# lat = 39.9334
# lon = 32.8597
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.source(), Source::Usgs);
        assert_eq!(config.magnitude_range(), MagnitudeRange::All);
        assert_eq!(config.poll_interval_secs, 300);
        assert_eq!(config.alert.magnitude, 4.0);
        assert_eq!(config.alert.distance_km, 50.0);
        assert!(config.location.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
source = "EMSC"

[alert]
magnitude = 5.0
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.source(), Source::Emsc);
        // Defaults fill the gaps
        assert_eq!(config.magnitude_range(), MagnitudeRange::All);
        assert_eq!(config.alert.magnitude, 5.0);
        assert_eq!(config.alert.distance_km, 50.0);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.source(), Source::Usgs);
        assert_eq!(config.magnitude_range(), MagnitudeRange::All);
    }

    #[test]
    fn test_invalid_preference_values_fall_back() {
        let content = r##"
source = "AFAD"
magnitude_range = "7-9"
"##;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.source(), Source::Usgs);
        assert_eq!(config.magnitude_range(), MagnitudeRange::All);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_source(Source::Kandilli);
        config.set_magnitude_range(MagnitudeRange::R4to6);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.source(), Source::Kandilli);
        assert_eq!(loaded.magnitude_range(), MagnitudeRange::R4to6);
    }

    #[test]
    fn test_load_from_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.source(), Source::Usgs);
        assert!(path.exists(), "default config file should be created");
    }

    #[test]
    fn test_location_override_parses() {
        let content = r##"
[location]
lat = 38.42
lon = 27.14
"##;
        let config: Config = toml::from_str(content).unwrap();
        let coord: Coordinate = config.location.unwrap().into();
        assert_eq!(coord.lat, 38.42);
        assert_eq!(coord.lon, 27.14);
    }
}
