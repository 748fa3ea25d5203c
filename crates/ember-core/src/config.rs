// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The runtime key-value configuration store.
//!
//! Keys are dotted strings such as `input.keyboard.w` and values are plain
//! strings. The store is persisted as a RON map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// An error raised while reading or writing the settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read or written.
    Io {
        /// The path of the settings file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not a valid RON string map.
    Parse {
        /// The path of the settings file.
        path: PathBuf,
        /// Details from the RON parser.
        details: String,
    },
    /// The configuration could not be serialized.
    Serialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "I/O error on settings file '{}': {source}", path.display())
            }
            ConfigError::Parse { path, details } => {
                write!(f, "Malformed settings file '{}': {details}", path.display())
            }
            ConfigError::Serialize(details) => {
                write!(f, "Failed to serialize settings: {details}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// String-to-string configuration with typed lookups and defaults.
///
/// Lookups never insert: an unbound key simply yields the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from a RON file.
    ///
    /// A missing file is not an error and yields an empty configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No settings file at '{}', using defaults.",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Config = ron::de::from_bytes(&bytes).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        log::info!(
            "Loaded {} settings from '{}'.",
            config.values.len(),
            path.display()
        );
        Ok(config)
    }

    /// Writes the configuration to a RON file, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        let text = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved settings to '{}'.", path.display());
        Ok(())
    }

    /// Returns the value bound to `key`, or `default` when unbound.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Returns the value bound to `key` parsed as a float, or `default` when
    /// unbound or unparsable.
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.values
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Returns the value bound to `key` as a boolean. Accepts `true/false`,
    /// `1/0`, `yes/no` and `on/off`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
            _ => default,
        }
    }

    /// Binds `key` to `value`, replacing any previous binding.
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns true if `key` has an explicit binding.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unbound_keys_fall_back_without_inserting() {
        let config = Config::new();
        assert_eq!(
            config.get_string("input.keyboard.w", "action.trigger"),
            "action.trigger"
        );
        assert!(!config.contains("input.keyboard.w"));
        assert!(config.is_empty());
    }

    #[test]
    fn typed_lookups() {
        let mut config = Config::new();
        config.set_string("debug.overlay", "yes");
        config.set_string("camera.speed", " 2.5 ");
        config.set_string("broken", "abc");

        assert!(config.get_bool("debug.overlay", false));
        assert_eq!(config.get_f64("camera.speed", 1.0), 2.5);
        assert_eq!(config.get_f64("broken", 1.0), 1.0);
        assert!(config.get_bool("broken", true));
    }

    #[test]
    fn save_then_load_preserves_bindings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ron");

        let mut config = Config::new();
        config.set_string("input.keyboard.w", "move.forward");
        config.set_string("input.mouse.x", "camera.yaw");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.get_string("input.keyboard.w", "action.trigger"),
            "move.forward"
        );
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.ron")).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        std::fs::write(&path, "this is not ron {").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
