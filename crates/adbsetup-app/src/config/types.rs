//! Configuration types for adb-setup
//!
//! Defines:
//! - `Settings` - Global application settings (`config.toml`)
//! - `AdbSettings`, `ServiceSettings` - Its sections

use adbsetup_adb::DEFAULT_SERVICE_PACKAGE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub adb: AdbSettings,

    #[serde(default)]
    pub service: ServiceSettings,
}

/// `[adb]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdbSettings {
    /// Location of the adb binary saved by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Timeout for `adb devices -l`
    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,
}

impl Default for AdbSettings {
    fn default() -> Self {
        Self {
            path: None,
            discovery_timeout_secs: default_discovery_timeout_secs(),
        }
    }
}

impl AdbSettings {
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs.max(1))
    }
}

fn default_discovery_timeout_secs() -> u64 {
    30
}

/// `[service]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceSettings {
    /// Package checked for by `detect-service`
    #[serde(default = "default_service_package")]
    pub package: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            package: default_service_package(),
        }
    }
}

fn default_service_package() -> String {
    DEFAULT_SERVICE_PACKAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(settings.adb.path.is_none());
        assert_eq!(settings.adb.discovery_timeout_secs, 30);
        assert_eq!(settings.service.package, DEFAULT_SERVICE_PACKAGE);
    }

    #[test]
    fn test_parse_partial_settings() {
        let content = r#"
[adb]
path = "/opt/android/platform-tools/adb"
"#;
        let settings: Settings = toml::from_str(content).unwrap();
        assert_eq!(
            settings.adb.path,
            Some(PathBuf::from("/opt/android/platform-tools/adb"))
        );
        assert_eq!(settings.adb.discovery_timeout_secs, 30);
        assert_eq!(settings.service.package, DEFAULT_SERVICE_PACKAGE);
    }

    #[test]
    fn test_parse_empty_settings() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_discovery_timeout_never_zero() {
        let adb = AdbSettings {
            path: None,
            discovery_timeout_secs: 0,
        };
        assert_eq!(adb.discovery_timeout(), Duration::from_secs(1));
    }
}
