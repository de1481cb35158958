//! Settings parser for config.toml

use super::types::Settings;
use adbsetup_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "adb-setup";

/// Default configuration directory: `<platform config dir>/adb-setup`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Load settings from `<config_dir>/config.toml`
///
/// Missing or malformed files fall back to defaults.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Save settings to `<config_dir>/config.toml`
pub fn save_settings(config_dir: &Path, settings: &Settings) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config dir {:?}", config_dir))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    let temp_path = config_dir.join(".config.toml.tmp");

    let header = generate_config_header();
    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;

    let full_content = format!("{}{}", header, content);

    // Atomic write: write to temp, then rename
    std::fs::write(&temp_path, &full_content).context("Failed to write temp config file")?;

    std::fs::rename(&temp_path, &config_path)
        .with_context(|| format!("Failed to replace {:?}", config_path))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

fn generate_config_header() -> String {
    r#"# adb-setup configuration
# Written automatically when an adb location is saved

"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_config_returns_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_load_malformed_config_returns_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "[adb\npath = ").unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested").join("adb-setup");

        let mut settings = Settings::default();
        settings.adb.path = Some(PathBuf::from("/usr/bin/adb"));
        settings.adb.discovery_timeout_secs = 5;

        save_settings(&config_dir, &settings).unwrap();

        let content = std::fs::read_to_string(config_dir.join(CONFIG_FILENAME)).unwrap();
        assert!(content.starts_with("# adb-setup configuration"));
        assert!(content.contains("/usr/bin/adb"));
        assert!(!config_dir.join(".config.toml.tmp").exists());

        assert_eq!(load_settings(&config_dir), settings);
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = save_settings(&blocker.join("adb-setup"), &Settings::default());

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_default_config_dir_ends_with_app_dir() {
        assert!(default_config_dir().ends_with(APP_DIR));
    }
}
