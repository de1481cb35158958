//! Side-effecting dependencies of the setup state machine
//!
//! The state machine never touches adb or the filesystem itself. Everything
//! it needs from the outside world goes through [`SetupDeps`].

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use adbsetup_adb::{discover_devices_with_timeout, has_service, AndroidDevice, ToolAvailability};
use adbsetup_core::prelude::*;

use crate::config::{save_settings, Settings};

/// Operations the setup flow delegates to its host
///
/// The async methods run on spawned tasks; the setters are only ever called
/// by the state machine, one at a time.
#[trait_variant::make(SetupDeps: Send)]
pub trait LocalSetupDeps {
    /// Find a usable adb binary without asking the user
    async fn locate_adb(&self) -> Option<PathBuf>;

    /// List every attached device, whatever its status
    async fn get_devices(&self) -> Result<Vec<AndroidDevice>>;

    /// Check whether the accessibility service is installed on `device_id`
    async fn has_service(&self, device_id: &str) -> Result<bool>;

    /// Record the adb binary location
    fn set_adb_path(&self, path: &Path);

    /// Record which device the user (or auto-selection) picked
    fn set_selected_device_id(&self, id: &str);
}

/// Production dependencies backed by the adb binary
///
/// The adb path is persisted to the config file whenever it changes, unless
/// it is the run-only override.
#[derive(Debug)]
pub struct AdbSetupDeps {
    settings: Mutex<Settings>,
    /// Where to persist settings; `None` keeps them in memory only
    config_dir: Option<PathBuf>,
    /// adb binary tried first for this run, never written to the config file
    adb_override: Option<PathBuf>,
    selected_device_id: Mutex<Option<String>>,
}

impl AdbSetupDeps {
    pub fn new(settings: Settings, config_dir: Option<PathBuf>) -> Self {
        Self {
            settings: Mutex::new(settings),
            config_dir,
            adb_override: None,
            selected_device_id: Mutex::new(None),
        }
    }

    /// Try `path` before the configured adb without saving it
    pub fn with_adb_override(mut self, path: Option<PathBuf>) -> Self {
        self.adb_override = path;
        self
    }

    pub fn adb_path(&self) -> Option<PathBuf> {
        self.settings().adb.path
    }

    pub fn selected_device_id(&self) -> Option<String> {
        self.selected_device_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> Settings {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SetupDeps for AdbSetupDeps {
    async fn locate_adb(&self) -> Option<PathBuf> {
        let configured = self.adb_override.clone().or_else(|| self.adb_path());
        let availability = ToolAvailability::check(configured.as_deref()).await;
        if let Some(message) = availability.adb_unavailable_message() {
            info!("{}", message);
        }
        availability.adb_path
    }

    async fn get_devices(&self) -> Result<Vec<AndroidDevice>> {
        let settings = self.settings();
        let timeout = settings.adb.discovery_timeout();
        let adb = settings.adb.path.ok_or(Error::AdbNotFound)?;

        let result = discover_devices_with_timeout(&adb, timeout).await?;
        Ok(result.devices)
    }

    async fn has_service(&self, device_id: &str) -> Result<bool> {
        let settings = self.settings();
        let adb = settings.adb.path.ok_or(Error::AdbNotFound)?;
        has_service(&adb, device_id, &settings.service.package).await
    }

    fn set_adb_path(&self, path: &Path) {
        let snapshot = {
            let mut settings = self
                .settings
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            settings.adb.path = Some(path.to_path_buf());
            settings.clone()
        };

        info!("adb path set to {}", path.display());

        if self.adb_override.as_deref() == Some(path) {
            debug!("Not persisting the command line adb path");
            return;
        }

        if let Some(dir) = &self.config_dir {
            if let Err(e) = save_settings(dir, &snapshot) {
                warn!("Failed to persist adb path: {}", e);
            }
        }
    }

    fn set_selected_device_id(&self, id: &str) {
        info!("Selected device {}", id);
        *self
            .selected_device_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(id.to_string());
    }
}
