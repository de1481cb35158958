//! Device discovery using the `adb devices -l` command

use adbsetup_core::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Default timeout for the adb devices command
pub const DEVICES_TIMEOUT: Duration = Duration::from_secs(30);

/// `key:value` properties printed by `adb devices -l` after the status column
static PROPERTY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(product|model|device|transport_id):(\S+)")
        .expect("Invalid device property regex")
});

/// Connection status reported by adb for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceStatus {
    /// `device` - connected and authorized
    Online,
    Offline,
    /// USB debugging prompt not yet accepted on the device
    Unauthorized,
    /// Host lacks permission to talk to the device (udev rules)
    NoPermissions,
    Unknown,
}

impl DeviceStatus {
    fn from_adb(status: &str) -> Self {
        match status {
            "device" => DeviceStatus::Online,
            "offline" => DeviceStatus::Offline,
            "unauthorized" => DeviceStatus::Unauthorized,
            "no" => DeviceStatus::NoPermissions,
            _ => DeviceStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Unauthorized => "unauthorized",
            DeviceStatus::NoPermissions => "no-permissions",
            DeviceStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device reported by adb
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AndroidDevice {
    /// Serial number, as accepted by `adb -s`
    pub id: String,

    pub status: DeviceStatus,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub device: Option<String>,

    #[serde(default)]
    pub transport_id: Option<String>,
}

impl AndroidDevice {
    /// Whether this is an emulator instance (serials like `emulator-5554`)
    pub fn is_emulator(&self) -> bool {
        self.id.starts_with("emulator-")
    }

    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }

    /// Model name with underscores replaced, falling back to the serial
    pub fn friendly_name(&self) -> String {
        match &self.model {
            Some(model) => model.replace('_', " "),
            None => self.id.clone(),
        }
    }

    /// Get a display string for the device
    pub fn display_name(&self) -> String {
        if self.is_emulator() {
            format!("{} (emulator)", self.friendly_name())
        } else {
            self.friendly_name()
        }
    }
}

/// Result of device discovery
#[derive(Debug, Clone)]
pub struct DeviceDiscoveryResult {
    /// All devices adb reported, in any status
    pub devices: Vec<AndroidDevice>,

    /// Time taken to discover devices
    pub elapsed: Duration,
}

/// Discover connected devices using `adb devices -l`
pub async fn discover_devices(adb: &Path) -> Result<DeviceDiscoveryResult> {
    discover_devices_with_timeout(adb, DEVICES_TIMEOUT).await
}

/// Discover devices with a custom timeout
pub async fn discover_devices_with_timeout(
    adb: &Path,
    timeout_duration: Duration,
) -> Result<DeviceDiscoveryResult> {
    let start = std::time::Instant::now();

    info!("Discovering Android devices with {}", adb.display());

    let stdout = timeout(timeout_duration, run_adb_devices(adb))
        .await
        .map_err(|_| Error::process("Device discovery timed out"))??;

    let elapsed = start.elapsed();
    let devices = parse_devices_output(&stdout);

    info!("Discovered {} devices in {:?}", devices.len(), elapsed);

    Ok(DeviceDiscoveryResult { devices, elapsed })
}

/// Run adb devices command
async fn run_adb_devices(adb: &Path) -> Result<String> {
    let output = Command::new(adb)
        .args(["devices", "-l"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AdbNotFound
            } else {
                Error::process_spawn(format!("Failed to run adb devices: {}", e))
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    debug!("adb devices stdout: {}", stdout);
    if !stderr.is_empty() {
        debug!("adb devices stderr: {}", stderr);
    }

    if !output.status.success() {
        return Err(Error::process(format!(
            "adb devices failed with exit code {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(stdout)
}

/// Parse the output of `adb devices -l`
///
/// ```text
/// List of devices attached
/// emulator-5554   device product:sdk_gphone64_x86_64 model:sdk_gphone64_x86_64 device:emu64x transport_id:1
/// R58M123ABC      unauthorized usb:1-1 transport_id:2
/// ```
pub(crate) fn parse_devices_output(output: &str) -> Vec<AndroidDevice> {
    output.lines().filter_map(parse_device_line).collect()
}

fn parse_device_line(line: &str) -> Option<AndroidDevice> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("List of devices") || line.starts_with('*') {
        return None;
    }

    let mut parts = line.split_whitespace();
    let id = parts.next()?;
    let status = DeviceStatus::from_adb(parts.next()?);

    let mut device = AndroidDevice {
        id: id.to_string(),
        status,
        model: None,
        product: None,
        device: None,
        transport_id: None,
    };

    // Skip the serial so `host:port` serials never look like properties
    let rest = &line[id.len()..];
    for caps in PROPERTY_PATTERN.captures_iter(rest) {
        let value = Some(caps[2].to_string());
        match &caps[1] {
            "product" => device.product = value,
            "model" => device.model = value,
            "device" => device.device = value,
            "transport_id" => device.transport_id = value,
            _ => {}
        }
    }

    Some(device)
}

/// Find a device by its exact serial
pub fn find_device<'a>(devices: &'a [AndroidDevice], id: &str) -> Option<&'a AndroidDevice> {
    devices.iter().find(|d| d.id == id)
}
