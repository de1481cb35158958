//! Tool availability checking for the adb binary
//!
//! Looks for a working `adb` in the configured location, the Android SDK
//! environment variables, and finally on `PATH`.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;

use adbsetup_core::prelude::*;

/// First line of `adb version`: "Android Debug Bridge version 1.0.41"
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Android Debug Bridge version (\S+)").expect("Invalid adb version regex")
});

#[cfg(windows)]
const ADB_BINARY: &str = "adb.exe";
#[cfg(not(windows))]
const ADB_BINARY: &str = "adb";

/// Cached availability of the adb binary
#[derive(Debug, Clone, Default)]
pub struct ToolAvailability {
    /// Path of the first adb candidate that answered `adb version`
    pub adb_path: Option<PathBuf>,

    /// Version reported by that binary
    pub adb_version: Option<String>,
}

impl ToolAvailability {
    /// Check adb availability, trying `configured` first
    pub async fn check(configured: Option<&Path>) -> Self {
        for candidate in Self::get_adb_paths(configured) {
            match verify_adb(&candidate).await {
                Ok(version) => {
                    info!("Using adb {} at {}", version, candidate.display());
                    return Self {
                        adb_path: Some(candidate),
                        adb_version: Some(version),
                    };
                }
                Err(e) => debug!("adb candidate {} rejected: {}", candidate.display(), e),
            }
        }

        Self::default()
    }

    /// Get list of paths to try for the adb command, in priority order
    fn get_adb_paths(configured: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(path) = configured {
            paths.push(path.to_path_buf());
        }

        for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
            if let Ok(sdk) = std::env::var(var) {
                paths.push(PathBuf::from(sdk).join("platform-tools").join(ADB_BINARY));
            }
        }

        if let Ok(on_path) = which::which(ADB_BINARY) {
            paths.push(on_path);
        }

        paths.dedup();
        paths
    }

    /// Get user-friendly message for unavailable adb
    pub fn adb_unavailable_message(&self) -> Option<&'static str> {
        if self.adb_path.is_some() {
            None
        } else {
            Some("adb not found. Set ANDROID_HOME or enter the location of the adb binary.")
        }
    }
}

/// Run `adb version` and return the reported version
pub async fn verify_adb(path: &Path) -> Result<String> {
    let output = Command::new(path)
        .arg("version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AdbNotFound
            } else {
                Error::process_spawn(format!("Failed to run {}: {}", path.display(), e))
            }
        })?;

    if !output.status.success() {
        return Err(Error::adb_not_usable(path));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_adb_version(&stdout).ok_or_else(|| Error::adb_not_usable(path))
}

fn parse_adb_version(output: &str) -> Option<String> {
    VERSION_PATTERN
        .captures(output)
        .map(|caps| caps[1].to_string())
}
