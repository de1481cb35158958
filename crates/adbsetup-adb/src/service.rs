//! Accessibility service detection on a connected device

use adbsetup_core::prelude::*;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Package name of the on-device accessibility service
pub const DEFAULT_SERVICE_PACKAGE: &str = "com.microsoft.accessibilityinsightsforandroidservice";

const SERVICE_CHECK_TIMEOUT: Duration = Duration::from_secs(15);

/// Check whether `package` is installed on the device `device_id`
///
/// Runs `adb -s <device_id> shell pm list packages <package>`. The package
/// filter is a substring match on the device, so the output is re-checked
/// for an exact entry.
pub async fn has_service(adb: &Path, device_id: &str, package: &str) -> Result<bool> {
    debug!("Checking for {} on {}", package, device_id);

    let output = timeout(
        SERVICE_CHECK_TIMEOUT,
        Command::new(adb)
            .args(["-s", device_id, "shell", "pm", "list", "packages", package])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| Error::process("Service detection timed out"))?
    .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::AdbNotFound
        } else {
            Error::process_spawn(format!("Failed to run adb shell: {}", e))
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::process(format!(
            "pm list packages failed on {}: {}",
            device_id,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let installed = is_package_listed(&stdout, package);
    info!(
        "Service {} {} on {}",
        package,
        if installed { "found" } else { "not installed" },
        device_id
    );
    Ok(installed)
}

/// Look for an exact `package:<name>` line in `pm list packages` output
fn is_package_listed(output: &str, package: &str) -> bool {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("package:"))
        .any(|name| name == package)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_listed() {
        let output = "package:com.microsoft.accessibilityinsightsforandroidservice\n";
        assert!(is_package_listed(output, DEFAULT_SERVICE_PACKAGE));
    }

    #[test]
    fn test_package_prefix_match_is_rejected() {
        let output = "package:com.microsoft.accessibilityinsightsforandroidservice.debug\n";
        assert!(!is_package_listed(output, DEFAULT_SERVICE_PACKAGE));
    }

    #[test]
    fn test_package_among_others_with_crlf() {
        let output = "package:com.android.settings\r\n\
            package:com.microsoft.accessibilityinsightsforandroidservice\r\n";
        assert!(is_package_listed(output, DEFAULT_SERVICE_PACKAGE));
    }

    #[test]
    fn test_empty_output() {
        assert!(!is_package_listed("", DEFAULT_SERVICE_PACKAGE));
    }

    #[tokio::test]
    async fn test_has_service_missing_binary() {
        let result = has_service(
            Path::new("/nonexistent/adb"),
            "emulator-5554",
            DEFAULT_SERVICE_PACKAGE,
        )
        .await;
        assert!(matches!(result, Err(Error::AdbNotFound)));
    }
}
