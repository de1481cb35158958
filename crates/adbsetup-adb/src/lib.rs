//! # adbsetup-adb - ADB Process Plumbing
//!
//! Runs the `adb` binary for everything the setup flow needs from the host:
//! locating adb, listing connected devices, and checking whether the
//! accessibility service is installed on a device.
//!
//! Depends on [`adbsetup_core`] for error handling.
//!
//! ## Public API
//!
//! ### Device Discovery
//! - [`AndroidDevice`] - A device reported by `adb devices -l`
//! - [`discover_devices()`] - List devices with the default timeout
//!
//! ### Service Detection
//! - [`has_service()`] - Check for the service package on a device
//!
//! ### Tool Utilities
//! - [`ToolAvailability`] - Locate and verify the adb binary

pub mod devices;
pub mod service;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod tool_availability;

// Public API re-exports
pub use devices::{
    discover_devices, discover_devices_with_timeout, find_device, AndroidDevice,
    DeviceDiscoveryResult, DeviceStatus, DEVICES_TIMEOUT,
};
pub use service::{has_service, DEFAULT_SERVICE_PACKAGE};
pub use tool_availability::{verify_adb, ToolAvailability};
