//! Test utilities for adb types
//!
//! Provides helper functions for creating test AndroidDevice objects.

use super::{AndroidDevice, DeviceStatus};

/// Creates an online test device.
///
/// # Arguments
/// * `id` - Device serial
/// * `model` - Optional model name as adb prints it (underscores included)
pub fn test_device(id: &str, model: Option<&str>) -> AndroidDevice {
    AndroidDevice {
        id: id.to_string(),
        status: DeviceStatus::Online,
        model: model.map(str::to_string),
        product: None,
        device: None,
        transport_id: None,
    }
}

/// Creates `count` online emulator devices with consecutive ports.
pub fn test_emulators(count: usize) -> Vec<AndroidDevice> {
    (0..count)
        .map(|i| test_device(&format!("emulator-{}", 5554 + i * 2), None))
        .collect()
}
