//! Test utilities for the setup flow
//!
//! [`FakeDeps`] records every dependency call and replays scripted results.
//! Device queries can be gated on a oneshot channel to hold them in flight.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use adbsetup_adb::AndroidDevice;
use adbsetup_core::{Error, Result};
use tokio::sync::oneshot;

use crate::deps::SetupDeps;

/// A recorded call on [`FakeDeps`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepsCall {
    LocateAdb,
    GetDevices,
    HasService(String),
    SetAdbPath(PathBuf),
    SetSelectedDeviceId(String),
}

enum DevicesResponse {
    Ready(Result<Vec<AndroidDevice>>),
    Gated(oneshot::Receiver<Result<Vec<AndroidDevice>>>),
}

/// Scripted [`SetupDeps`]
///
/// Unscripted device queries return no devices; unscripted service checks
/// report the service as installed.
#[derive(Default)]
pub struct FakeDeps {
    adb_location: Mutex<Option<PathBuf>>,
    device_responses: Mutex<VecDeque<DevicesResponse>>,
    service_responses: Mutex<VecDeque<Result<bool>>>,
    calls: Mutex<Vec<DepsCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeDeps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of `locate_adb`
    pub fn with_adb_location(self, location: Option<PathBuf>) -> Self {
        *lock(&self.adb_location) = location;
        self
    }

    /// Queue a result for the next `get_devices` call
    pub fn with_devices(self, result: Result<Vec<AndroidDevice>>) -> Self {
        lock(&self.device_responses).push_back(DevicesResponse::Ready(result));
        self
    }

    /// Queue a result for the next `has_service` call
    pub fn with_service(self, result: Result<bool>) -> Self {
        lock(&self.service_responses).push_back(result);
        self
    }

    /// Queue a `get_devices` call that waits for the returned sender
    pub fn gate_devices(&self) -> oneshot::Sender<Result<Vec<AndroidDevice>>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.device_responses).push_back(DevicesResponse::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<DepsCall> {
        lock(&self.calls).clone()
    }

    /// Ids passed to `set_selected_device_id`, in order
    pub fn selected_device_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DepsCall::SetSelectedDeviceId(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to `set_adb_path`, in order
    pub fn adb_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DepsCall::SetAdbPath(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: DepsCall) {
        lock(&self.calls).push(call);
    }
}

impl SetupDeps for FakeDeps {
    async fn locate_adb(&self) -> Option<PathBuf> {
        self.record(DepsCall::LocateAdb);
        lock(&self.adb_location).clone()
    }

    async fn get_devices(&self) -> Result<Vec<AndroidDevice>> {
        self.record(DepsCall::GetDevices);
        let response = lock(&self.device_responses).pop_front();

        match response {
            None => Ok(Vec::new()),
            Some(DevicesResponse::Ready(result)) => result,
            Some(DevicesResponse::Gated(rx)) => rx.await.unwrap_or(Err(Error::ChannelClosed)),
        }
    }

    async fn has_service(&self, device_id: &str) -> Result<bool> {
        self.record(DepsCall::HasService(device_id.to_string()));
        lock(&self.service_responses)
            .pop_front()
            .unwrap_or(Ok(true))
    }

    fn set_adb_path(&self, path: &Path) {
        self.record(DepsCall::SetAdbPath(path.to_path_buf()));
    }

    fn set_selected_device_id(&self, id: &str) {
        self.record(DepsCall::SetSelectedDeviceId(id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbsetup_adb::test_utils::test_emulators;

    #[tokio::test]
    async fn test_scripted_responses_replay_in_order() {
        let deps = FakeDeps::new()
            .with_devices(Ok(test_emulators(2)))
            .with_devices(Err(Error::AdbNotFound));

        assert_eq!(deps.get_devices().await.unwrap().len(), 2);
        assert!(matches!(deps.get_devices().await, Err(Error::AdbNotFound)));
        assert!(deps.get_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gated_response() {
        let deps = FakeDeps::new();
        let release = deps.gate_devices();
        release.send(Ok(test_emulators(1))).unwrap();

        assert_eq!(deps.get_devices().await.unwrap().len(), 1);
    }

    #[test]
    fn test_setters_are_recorded() {
        let deps = FakeDeps::new();
        deps.set_adb_path(Path::new("/usr/bin/adb"));
        deps.set_selected_device_id("emulator-5554");

        assert_eq!(deps.adb_paths(), vec![PathBuf::from("/usr/bin/adb")]);
        assert_eq!(deps.selected_device_ids(), vec!["emulator-5554".to_string()]);
    }
}
