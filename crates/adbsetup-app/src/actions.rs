//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::deps::SetupDeps;
use crate::handler::UpdateAction;
use crate::message::{Message, TaskOutcome};
use crate::state_machine::Task;

/// Execute an action by spawning a background task
pub fn handle_action<D>(action: UpdateAction, deps: Arc<D>, msg_tx: mpsc::Sender<Message>)
where
    D: SetupDeps + Sync + 'static,
{
    match action {
        UpdateAction::SpawnTask { generation, task } => {
            spawn_task(generation, task, deps, msg_tx);
        }
    }
}

/// Run `task` on the runtime and post its outcome back as
/// [`Message::TaskCompleted`]
///
/// The task is never aborted; the state machine drops its result if the
/// state has moved on by the time it arrives.
pub fn spawn_task<D>(generation: u64, task: Task, deps: Arc<D>, msg_tx: mpsc::Sender<Message>)
where
    D: SetupDeps + Sync + 'static,
{
    // `deps` is dropped only after the result is queued
    tokio::spawn(async move {
        debug!("Running {:?} for generation {}", task, generation);
        let outcome = execute_task(task, deps.as_ref()).await;
        if msg_tx
            .send(Message::TaskCompleted {
                generation,
                outcome,
            })
            .await
            .is_err()
        {
            warn!("Engine stopped before task result for generation {}", generation);
        }
    });
}

/// Run the dependency call behind `task`
pub async fn execute_task<D: SetupDeps>(task: Task, deps: &D) -> TaskOutcome {
    match task {
        Task::LocateAdb => TaskOutcome::AdbLocated(deps.locate_adb().await),

        Task::DiscoverDevices => match deps.get_devices().await {
            Ok(devices) => TaskOutcome::DevicesDiscovered(devices),
            Err(e) => TaskOutcome::DeviceDiscoveryFailed {
                error: e.to_string(),
            },
        },

        Task::DetectService { device_id } => match deps.has_service(&device_id).await {
            Ok(installed) => TaskOutcome::ServiceDetected { installed },
            Err(e) => TaskOutcome::ServiceDetectionFailed {
                error: e.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DepsCall, FakeDeps};
    use adbsetup_adb::test_utils::test_emulators;
    use adbsetup_core::Error;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_execute_locate_adb() {
        let deps = FakeDeps::new().with_adb_location(Some(PathBuf::from("/sdk/adb")));
        let outcome = execute_task(Task::LocateAdb, &deps).await;
        assert!(
            matches!(outcome, TaskOutcome::AdbLocated(Some(ref p)) if p == &PathBuf::from("/sdk/adb"))
        );
    }

    #[tokio::test]
    async fn test_execute_discover_devices() {
        let deps = FakeDeps::new().with_devices(Ok(test_emulators(2)));
        let outcome = execute_task(Task::DiscoverDevices, &deps).await;
        assert!(matches!(outcome, TaskOutcome::DevicesDiscovered(ref d) if d.len() == 2));
    }

    #[tokio::test]
    async fn test_execute_discover_devices_error_keeps_message() {
        let deps = FakeDeps::new().with_devices(Err(Error::process("adb server died")));
        let outcome = execute_task(Task::DiscoverDevices, &deps).await;
        match outcome {
            TaskOutcome::DeviceDiscoveryFailed { error } => {
                assert!(error.contains("adb server died"))
            }
            other => panic!("Unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_detect_service_passes_device_id() {
        let deps = FakeDeps::new().with_service(Ok(true));
        let outcome = execute_task(
            Task::DetectService {
                device_id: "emulator-5554".to_string(),
            },
            &deps,
        )
        .await;

        assert!(matches!(
            outcome,
            TaskOutcome::ServiceDetected { installed: true }
        ));
        assert_eq!(
            deps.calls(),
            vec![DepsCall::HasService("emulator-5554".to_string())]
        );
    }

    #[tokio::test]
    async fn test_spawn_task_posts_completion() {
        let deps = Arc::new(FakeDeps::new().with_service(Ok(false)));
        let (tx, mut rx) = mpsc::channel(4);

        handle_action(
            UpdateAction::SpawnTask {
                generation: 7,
                task: Task::DetectService {
                    device_id: "R58M123ABC".to_string(),
                },
            },
            deps,
            tx,
        );

        match rx.recv().await {
            Some(Message::TaskCompleted {
                generation,
                outcome,
            }) => {
                assert_eq!(generation, 7);
                assert!(matches!(
                    outcome,
                    TaskOutcome::ServiceDetected { installed: false }
                ));
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }
}
