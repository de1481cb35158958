//! adb-setup Library
//!
//! Guided Android device setup: finds adb, picks a device and checks that the
//! accessibility service is installed. The binary wires the setup engine to
//! an interactive or a headless (NDJSON) frontend.

pub mod command;
pub mod headless;
pub mod interactive;
pub mod runner;

use std::path::PathBuf;
use std::sync::Arc;

use adbsetup_app::config::{default_config_dir, load_settings};
use adbsetup_app::{AdbSetupDeps, Engine, EngineHandle};
use adbsetup_core::prelude::*;
use adbsetup_core::SetupState;

use crate::headless::{HeadlessEvent, HeadlessPresenter};
use crate::interactive::InteractivePresenter;
use crate::runner::{run_frontend, spawn_stdin_reader, Exit};

/// Command-line options for a setup run
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// adb binary to use instead of the configured one
    pub adb_path: Option<PathBuf>,
    /// Directory holding `config.toml`
    pub config_dir: Option<PathBuf>,
    pub headless: bool,
}

/// Build the engine and its dependencies
///
/// Settings come from the config directory. An adb path given on the
/// command line takes precedence for this run without being saved.
pub fn build_engine(options: &Options) -> (Engine<AdbSetupDeps>, EngineHandle) {
    let config_dir = options
        .config_dir
        .clone()
        .unwrap_or_else(default_config_dir);

    let settings = load_settings(&config_dir);
    if let Some(path) = &options.adb_path {
        info!("Trying adb from the command line first: {}", path.display());
    }

    let deps = Arc::new(
        AdbSetupDeps::new(settings, Some(config_dir))
            .with_adb_override(options.adb_path.clone()),
    );
    let engine = Engine::new(deps);
    let handle = engine.handle();
    (engine, handle)
}

/// Run the setup flow until the user quits, input closes, or (headless) a
/// device is ready
///
/// Returns the state the flow ended in.
pub async fn run(options: Options) -> Result<SetupState> {
    let (engine, handle) = build_engine(&options);
    let engine_task = tokio::spawn(engine.run());
    let lines = spawn_stdin_reader();

    let exit = if options.headless {
        info!("Starting in headless mode");
        run_frontend(&handle, lines, &mut HeadlessPresenter).await
    } else {
        let mut presenter = InteractivePresenter;
        println!("adb-setup. Type 'help' for commands.");
        run_frontend(&handle, lines, &mut presenter).await
    };
    debug!("Frontend exited: {:?}", exit);

    if exit != Exit::EngineStopped {
        if let Err(e) = handle.quit().await {
            warn!("Failed to stop setup engine: {}", e);
            if options.headless {
                HeadlessEvent::error(e.to_string(), e.is_fatal()).emit();
            }
            // A gone engine is joined below to learn how it ended
            if !e.is_fatal() {
                return Err(e);
            }
        }
    }

    match engine_task.await {
        Ok(state) => Ok(state),
        Err(e) => {
            error!("Setup engine task failed: {}", e);
            if options.headless {
                HeadlessEvent::error(format!("Setup engine failed: {}", e), true).emit();
            }
            Err(Error::channel_send("setup engine stopped unexpectedly"))
        }
    }
}
