//! Configuration file handling for adb-setup
//!
//! Settings live in `<platform config dir>/adb-setup/config.toml`.

pub mod settings;
pub mod types;

pub use settings::{default_config_dir, load_settings, save_settings};
pub use types::*;
