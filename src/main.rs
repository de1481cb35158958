//! adbsetup - Guided Android device setup for accessibility scanning
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use adb_setup::Options;
use clap::Parser;

/// Connect an Android device for accessibility scanning
#[derive(Parser, Debug)]
#[command(name = "adbsetup")]
#[command(about = "Connect an Android device for accessibility scanning", long_about = None)]
struct Args {
    /// Path to the adb binary (overrides the configured one for this run)
    #[arg(long, value_name = "PATH")]
    adb_path: Option<PathBuf>,

    /// Directory holding config.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Run in headless mode (NDJSON output, no prompts)
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    adbsetup_core::logging::init()?;

    let options = Options {
        adb_path: args.adb_path,
        config_dir: args.config_dir,
        headless: args.headless,
    };

    let final_state = adb_setup::run(options).await?;
    tracing::info!("adb-setup exiting in {}", final_state);
    Ok(())
}
