/*!
 * Replays a script generated by treepack into the current directory
 */

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use treepack::config::ClipboardChoice;
use treepack::logging::init_tracing;
use treepack::unpack::replay_script;
use treepack::Result;

/// Command-line arguments for treepack-unpack
#[derive(Parser, Debug)]
#[clap(
    name = "treepack-unpack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Recreate the directory tree embedded in a treepack script"
)]
struct Args {
    /// Generated script to replay
    script: PathBuf,
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let clipboard = ClipboardChoice::from_env().sink();
    let summary = replay_script(&args.script, &PathBuf::from("."), clipboard.as_ref())?;

    info!(
        "Recreated {} files ({} directories created, {} skipped)",
        summary.files_written.len(),
        summary.directories_created.len(),
        summary.skipped.len()
    );
    Ok(())
}
