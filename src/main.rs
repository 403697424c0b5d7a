/*!
 * Command-line interface for treepack
 */

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

use treepack::archive::render_script;
use treepack::config::{Args, Config};
use treepack::logging::init_tracing;
use treepack::report::{PackReport, ReportFormat, Reporter};
use treepack::scanner::Scanner;
use treepack::writer::ScriptWriter;
use treepack::Result;

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
    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;

    let source_dir = config.effective_source_dir();

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📦 Packing");
    progress.set_message(format!("📂 Scanning directory: {}", source_dir.display()));

    let start_time = Instant::now();

    let scanner =
        Scanner::new(&source_dir, Arc::new(progress.clone())).skip_file(&config.output_file);
    let files = scanner.scan()?;
    progress.finish_and_clear();

    let script = render_script(&files)?;

    let clipboard = config.clipboard.sink();
    let publication =
        ScriptWriter::new(&config.output_file, clipboard.as_ref()).emit_and_publish(&script)?;

    let stats = scanner.get_statistics();
    let report = PackReport {
        output_file: publication.output_file.display().to_string(),
        source_dir: source_dir.display().to_string(),
        duration: start_time.elapsed(),
        files_processed: stats.files_processed,
        text_files: stats.text_files,
        unreadable_files: stats.unreadable_files,
        total_bytes: stats.total_bytes,
        script_bytes: publication.bytes,
        skipped_entries: stats.walk_errors,
        clipboard: publication.clipboard,
    };

    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}
