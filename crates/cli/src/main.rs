//! CLI tool for splitting combined source dumps and optimizing them for RAG.
//!
//! The input is a text file (or a directory of them) in which every source
//! file is introduced by a `===== File: <path>` header. Each dump is split
//! back into files, normalized per file type, and written under the output
//! directory with its original directory structure.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use rag_optimizer_core::{
    discover_input_files, process_input, DumpReport, Error, PipelineConfig, RunReport,
    DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_DIR,
};

/// Split a combined source dump into files and optimize them for RAG indexing.
#[derive(Parser, Debug)]
#[command(name = "rag-optimize")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Combined dump file, or a directory of dump files
    #[arg(long, default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Output directory for optimized files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Extension of dump files when --input is a directory
    #[arg(long, default_value = "txt")]
    extension: String,

    /// Write a JSON report of per-file savings to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Optimize files on a single thread
    #[arg(long)]
    sequential: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Message for an input that yielded no dumps to process.
fn no_input_message(input: &Path, extension: &str) -> String {
    if input.is_dir() {
        format!(
            "No dump files with extension '.{}' found under '{}'.",
            extension,
            input.display()
        )
    } else {
        format!("Input file '{}' not found.", input.display())
    }
}

/// Output root for one dump: the output directory itself for a single
/// input file, or a per-dump subdirectory when a directory was given.
fn output_root_for(args: &Args, dump: &Path) -> PathBuf {
    if args.input.is_dir() {
        let stem = dump
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "dump".to_string());
        args.output_dir.join(stem)
    } else {
        args.output_dir.clone()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let config = PipelineConfig {
        input_extension: args.extension.clone(),
        parallel: !args.sequential,
    };

    let dumps = discover_input_files(&args.input, &config.input_extension);
    if dumps.is_empty() {
        error!("{}", no_input_message(&args.input, &config.input_extension));
        return Ok(());
    }

    let mut run = RunReport::new(args.input.clone(), args.output_dir.clone(), &config);
    let mut total_written = 0;
    let mut total_failed = 0;

    for dump in &dumps {
        let output_root = output_root_for(&args, dump);
        let outcome = match process_input(dump, &output_root, &config) {
            Ok(outcome) => outcome,
            Err(Error::InputNotFound { path }) => {
                error!("Input file '{}' not found.", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let report = &outcome.report;
        total_written += outcome.summary.written.len();
        total_failed += outcome.summary.failed.len();

        println!("\n[{}]", dump.display());
        println!("  Files: {}", report.totals.files);
        println!("  Written: {}", outcome.summary.written.len());
        println!("  Failed: {}", outcome.summary.failed.len());
        println!(
            "  Bytes: {} -> {} (saved {})",
            report.totals.original_bytes,
            report.totals.optimized_bytes,
            report.saved_bytes()
        );
        println!(
            "  Approx. tokens: {} -> {} (saved {})",
            report.totals.original_tokens,
            report.totals.optimized_tokens,
            report.saved_tokens()
        );
        println!("  Output: {:?}", output_root);

        run.dumps.push(DumpReport {
            input: dump.clone(),
            output_dir: output_root,
            report: outcome.report,
            failed: outcome.summary.failed,
        });
    }

    if let Some(report_path) = &args.report {
        std::fs::write(report_path, run.to_json_pretty()?)?;
        println!("\nReport: {:?}", report_path);
    }

    println!("\n[summary]");
    println!("  Dumps processed: {}", run.dumps.len());
    println!("  Files written: {}", total_written);
    println!("  Files failed: {}", total_failed);
    println!("  Approx. tokens saved: {}", run.saved_tokens());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_message_for_missing_file() {
        let message = no_input_message(Path::new("does/not/exist.txt"), "txt");
        assert_eq!(message, "Input file 'does/not/exist.txt' not found.");
    }

    #[test]
    fn test_no_input_message_for_empty_directory() {
        let dir = std::env::temp_dir();
        let message = no_input_message(&dir, "txt");
        assert!(message.starts_with("No dump files with extension '.txt' found under"));
        assert!(!message.contains("not found."));
    }
}
