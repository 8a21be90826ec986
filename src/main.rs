use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use llvm_covrs::cli::{self, ExportFormat};
use llvm_covrs::ingest;
use llvm_covrs::model::ReportNode;

/// llvm-covrs: convert llvm-cov JSON exports into a report hierarchy.
#[derive(Parser)]
#[command(name = "llvm-covrs", version, about)]
struct Cli {
    /// Name for the report (default: the export's filename).
    #[arg(long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of an export.
    Summary {
        /// Path to the `llvm-cov export` JSON file.
        file: PathBuf,
    },

    /// List per-file coverage.
    Files {
        /// Path to the `llvm-cov export` JSON file.
        file: PathBuf,

        /// Sort by coverage rate ascending (show worst files first).
        #[arg(long)]
        sort_by_coverage: bool,
    },

    /// Show line-level coverage for a source file.
    Lines {
        /// Path to the `llvm-cov export` JSON file.
        file: PathBuf,

        /// The source file path (as stored in the export).
        source_file: String,

        /// Show only uncovered line ranges.
        #[arg(long)]
        uncovered: bool,
    },

    /// Show the functions recorded for a source file.
    Functions {
        /// Path to the `llvm-cov export` JSON file.
        file: PathBuf,

        /// The source file path (as stored in the export).
        source_file: String,
    },

    /// Print the converted report tree.
    Export {
        /// Path to the `llvm-cov export` JSON file.
        file: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
    },
}

fn load(file: &Path, name: Option<&str>) -> Result<ReportNode> {
    ingest::ingest(file, name).with_context(|| format!("Failed to convert {}", file.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Cli::parse();
    let name = args.name.as_deref();

    let output = match args.command {
        Commands::Summary { file } => cli::cmd_summary(&load(&file, name)?)?,
        Commands::Files {
            file,
            sort_by_coverage,
        } => cli::cmd_files(&load(&file, name)?, sort_by_coverage)?,
        Commands::Lines {
            file,
            source_file,
            uncovered,
        } => cli::cmd_lines(&load(&file, name)?, &source_file, uncovered)?,
        Commands::Functions { file, source_file } => {
            cli::cmd_functions(&load(&file, name)?, &source_file)?
        }
        Commands::Export { file, format } => cli::cmd_export(&load(&file, name)?, format)?,
    };

    print!("{output}");
    Ok(())
}
