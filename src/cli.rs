// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `readydag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "readydag",
    version,
    about = "Compute student readiness over a concept dependency DAG.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the exam snapshot (JSON: graph, scores, max_scores,
    /// question_concept_map).
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: String,

    /// Path to the parameter config file (TOML).
    ///
    /// If omitted, `Readydag.toml` is used when present, otherwise the
    /// built-in defaults (alpha=1.0, beta=0.3, gamma=0.2, threshold=0.6, k=4).
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Emit a report for this student only, instead of the class summary.
    #[arg(long, value_name = "STUDENT_ID")]
    pub student: Option<String>,

    /// Override the configured cluster count.
    #[arg(long, value_name = "K")]
    pub k: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `READYDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the snapshot, print a summary, but don't compute.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
