// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! BnW: label grid puzzle tasks as yes/no from the terminal

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use bnw::viewer::TerminalViewer;
use bnw::{label_category, AppConfig, Category, Result};

/// BnW CLI - label grid puzzle tasks
#[derive(Parser, Debug)]
#[command(name = "bnw")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Show each grid task and file it under yes/ or no/", long_about = None)]
struct Cli {
    /// Which task set to label
    #[arg(long = "type", value_enum)]
    category: Category,

    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "bnw.json")]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config)?;

    let summary = label_category(&config, cli.category, TerminalViewer::new)?;

    if !summary.presented.is_empty() {
        info!(
            "Done: {} presented, {} yes, {} no, {} skipped ({} of {} were already labeled)",
            summary.presented.len(),
            summary.yes,
            summary.no,
            summary.skipped,
            summary.already_labeled,
            summary.total
        );
    }

    Ok(())
}
