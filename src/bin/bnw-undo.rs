// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! BnW Undo Utility
//!
//! Takes back label decisions recorded in the journal so the files are
//! presented again on the next labeling run.

use clap::Parser;
use std::path::PathBuf;

use bnw::history::{undo_latest, Label, LabelJournal};
use bnw::{AppConfig, Category, LabelError, Result};

#[derive(Parser, Debug)]
#[command(name = "bnw-undo")]
#[command(version = "1.0.0")]
#[command(about = "Undo BnW label decisions")]
struct Args {
    /// Which task set the decisions belong to
    #[arg(long = "type", value_enum)]
    category: Category,

    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "bnw.json")]
    config: PathBuf,

    /// Number of decisions to undo (default: 1, use 0 for all)
    #[arg(short = 'n', long, default_value = "1")]
    count: usize,

    /// Dry run - show what would be undone without doing it
    #[arg(long)]
    dry_run: bool,

    /// List all entries in the journal
    #[arg(long)]
    list: bool,
}

fn label_name(label: Label) -> &'static str {
    match label {
        Label::Yes => "yes",
        Label::No => "no",
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_target(false)
        .init();

    let config = AppConfig::load(&args.config)?;
    let journal_path = config
        .journal_path(args.category)
        .ok_or_else(|| LabelError::Config("Journal is disabled in the configuration".to_string()))?;
    let journal = LabelJournal::new(journal_path);

    if args.list {
        let entries = journal.get_recent(usize::MAX)?;
        if entries.is_empty() {
            println!("No journal entries found.");
            return Ok(());
        }
        println!("Label Journal ({} entries):", entries.len());
        println!("{:-<80}", "");
        for (i, entry) in entries.iter().enumerate() {
            println!(
                "{:3}. [{}] {} -> {}{}",
                i + 1,
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.file_name,
                label_name(entry.label),
                if entry.undone { " [UNDONE]" } else { "" }
            );
        }
        return Ok(());
    }

    let undone = undo_latest(&journal, args.count, args.dry_run)?;
    if undone.is_empty() {
        println!("No decisions to undo.");
        return Ok(());
    }

    println!(
        "{}Undoing {} decision(s)...",
        if args.dry_run { "[DRY RUN] " } else { "" },
        undone.len()
    );
    for item in &undone {
        let destination = item.entry.destination.display();
        if args.dry_run {
            println!("  Would remove: {}", destination);
        } else if item.file_present {
            println!("  Removed: {}", destination);
        } else {
            println!("  Marked undone (already gone): {}", destination);
        }
    }

    println!();
    if args.dry_run {
        println!("Dry run complete. {} decision(s) would be undone.", undone.len());
    } else {
        println!("Done. {} decision(s) undone.", undone.len());
    }

    Ok(())
}
