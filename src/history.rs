// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Append-only journal of label decisions, used for auditing and undo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::task::Category;
use crate::Result;

/// A persisted decision as recorded in the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Yes,
    No,
}

/// A single labeling in the journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub file_name: String,
    pub label: Label,
    pub destination: PathBuf,
    pub undone: bool,
}

/// Journal of label decisions for one category
pub struct LabelJournal {
    path: PathBuf,
}

impl LabelJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append an entry to the journal
    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }

    /// Read all journal entries
    pub fn read_all(&self) -> Result<Vec<JournalEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to parse journal entry: {}", e);
                }
            }
        }

        Ok(entries)
    }

    /// Get the most recent N entries (newest first)
    pub fn get_recent(&self, count: usize) -> Result<Vec<JournalEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(count);
        Ok(entries)
    }

    /// Mark an entry as undone
    pub fn mark_undone(&self, id: &str) -> Result<()> {
        let entries = self.read_all()?;

        let file = File::create(&self.path)?;
        let mut writer = std::io::BufWriter::new(file);

        for mut entry in entries {
            if entry.id == id {
                entry.undone = true;
            }
            let json = serde_json::to_string(&entry)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Get entries that haven't been undone, oldest first
    pub fn get_undoable(&self) -> Result<Vec<JournalEntry>> {
        let entries = self.read_all()?;
        Ok(entries.into_iter().filter(|e| !e.undone).collect())
    }
}

/// A decision taken back by [`undo_latest`]
#[derive(Debug, Clone)]
pub struct Undone {
    pub entry: JournalEntry,
    /// Whether the labeled copy still existed when it was undone
    pub file_present: bool,
}

/// Undo the `count` most recent decisions (0 = all), newest first
///
/// Removes each labeled copy and marks the entry undone. A copy that is
/// already gone is only marked. With `dry_run` nothing is touched.
pub fn undo_latest(journal: &LabelJournal, count: usize, dry_run: bool) -> Result<Vec<Undone>> {
    let mut entries = journal.get_undoable()?;
    entries.reverse();
    if count != 0 {
        entries.truncate(count);
    }

    let mut undone = Vec::with_capacity(entries.len());
    for entry in entries {
        let file_present = entry.destination.exists();
        if !dry_run {
            if file_present {
                fs::remove_file(&entry.destination)?;
            } else {
                tracing::warn!("{} already gone, marking undone", entry.destination.display());
            }
            journal.mark_undone(&entry.id)?;
        }
        undone.push(Undone { entry, file_present });
    }

    Ok(undone)
}

/// Create a new journal entry
pub fn create_entry(
    category: Category,
    file_name: String,
    label: Label,
    destination: PathBuf,
) -> JournalEntry {
    JournalEntry {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        category,
        file_name,
        label,
        destination,
        undone: false,
    }
}
