// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for BnW

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::task::Category;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Directory holding one subdirectory per category of task records
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Name of the output directory, created next to `data_root`
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// View settings
    #[serde(default)]
    pub view: ViewConfig,

    /// Label journal settings
    #[serde(default)]
    pub journal: JournalConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ViewConfig {
    /// Save every presented figure as a PNG under this directory
    #[serde(default)]
    pub export_dir: Option<String>,
    /// Side length of one grid cell in exported images, in pixels
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Width of the grid lines in exported images, in pixels
    #[serde(default = "default_grid_line")]
    pub grid_line: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JournalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_journal_file")]
    pub file_name: String,
}

// Default value functions
fn default_data_root() -> String { "../data".to_string() }
fn default_output_dir() -> String { "b&w".to_string() }
fn default_cell_size() -> u32 { 20 }
fn default_grid_line() -> u32 { 2 }
fn default_true() -> bool { true }
fn default_journal_file() -> String { "labels.jsonl".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            output_dir: default_output_dir(),
            view: ViewConfig::default(),
            journal: JournalConfig::default(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            cell_size: default_cell_size(),
            grid_line: default_grid_line(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: default_journal_file(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::LabelError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::Result<()> {
        if self.output_dir.trim().is_empty() {
            return Err(crate::LabelError::Config("output_dir must not be empty".to_string()));
        }
        if self.view.cell_size == 0 {
            return Err(crate::LabelError::Config("view.cell_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Source directory for a category: `<data_root>/<category>`
    pub fn source_dir(&self, category: Category) -> PathBuf {
        Path::new(&self.data_root).join(category.as_str())
    }

    /// Output directory for a category: `<parent of data_root>/<output_dir>/<category>`
    pub fn destination_root(&self, category: Category) -> PathBuf {
        let root = Path::new(&self.data_root);
        let parent = root.parent().unwrap_or_else(|| Path::new(""));
        parent.join(&self.output_dir).join(category.as_str())
    }

    /// Journal path for a category, if the journal is enabled
    pub fn journal_path(&self, category: Category) -> Option<PathBuf> {
        self.journal
            .enabled
            .then(|| self.destination_root(category).join(&self.journal.file_name))
    }

    /// PNG export directory for a category, if exporting is enabled
    pub fn export_dir(&self, category: Category) -> Option<PathBuf> {
        self.view
            .export_dir
            .as_ref()
            .map(|dir| Path::new(dir).join(category.as_str()))
    }
}
