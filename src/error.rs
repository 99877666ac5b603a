// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for BnW

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for BnW operations
pub type Result<T> = std::result::Result<T, LabelError>;

/// BnW error types
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Source directory does not exist: {0:?}")]
    MissingSource(PathBuf),

    #[error("Failed to parse task record {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Last labeled file {0} is not in the source directory")]
    CursorNotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Labeling needs an interactive terminal")]
    NotInteractive,

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),
}
