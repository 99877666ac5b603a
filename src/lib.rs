// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! BnW: manual yes/no labeling of grid puzzle tasks
//!
//! Walks a directory of task records, shows each one as a color-coded
//! figure, and files it under `yes/` or `no/` depending on the key pressed.

pub mod config;
pub mod error;
pub mod figure;
pub mod history;
pub mod labeler;
pub mod palette;
pub mod render;
pub mod task;
pub mod viewer;

pub use config::AppConfig;
pub use error::{LabelError, Result};
pub use labeler::{label_category, Labeler, RunSummary};
pub use task::Category;
