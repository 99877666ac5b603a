// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Presenting figures and waiting for a decision key

pub mod terminal;
pub mod widgets;

use crate::figure::Figure;
use crate::Result;

pub use terminal::TerminalViewer;

/// The key that ended a presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    /// A printable key, exactly as typed
    Char(char),
    /// A non-printable key such as `Enter` or `F1`
    Named(String),
    /// The view was closed without a key
    Dismissed,
}

/// Labeling outcome for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    Undecided,
}

impl Decision {
    pub fn from_key(key: &KeyPress) -> Self {
        match key {
            KeyPress::Char('y') => Decision::Yes,
            KeyPress::Char('n') => Decision::No,
            _ => Decision::Undecided,
        }
    }

    /// Destination subdirectory, if this decision is persisted
    pub fn subdir(&self) -> Option<&'static str> {
        match self {
            Decision::Yes => Some("yes"),
            Decision::No => Some("no"),
            Decision::Undecided => None,
        }
    }
}

/// A surface that shows a figure and blocks until one key is pressed
pub trait Viewer {
    /// Render the figure and wait for a single key press
    fn present(&mut self, figure: &Figure) -> Result<KeyPress>;

    /// Release whatever the view holds
    fn close(&mut self) -> Result<()>;
}
