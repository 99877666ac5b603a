// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Multi-panel figure built from a task record
//!
//! Row 0 holds inputs, row 1 outputs. One column per training pair, then one
//! column per test pair. Test grids are shown highlighted (every non-zero
//! cell drawn in the sentinel color) so the shape stands out over the colors.

use crate::palette;
use crate::task::{Grid, TaskRecord};
use crate::{LabelError, Result};

/// A titled grid in the figure
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub grid: Grid,
}

/// Two rows of panels with a figure-level title
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    /// `[inputs, outputs]`, both with the same number of columns
    pub rows: [Vec<Panel>; 2],
}

impl Figure {
    /// Build the figure for one task; `index` is the file's position in the full source list
    pub fn from_task(file_name: &str, index: usize, task: &TaskRecord) -> Self {
        let mut inputs = Vec::with_capacity(task.train.len() + task.test.len());
        let mut outputs = Vec::with_capacity(inputs.capacity());

        for (i, pair) in task.train.iter().enumerate() {
            inputs.push(Panel { title: format!("Input {}", i), grid: pair.input.clone() });
            outputs.push(Panel { title: format!("Output {}", i), grid: pair.output.clone() });
        }
        for (i, pair) in task.test.iter().enumerate() {
            inputs.push(Panel { title: format!("Test Input {}", i), grid: pair.input.highlighted() });
            outputs.push(Panel { title: format!("Test Output {}", i), grid: pair.output.highlighted() });
        }

        Self {
            title: format!("{} - {}", file_name, index),
            rows: [inputs, outputs],
        }
    }

    pub fn columns(&self) -> usize {
        self.rows[0].len()
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.rows.iter().flatten()
    }

    /// Reject grids the renderers can't draw: ragged rows or values outside the palette
    pub fn validate(&self) -> Result<()> {
        for panel in self.panels() {
            if !panel.grid.is_rectangular() {
                return Err(LabelError::Render(format!("{}: grid rows differ in length", panel.title)));
            }
            for &value in panel.grid.0.iter().flatten() {
                palette::color_for(value)
                    .map_err(|e| LabelError::Render(format!("{}: {}", panel.title, e)))?;
            }
        }
        Ok(())
    }
}
