// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Task records: grid puzzles with training and test pairs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

use crate::palette::SENTINEL;
use crate::{LabelError, Result};

/// Which source subdirectory to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Training,
    Evaluation,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Training => "training",
            Category::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular matrix of color indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(pub Vec<Vec<u8>>);

impl Grid {
    pub fn rows(&self) -> usize {
        self.0.len()
    }

    /// Width of the widest row
    pub fn cols(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_rectangular(&self) -> bool {
        let cols = self.cols();
        self.0.iter().all(|row| row.len() == cols)
    }

    /// Copy with every non-background cell replaced by the sentinel color
    pub fn highlighted(&self) -> Grid {
        Grid(
            self.0
                .iter()
                .map(|row| row.iter().map(|&v| if v > 0 { SENTINEL } else { v }).collect())
                .collect(),
        )
    }
}

impl From<Vec<Vec<u8>>> for Grid {
    fn from(cells: Vec<Vec<u8>>) -> Self {
        Grid(cells)
    }
}

/// One input/output example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub input: Grid,
    pub output: Grid,
    /// Fields we don't interpret, written back as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A grid puzzle as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub train: Vec<ExamplePair>,
    pub test: Vec<ExamplePair>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskRecord {
    /// Load and parse a task record
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| LabelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Re-encode the record as JSON at `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "train": [
            {"input": [[0, 1], [2, 0]], "output": [[1, 0], [0, 2]]},
            {"input": [[3]], "output": [[4]]}
        ],
        "test": [
            {"input": [[0, 5, 0]], "output": [[9, 0, 7]], "note": "kept"}
        ],
        "name": "sample"
    }"#;

    #[test]
    fn test_parse_sample() {
        let task: TaskRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(task.train.len(), 2);
        assert_eq!(task.test.len(), 1);
        assert_eq!(task.train[0].input, Grid(vec![vec![0, 1], vec![2, 0]]));
        assert_eq!(task.test[0].extra["note"], "kept");
        assert_eq!(task.extra["name"], "sample");
    }

    #[test]
    fn test_highlighted_sets_sentinel() {
        let grid = Grid(vec![vec![0, 1], vec![2, 0]]);
        assert_eq!(grid.highlighted(), Grid(vec![vec![0, 10], vec![10, 0]]));
        // original untouched
        assert_eq!(grid, Grid(vec![vec![0, 1], vec![2, 0]]));
    }

    #[test]
    fn test_grid_shape() {
        let grid = Grid(vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert!(grid.is_rectangular());
        assert!(!Grid(vec![vec![0, 1], vec![2]]).is_rectangular());
        assert_eq!(Grid(vec![]).cols(), 0);
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"train": []}"#).unwrap();

        match TaskRecord::load(&path) {
            Err(LabelError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_keeps_logical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy.json");
        let task: TaskRecord = serde_json::from_str(SAMPLE).unwrap();

        task.save(&path).unwrap();
        let reloaded = TaskRecord::load(&path).unwrap();
        assert_eq!(reloaded, task);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Training.to_string(), "training");
        assert_eq!(Category::Evaluation.as_str(), "evaluation");
    }
}
