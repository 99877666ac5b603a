// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! The labeling loop
//!
//! Progress lives in the destination folders: a file is done once a file of
//! the same name sits in `yes/` or `no/`. On start the lexicographically last
//! labeled name is the cursor, and processing resumes right after its position
//! in the sorted source list. A file skipped with a non-decision key is passed
//! over for the rest of the run, but comes back on the next run.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::figure::Figure;
use crate::history::{create_entry, Label, LabelJournal};
use crate::render::{self, RenderOptions};
use crate::task::{Category, TaskRecord};
use crate::viewer::{Decision, Viewer};
use crate::{LabelError, Result};

/// Source and destination directories for one category
#[derive(Debug, Clone)]
pub struct Workspace {
    pub category: Category,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Workspace {
    pub fn new(config: &AppConfig, category: Category) -> Self {
        Self {
            category,
            source_dir: config.source_dir(category),
            output_dir: config.destination_root(category),
        }
    }

    pub fn yes_dir(&self) -> PathBuf {
        self.output_dir.join("yes")
    }

    pub fn no_dir(&self) -> PathBuf {
        self.output_dir.join("no")
    }

    /// Where a file labeled with `decision` is written
    pub fn destination(&self, decision: Decision, file_name: &str) -> Option<PathBuf> {
        decision
            .subdir()
            .map(|sub| self.output_dir.join(sub).join(file_name))
    }

    pub fn check_source(&self) -> Result<()> {
        if !self.source_dir.is_dir() {
            return Err(LabelError::MissingSource(self.source_dir.clone()));
        }
        Ok(())
    }

    /// Create both destination folders
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(self.yes_dir())?;
        std::fs::create_dir_all(self.no_dir())?;
        Ok(())
    }

    /// Names of files already in either destination, sorted
    pub fn labeled_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = list_json(&self.yes_dir())?
            .into_iter()
            .chain(list_json(&self.no_dir())?)
            .filter_map(|p| file_name(&p))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Source files still to present, after the resume cursor
    pub fn pending(&self) -> Result<Pending> {
        let files = list_json(&self.source_dir)?;
        let total = files.len();

        let start = match self.labeled_names()?.pop() {
            Some(last) => {
                let idx = files
                    .iter()
                    .position(|p| file_name(p).as_deref() == Some(last.as_str()))
                    .ok_or(LabelError::CursorNotFound(last))?;
                idx + 1
            }
            None => 0,
        };

        Ok(Pending {
            files: files[start..].to_vec(),
            total,
            skipped: start,
        })
    }
}

/// Files left to label in this run
#[derive(Debug, Clone)]
pub struct Pending {
    pub files: Vec<PathBuf>,
    /// Number of files in the source directory
    pub total: usize,
    /// Files before the resume cursor
    pub skipped: usize,
}

/// What happened during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub already_labeled: usize,
    /// File names shown to the user, in order
    pub presented: Vec<String>,
    pub yes: usize,
    pub no: usize,
    pub skipped: usize,
}

/// List `*.json` files in `dir`, sorted by name
pub fn list_json(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.json",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by_key(|p| file_name(p));
    Ok(files)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Label one category, opening the viewer only once the source folder is known to exist
pub fn label_category<V, F>(config: &AppConfig, category: Category, open_viewer: F) -> Result<RunSummary>
where
    V: Viewer,
    F: FnOnce() -> Result<V>,
{
    Workspace::new(config, category).check_source()?;
    Labeler::new(config, category, open_viewer()?).run()
}

/// Drives the present → decide → persist loop for one category
pub struct Labeler<V: Viewer> {
    workspace: Workspace,
    viewer: V,
    journal: Option<LabelJournal>,
    export: Option<(PathBuf, RenderOptions)>,
}

impl<V: Viewer> Labeler<V> {
    pub fn new(config: &AppConfig, category: Category, viewer: V) -> Self {
        Self {
            workspace: Workspace::new(config, category),
            viewer,
            journal: config.journal_path(category).map(LabelJournal::new),
            export: config
                .export_dir(category)
                .map(|dir| (dir, RenderOptions::from(&config.view))),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Label every pending file in order
    pub fn run(&mut self) -> Result<RunSummary> {
        self.workspace.check_source()?;
        self.workspace.prepare()?;

        let pending = self.workspace.pending()?;
        let mut summary = RunSummary {
            total: pending.total,
            already_labeled: pending.skipped,
            ..RunSummary::default()
        };

        match pending.files.first() {
            Some(first) => info!("Starting at file {}", first.display()),
            None => {
                info!("All {} {} files are labeled", pending.total, self.workspace.category);
                return Ok(summary);
            }
        }

        for (i, path) in pending.files.iter().enumerate() {
            let name = file_name(path).unwrap_or_default();
            let decision = self.process(path, &name, i + pending.skipped)?;
            summary.presented.push(name);
            match decision {
                Decision::Yes => summary.yes += 1,
                Decision::No => summary.no += 1,
                Decision::Undecided => summary.skipped += 1,
            }
        }

        Ok(summary)
    }

    fn process(&mut self, path: &Path, name: &str, index: usize) -> Result<Decision> {
        let task = TaskRecord::load(path)?;
        let figure = Figure::from_task(name, index, &task);

        if let Some((dir, options)) = &self.export {
            let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
            render::export_png(&figure, options, &dir.join(format!("{}.png", stem)))?;
        }

        let key = self.viewer.present(&figure);
        let closed = self.viewer.close();
        let key = key?;
        closed?;
        let decision = Decision::from_key(&key);

        self.persist(&task, name, decision)?;
        Ok(decision)
    }

    fn persist(&self, task: &TaskRecord, name: &str, decision: Decision) -> Result<()> {
        let Some(destination) = self.workspace.destination(decision, name) else {
            debug!("No decision for {}, leaving it unlabeled", name);
            return Ok(());
        };

        task.save(&destination)?;
        info!("{} -> {}", name, destination.display());

        if let Some(journal) = &self.journal {
            let label = if decision == Decision::Yes { Label::Yes } else { Label::No };
            journal.append(&create_entry(self.workspace.category, name.to_string(), label, destination))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Grid;
    use crate::viewer::KeyPress;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Viewer that answers with scripted keys and remembers what it showed
    #[derive(Default)]
    struct ScriptedViewer {
        keys: VecDeque<KeyPress>,
        shown: Vec<Figure>,
        closed: usize,
    }

    impl ScriptedViewer {
        fn with_keys(keys: &[char]) -> Self {
            Self {
                keys: keys.iter().map(|&c| KeyPress::Char(c)).collect(),
                ..Self::default()
            }
        }
    }

    impl Viewer for ScriptedViewer {
        fn present(&mut self, figure: &Figure) -> Result<KeyPress> {
            self.shown.push(figure.clone());
            Ok(self.keys.pop_front().unwrap_or(KeyPress::Dismissed))
        }

        fn close(&mut self) -> Result<()> {
            self.closed += 1;
            Ok(())
        }
    }

    const TASK: &str = r#"{"train": [{"input": [[1, 0]], "output": [[0, 1]]}],
                          "test": [{"input": [[0, 1], [2, 0]], "output": [[3, 3], [0, 0]]}]}"#;

    struct Fixture {
        dir: tempfile::TempDir,
        config: AppConfig,
    }

    impl Fixture {
        fn new(names: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let data = dir.path().join("data");
            std::fs::create_dir_all(data.join("training")).unwrap();
            for name in names {
                std::fs::write(data.join("training").join(name), TASK).unwrap();
            }
            let config = AppConfig {
                data_root: data.to_string_lossy().into_owned(),
                ..AppConfig::default()
            };
            Self { dir, config }
        }

        fn output(&self) -> PathBuf {
            self.dir.path().join("b&w").join("training")
        }

        fn labeled(&self, sub: &str) -> Vec<String> {
            list_json(&self.output().join(sub))
                .unwrap()
                .iter()
                .filter_map(|p| file_name(p))
                .collect()
        }

        fn run(&self, keys: &[char]) -> Result<(RunSummary, ScriptedViewer)> {
            let mut labeler = Labeler::new(&self.config, Category::Training, ScriptedViewer::with_keys(keys));
            let summary = labeler.run()?;
            Ok((summary, labeler.viewer))
        }
    }

    #[test]
    fn test_full_run_partitions_sources() {
        let fx = Fixture::new(&["c.json", "a.json", "b.json", "d.json"]);
        let (summary, viewer) = fx.run(&['y', 'n', 'n', 'y']).unwrap();

        assert_eq!(summary.presented, ["a.json", "b.json", "c.json", "d.json"]);
        assert_eq!((summary.yes, summary.no, summary.skipped), (2, 2, 0));
        assert_eq!(viewer.closed, 4);

        let yes = fx.labeled("yes");
        let no = fx.labeled("no");
        assert_eq!(yes, ["a.json", "d.json"]);
        assert_eq!(no, ["b.json", "c.json"]);
        assert!(yes.iter().all(|n| !no.contains(n)));
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let fx = Fixture::new(&["a.json", "b.json"]);
        fx.run(&['y', 'n']).unwrap();
        let journal = LabelJournal::new(fx.output().join("labels.jsonl"));
        assert_eq!(journal.read_all().unwrap().len(), 2);

        let (summary, viewer) = fx.run(&['y', 'y']).unwrap();
        assert!(summary.presented.is_empty());
        assert!(viewer.shown.is_empty());
        assert_eq!(summary.already_labeled, 2);
        assert_eq!(journal.read_all().unwrap().len(), 2);
        assert_eq!(fx.labeled("yes"), ["a.json"]);
    }

    #[test]
    fn test_resume_after_last_labeled() {
        let fx = Fixture::new(&["a.json", "b.json", "c.json", "d.json"]);
        let ws = Workspace::new(&fx.config, Category::Training);
        ws.prepare().unwrap();
        std::fs::write(ws.yes_dir().join("a.json"), TASK).unwrap();
        std::fs::write(ws.no_dir().join("b.json"), TASK).unwrap();

        let (summary, viewer) = fx.run(&['q', 'q']).unwrap();
        assert_eq!(summary.presented, ["c.json", "d.json"]);
        assert_eq!(viewer.shown[0].title, "c.json - 2");
        assert_eq!(viewer.shown[1].title, "d.json - 3");
    }

    #[test]
    fn test_out_of_order_label_hides_earlier_files() {
        let fx = Fixture::new(&["a.json", "b.json", "c.json"]);
        let ws = Workspace::new(&fx.config, Category::Training);
        ws.prepare().unwrap();
        std::fs::write(ws.no_dir().join("b.json"), TASK).unwrap();

        let pending = ws.pending().unwrap();
        assert_eq!(pending.skipped, 2);
        assert_eq!(pending.files.len(), 1);
    }

    #[test]
    fn test_cursor_missing_from_source() {
        let fx = Fixture::new(&["a.json"]);
        let ws = Workspace::new(&fx.config, Category::Training);
        ws.prepare().unwrap();
        std::fs::write(ws.yes_dir().join("zzz.json"), TASK).unwrap();

        match fx.run(&[]) {
            Err(LabelError::CursorNotFound(name)) => assert_eq!(name, "zzz.json"),
            other => panic!("Expected cursor error, got {:?}", other.map(|r| r.0)),
        }
    }

    #[test]
    fn test_copied_record_round_trips() {
        let fx = Fixture::new(&["a.json"]);
        fx.run(&['y']).unwrap();

        let source = TaskRecord::load(&fx.config.source_dir(Category::Training).join("a.json")).unwrap();
        let copy = TaskRecord::load(&fx.output().join("yes").join("a.json")).unwrap();
        assert_eq!(copy.train, source.train);
        assert_eq!(copy.test, source.test);
        // persisted test grids keep their original values
        assert_eq!(copy.test[0].input, Grid(vec![vec![0, 1], vec![2, 0]]));
    }

    #[test]
    fn test_viewer_sees_highlighted_test_grid() {
        let fx = Fixture::new(&["a.json"]);
        let (_, viewer) = fx.run(&['n']).unwrap();
        let figure = &viewer.shown[0];
        assert_eq!(figure.rows[0][1].title, "Test Input 0");
        assert_eq!(figure.rows[0][1].grid, Grid(vec![vec![0, 10], vec![10, 0]]));
    }

    #[test]
    fn test_other_key_leaves_file_unlabeled() {
        let fx = Fixture::new(&["d.json", "e.json", "f.json"]);
        let ws = Workspace::new(&fx.config, Category::Training);
        ws.prepare().unwrap();
        std::fs::write(ws.yes_dir().join("d.json"), TASK).unwrap();

        let (summary, _) = fx.run(&['q', 'y']).unwrap();
        assert_eq!(summary.presented, ["e.json", "f.json"]);
        assert_eq!(summary.skipped, 1);
        assert!(!ws.yes_dir().join("e.json").exists());
        assert!(!ws.no_dir().join("e.json").exists());

        // f.json is now the cursor, so e.json stays behind it
        assert!(ws.pending().unwrap().files.is_empty());
    }

    #[test]
    fn test_skipped_last_file_is_revisited_next_run() {
        let fx = Fixture::new(&["a.json", "b.json"]);
        let (first, _) = fx.run(&['y', 'q']).unwrap();
        assert_eq!(first.presented, ["a.json", "b.json"]);

        let (second, _) = fx.run(&['n']).unwrap();
        assert_eq!(second.presented, ["b.json"]);
        assert_eq!(fx.labeled("no"), ["b.json"]);
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let fx = Fixture::new(&[]);
        let mut labeler = Labeler::new(&fx.config, Category::Evaluation, ScriptedViewer::default());

        assert!(matches!(labeler.run(), Err(LabelError::MissingSource(_))));
        assert!(!fx.dir.path().join("b&w").exists());
    }

    #[test]
    fn test_malformed_record_aborts_run() {
        let fx = Fixture::new(&["a.json", "c.json"]);
        std::fs::write(fx.config.source_dir(Category::Training).join("b.json"), "{\"train\": 3}").unwrap();

        let mut labeler = Labeler::new(&fx.config, Category::Training, ScriptedViewer::with_keys(&['y', 'y', 'y']));
        assert!(matches!(labeler.run(), Err(LabelError::Parse { .. })));
        assert_eq!(fx.labeled("yes"), ["a.json"]);
    }

    #[test]
    fn test_export_writes_png_per_presented_file() {
        let mut fx = Fixture::new(&["a.json", "b.json"]);
        let export = fx.dir.path().join("figures");
        fx.config.view.export_dir = Some(export.to_string_lossy().into_owned());

        fx.run(&['y', 'q']).unwrap();
        assert!(export.join("training").join("a.png").is_file());
        assert!(export.join("training").join("b.png").is_file());
    }

    #[test]
    fn test_missing_source_is_reported_before_opening_viewer() {
        let fx = Fixture::new(&[]);
        let result = label_category(&fx.config, Category::Evaluation, || -> Result<ScriptedViewer> {
            Err(LabelError::NotInteractive)
        });
        assert!(matches!(result, Err(LabelError::MissingSource(_))));

        let summary = label_category(&fx.config, Category::Training, || Ok(ScriptedViewer::default())).unwrap();
        assert_eq!(summary.total, 0);
    }

    /// Viewer whose present and close both fail
    struct FailingViewer;

    impl Viewer for FailingViewer {
        fn present(&mut self, _figure: &Figure) -> Result<KeyPress> {
            Err(LabelError::Interrupted)
        }

        fn close(&mut self) -> Result<()> {
            Err(LabelError::Render("terminal gone".to_string()))
        }
    }

    #[test]
    fn test_present_error_wins_over_close_error() {
        let fx = Fixture::new(&["a.json"]);
        let mut labeler = Labeler::new(&fx.config, Category::Training, FailingViewer);
        assert!(matches!(labeler.run(), Err(LabelError::Interrupted)));
        assert!(fx.labeled("yes").is_empty());
    }

    #[test]
    fn test_undone_label_is_presented_again() {
        let fx = Fixture::new(&["a.json", "b.json"]);
        fx.run(&['y', 'y']).unwrap();
        let journal = LabelJournal::new(fx.output().join("labels.jsonl"));

        let undone = crate::history::undo_latest(&journal, 1, false).unwrap();
        assert_eq!(undone[0].entry.file_name, "b.json");
        assert_eq!(fx.labeled("yes"), ["a.json"]);
        let entries = journal.read_all().unwrap();
        assert!(!entries[0].undone);
        assert!(entries[1].undone);

        let (summary, _) = fx.run(&['n']).unwrap();
        assert_eq!(summary.presented, ["b.json"]);
        assert_eq!(fx.labeled("no"), ["b.json"]);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_line_names_first_pending_file() {
        let fx = Fixture::new(&["a.json", "b.json", "c.json", "d.json"]);
        let ws = Workspace::new(&fx.config, Category::Training);
        ws.prepare().unwrap();
        std::fs::write(ws.yes_dir().join("b.json"), TASK).unwrap();

        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, || fx.run(&['q', 'q'])).unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let expected = format!("Starting at file {}", ws.source_dir.join("c.json").display());
        assert_eq!(output.matches(&expected).count(), 1);
    }
}
