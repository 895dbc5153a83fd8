use crate::error::DcmTagsError;
use std::path::{Path, PathBuf};

/// Outcome of processing a single file within a batch
#[derive(Debug)]
pub enum FileStatus {
    /// All mutations applied and the file was rewritten
    Success,
    /// The file was left untouched
    Failed(DcmTagsError),
}

/// Per-file record of a batch run
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn success(path: PathBuf) -> Self {
        Self {
            path,
            status: FileStatus::Success,
        }
    }

    pub fn failed(path: PathBuf, error: DcmTagsError) -> Self {
        Self {
            path,
            status: FileStatus::Failed(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Success)
    }
}

/// Accumulated outcomes of a batch traversal
///
/// A batch never stops at the first failure; the caller decides how to
/// surface failures via [`had_failures`](Self::had_failures) and the
/// counts.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file outcome
    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of files processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of files rewritten
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of files left untouched because of an error
    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    /// Whether any file failed
    pub fn had_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    /// Iterates over failed files and their errors
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &DcmTagsError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Failed(e) => Some((o.path.as_path(), e)),
            FileStatus::Success => None,
        })
    }

    /// Iterates over rewritten files
    pub fn successes(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.path.as_path())
    }
}
