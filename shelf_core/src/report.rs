//! Per-file outcomes and the run report.

use serde::Serialize;
use std::path::PathBuf;

/// Why a single file could not be moved.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// A file already exists at the computed destination.
    DestinationConflict { destination: PathBuf },
    /// The category value cannot form a path component.
    InvalidCategory { reason: String },
    /// The move (or the read leading up to it) failed.
    Io { reason: String },
}

/// Outcome of processing one discovered file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file was moved to its category container.
    Moved { from: PathBuf, to: PathBuf },
    /// No category line was found; the file was left untouched.
    SkippedNoCategory { path: PathBuf },
    /// The file could not be moved; it was left untouched unless the
    /// underlying I/O failure says otherwise.
    Failed {
        path: PathBuf,
        #[serde(flatten)]
        kind: FailureKind,
    },
}

impl FileOutcome {
    /// Original path of the file this outcome is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            FileOutcome::Moved { from, .. } => from,
            FileOutcome::SkippedNoCategory { path } => path,
            FileOutcome::Failed { path, .. } => path,
        }
    }
}

/// Counts per outcome kind.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Counts {
    pub moved: usize,
    pub skipped_no_category: usize,
    pub failed_conflict: usize,
    pub failed_invalid_category: usize,
    pub failed_io: usize,
}

/// Accumulated result of one reorganize run.
///
/// Outcomes are recorded in processing order. This is the structured
/// replacement for step-by-step progress printing: callers that want
/// progress output subscribe to outcomes after (or during) the run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    outcomes: Vec<FileOutcome>,
}

impl Report {
    /// Record one per-file outcome.
    pub(crate) fn record(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// All outcomes, in processing order.
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Only the failures, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// Tally outcomes per kind.
    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for outcome in &self.outcomes {
            match outcome {
                FileOutcome::Moved { .. } => counts.moved += 1,
                FileOutcome::SkippedNoCategory { .. } => counts.skipped_no_category += 1,
                FileOutcome::Failed { kind, .. } => match kind {
                    FailureKind::DestinationConflict { .. } => counts.failed_conflict += 1,
                    FailureKind::InvalidCategory { .. } => counts.failed_invalid_category += 1,
                    FailureKind::Io { .. } => counts.failed_io += 1,
                },
            }
        }
        counts
    }

    /// True when every discovered file was either moved or skipped.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}
