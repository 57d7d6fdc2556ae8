use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ops::OperationMode;

/// Proposed filesystem mutation. Nothing here touches the disk.
#[derive(Debug, Clone)]
pub enum ActionKind {
    Move { src: PathBuf, dst: PathBuf },
    Rename { src: PathBuf, dst: PathBuf },
    Delete { path: PathBuf },
    CreateDirAndMove { src: PathBuf, dst_dir: PathBuf, dst: PathBuf },
}

impl ActionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Move { .. } => "move",
            ActionKind::Rename { .. } => "rename",
            ActionKind::Delete { .. } => "delete",
            ActionKind::CreateDirAndMove { .. } => "move into new folder",
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            ActionKind::Move { src, .. }
            | ActionKind::Rename { src, .. }
            | ActionKind::CreateDirAndMove { src, .. } => src,
            ActionKind::Delete { path } => path,
        }
    }

    pub fn destination(&self) -> Option<&Path> {
        match self {
            ActionKind::Move { dst, .. }
            | ActionKind::Rename { dst, .. }
            | ActionKind::CreateDirAndMove { dst, .. } => Some(dst),
            ActionKind::Delete { .. } => None,
        }
    }
}

/// Filled in during execution only; plans start out all-Pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Pending,
    Ok,
    Skipped,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct PlannedAction {
    pub kind: ActionKind,
    pub reason: String,
    pub outcome: ActionOutcome,
}

impl PlannedAction {
    pub fn new(kind: ActionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            outcome: ActionOutcome::Pending,
        }
    }

    pub fn label(&self) -> String {
        match self.kind.destination() {
            Some(dst) => format!(
                "{} {} -> {}",
                self.kind.verb(),
                self.kind.source().display(),
                dst.display()
            ),
            None => format!("{} {}", self.kind.verb(), self.kind.source().display()),
        }
    }
}

/// Ordered, side-effect-free list of proposed actions plus the plan-time
/// skip buckets and display notes shown at the confirmation gate.
#[derive(Debug)]
pub struct Plan {
    pub mode: OperationMode,
    pub actions: Vec<PlannedAction>,
    pub skip_counts: BTreeMap<String, usize>,
    pub scanned: usize,
    pub notes: Vec<String>,
    /// Extension set the run scanned with; the executor re-checks
    /// directory deletes against it.
    pub audio_extensions: Vec<String>,
}

impl Plan {
    pub fn new(mode: OperationMode) -> Self {
        Self {
            mode,
            actions: Vec::new(),
            skip_counts: BTreeMap::new(),
            scanned: 0,
            notes: Vec::new(),
            audio_extensions: Vec::new(),
        }
    }

    pub fn push(&mut self, action: PlannedAction) {
        self.actions.push(action);
    }

    pub fn record_skip(&mut self, reason: &str) {
        *self.skip_counts.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    pub fn skipped_total(&self) -> usize {
        self.skip_counts.values().sum()
    }
}

/// Aggregate counters for one run. Built by the executor, then frozen.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub scanned: usize,
    pub planned: usize,
    pub executed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub skip_reasons: BTreeMap<String, usize>,
    pub dry_run: bool,
}
