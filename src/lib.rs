use std::path::PathBuf;
use serde::Serialize;

pub mod audio;
pub mod cli;
pub mod ops;
pub mod utils;

/// One scanned audio file. Built once during scanning, read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AudioFileRef {
    pub path: PathBuf,
    pub extension: String,
    pub size_bytes: u64,
    pub title_raw: Option<String>,
    pub title_display: String,
    pub bitrate: Option<u32>,
}

impl AudioFileRef {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// True when the display title came from the filename, not from tags.
    pub fn title_is_fallback(&self) -> bool {
        self.title_raw.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    #[error("invalid root directory: {}", .0.display())]
    InvalidRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("input stream closed")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, OrganizeError>;

// Re-exports for convenience
pub use audio::metadata::{MetadataProbe, NullProbe, SymphoniaProbe};
pub use audio::scanner::Scanner;
pub use ops::execute::Executor;
pub use ops::grouping::{Grouper, TitleGroup};
pub use ops::plan::{ActionKind, ActionOutcome, Plan, PlannedAction, RunSummary};
pub use ops::{OperationMode, RunState};
pub use utils::path::{CollisionResolver, PathSanitizer};
pub use utils::protect::ProtectedPrefixSet;
pub use utils::reporting::{ConsoleReporter, ProgressSink, Reporter};
