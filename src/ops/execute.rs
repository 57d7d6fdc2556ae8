use std::fs;
use std::path::Path;

use crate::audio::scanner::DEFAULT_EXTENSIONS;
use crate::ops::plan::{ActionKind, ActionOutcome, Plan, RunSummary};
use crate::utils::reporting::ProgressSink;

pub const SKIP_DIR_STILL_HOLDS_AUDIO: &str = "directory still holds audio";

/// Applies a plan in order, one action at a time.
///
/// A failing action is recorded and execution moves on; only the plan itself
/// decides what gets attempted. With `dry_run` the same counters are produced
/// without any filesystem call.
pub struct Executor<'a> {
    progress: &'a dyn ProgressSink,
}

impl<'a> Executor<'a> {
    pub fn new(progress: &'a dyn ProgressSink) -> Self {
        Self { progress }
    }

    pub fn execute(&self, plan: &mut Plan, dry_run: bool) -> RunSummary {
        let total = plan.actions.len();
        let mut executed = 0;
        let mut errors = 0;
        let mut skip_reasons = plan.skip_counts.clone();
        let mut skipped = plan.skipped_total();
        let extensions = if plan.audio_extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
        } else {
            plan.audio_extensions.clone()
        };

        for (index, action) in plan.actions.iter_mut().enumerate() {
            self.progress
                .progress("execute", index + 1, total, &action.label());

            // A no-op move or rename means the file is already where the
            // plan wants it, typically after a partial earlier run.
            if action.kind.destination() == Some(action.kind.source()) {
                action.outcome = ActionOutcome::Skipped;
                *skip_reasons
                    .entry("source and destination identical".to_string())
                    .or_insert(0) += 1;
                skipped += 1;
                continue;
            }

            if dry_run {
                action.outcome = ActionOutcome::Ok;
                executed += 1;
                continue;
            }

            // The plan decided this directory would be empty of audio, but
            // an earlier action may have failed and left a file behind.
            // Re-check at apply time; a recursive delete is irreversible.
            if let ActionKind::Delete { path } = &action.kind {
                if path.is_dir() && dir_holds_audio(path, &extensions) {
                    log::warn!(
                        "not deleting {}: audio still present",
                        path.display()
                    );
                    action.outcome = ActionOutcome::Skipped;
                    *skip_reasons
                        .entry(SKIP_DIR_STILL_HOLDS_AUDIO.to_string())
                        .or_insert(0) += 1;
                    skipped += 1;
                    continue;
                }
            }

            match Self::apply(&action.kind) {
                Ok(()) => {
                    log::debug!("applied: {}", action.label());
                    action.outcome = ActionOutcome::Ok;
                    executed += 1;
                }
                Err(e) => {
                    log::warn!("action failed: {}: {}", action.label(), e);
                    action.outcome = ActionOutcome::Error(e.to_string());
                    errors += 1;
                }
            }
        }

        self.progress.summary(&format!(
            "{} of {} actions applied, {} skipped, {} errors{}",
            executed,
            total,
            skipped,
            errors,
            if dry_run { " (dry run)" } else { "" }
        ));

        RunSummary {
            scanned: plan.scanned,
            planned: total,
            executed,
            skipped,
            errors,
            skip_reasons,
            dry_run,
        }
    }

    fn apply(kind: &ActionKind) -> std::io::Result<()> {
        match kind {
            ActionKind::Move { src, dst } => {
                if let Some(parent) = dst.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::rename(src, dst)
            }
            ActionKind::Rename { src, dst } => fs::rename(src, dst),
            ActionKind::CreateDirAndMove { src, dst_dir, dst } => {
                fs::create_dir_all(dst_dir)?;
                fs::rename(src, dst)
            }
            ActionKind::Delete { path } => Self::delete(path),
        }
    }

    fn delete(path: &Path) -> std::io::Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

fn dir_holds_audio(dir: &Path, extensions: &[String]) -> bool {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .any(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase())
                .is_some_and(|ext| extensions.contains(&ext))
        })
}
