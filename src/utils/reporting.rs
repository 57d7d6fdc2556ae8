use std::path::Path;
use csv::Writer;
use serde::Serialize;

use crate::ops::plan::{ActionOutcome, Plan, RunSummary};
use crate::Result;

const ACTION_SAMPLE_LIMIT: usize = 20;

/// Observational sink for long-running phases. Dropping events must never
/// affect plan correctness, so implementations take `&self` and return
/// nothing.
pub trait ProgressSink {
    fn progress(&self, phase: &str, current: usize, total: usize, label: &str);
    fn summary(&self, text: &str);
}

/// Sink that swallows everything. Used in tests.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn progress(&self, _phase: &str, _current: usize, _total: usize, _label: &str) {}
    fn summary(&self, _text: &str) {}
}

pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleReporter {
    fn progress(&self, phase: &str, current: usize, total: usize, label: &str) {
        println!("[{}] {}/{}: {}", phase, current, total, label);
    }

    fn summary(&self, text: &str) {
        println!("{}", text);
    }
}

#[derive(Serialize)]
struct ActionRow<'a> {
    action: &'a str,
    source: String,
    destination: String,
    reason: &'a str,
    outcome: String,
}

/// Renders plans and summaries for review, and writes the CSV action report.
/// Consumes structured data only; never drives logic.
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_plan(&self, plan: &Plan) {
        println!("\n=== Plan: {} ===", plan.mode.label());
        println!("Scanned {} audio files", plan.scanned);

        for note in &plan.notes {
            println!("{}", note);
        }

        println!("Planned actions: {}", plan.actions.len());
        for action in plan.actions.iter().take(ACTION_SAMPLE_LIMIT) {
            println!("  {} ({})", action.label(), action.reason);
        }
        if plan.actions.len() > ACTION_SAMPLE_LIMIT {
            println!("  ... and {} more", plan.actions.len() - ACTION_SAMPLE_LIMIT);
        }

        if !plan.skip_counts.is_empty() {
            println!("Skipped while planning:");
            for (reason, count) in &plan.skip_counts {
                println!("  {}: {}", reason, count);
            }
        }
    }

    pub fn print_summary(&self, plan: &Plan, summary: &RunSummary) {
        if summary.dry_run {
            println!("\n=== Dry run complete (no changes made) ===");
        } else {
            println!("\n=== Run complete ===");
        }
        println!("Scanned:  {}", summary.scanned);
        println!("Planned:  {}", summary.planned);
        println!("Executed: {}", summary.executed);
        println!("Skipped:  {}", summary.skipped);
        println!("Errors:   {}", summary.errors);

        if !summary.skip_reasons.is_empty() {
            println!("Skip reasons:");
            for (reason, count) in &summary.skip_reasons {
                println!("  {}: {}", reason, count);
            }
        }

        for action in &plan.actions {
            if let ActionOutcome::Error(cause) = &action.outcome {
                eprintln!("  error: {}: {}", action.label(), cause);
            }
        }
    }

    /// Writes every action with its final outcome, one row per action.
    pub fn write_csv_report(&self, plan: &Plan, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        let mut writer = Writer::from_path(output_path)?;

        for action in &plan.actions {
            let outcome = match &action.outcome {
                ActionOutcome::Pending => "pending".to_string(),
                ActionOutcome::Ok => "ok".to_string(),
                ActionOutcome::Skipped => "skipped".to_string(),
                ActionOutcome::Error(cause) => format!("error: {}", cause),
            };
            writer.serialize(ActionRow {
                action: action.kind.verb(),
                source: action.kind.source().display().to_string(),
                destination: action
                    .kind
                    .destination()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
                reason: &action.reason,
                outcome,
            })?;
        }

        writer.flush()?;
        log::info!("report written to {}", output_path.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
