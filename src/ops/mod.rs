use crate::cli::prompt::Prompter;
use crate::ops::execute::Executor;
use crate::ops::plan::{Plan, RunSummary};
use crate::utils::reporting::{ProgressSink, Reporter};
use crate::Result;

pub mod dedupe;
pub mod execute;
pub mod flatten;
pub mod grouping;
pub mod plan;
pub mod promote;
pub mod prune;
pub mod rename;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    DedupeMove,
    RenameToTitle,
    FlattenToRoot,
    PromoteToFolder,
    FormatPrune,
}

impl OperationMode {
    pub fn label(&self) -> &'static str {
        match self {
            OperationMode::DedupeMove => "deduplicate by title",
            OperationMode::RenameToTitle => "rename to title",
            OperationMode::FlattenToRoot => "flatten into root",
            OperationMode::PromoteToFolder => "move files into own folders",
            OperationMode::FormatPrune => "prune superseded formats",
        }
    }
}

/// Every operation moves through the same states; rejection at the
/// confirmation gate guarantees zero mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Scanning,
    Planned,
    AwaitingConfirmation,
    Aborted,
    DryRunComplete,
    Executing,
    Done,
}

#[derive(Debug)]
pub struct Session {
    mode: OperationMode,
    state: RunState,
}

impl Session {
    pub fn new(mode: OperationMode) -> Self {
        Self {
            mode,
            state: RunState::Scanning,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        log::debug!("{}: {:?} -> {:?}", self.mode.label(), self.state, next);
        self.state = next;
    }
}

/// Shared confirmation-gate driver: show the plan, ask, then execute.
///
/// Returns the plan with filled-in outcomes and the run summary, or `None`
/// when the user aborted or there was nothing to confirm.
pub fn drive(
    mut plan: Plan,
    prompter: &mut Prompter,
    reporter: &Reporter,
    progress: &dyn ProgressSink,
    dry_run: bool,
) -> Result<Option<(Plan, RunSummary)>> {
    let mut session = Session::new(plan.mode);
    session.transition(RunState::Planned);
    reporter.print_plan(&plan);

    if plan.actions.is_empty() {
        let summary = Executor::new(progress).execute(&mut plan, dry_run);
        reporter.print_summary(&plan, &summary);
        session.transition(RunState::Done);
        return Ok(Some((plan, summary)));
    }

    session.transition(RunState::AwaitingConfirmation);
    let prompt = if dry_run {
        "Run this plan as a dry run? [y/N]: "
    } else {
        "Apply these changes? [y/N]: "
    };
    let answer = prompter.ask(prompt)?;
    if !is_affirmative(&answer) {
        session.transition(RunState::Aborted);
        println!("Operation cancelled; nothing was changed.");
        return Ok(None);
    }

    let summary = if dry_run {
        let summary = Executor::new(progress).execute(&mut plan, true);
        session.transition(RunState::DryRunComplete);
        summary
    } else {
        session.transition(RunState::Executing);
        let summary = Executor::new(progress).execute(&mut plan, false);
        session.transition(RunState::Done);
        summary
    };

    reporter.print_summary(&plan, &summary);
    Ok(Some((plan, summary)))
}

fn is_affirmative(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::plan::{ActionKind, PlannedAction};
    use crate::utils::reporting::NullSink;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn only_y_and_yes_are_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("YES"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("sure"));
    }

    #[test]
    fn rejecting_the_gate_changes_nothing_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("track.mp3");
        let dst = dir.path().join("out/track.mp3");
        std::fs::write(&src, b"audio").unwrap();

        let mut plan = Plan::new(OperationMode::DedupeMove);
        plan.scanned = 1;
        plan.push(PlannedAction::new(
            ActionKind::Move {
                src: src.clone(),
                dst: dst.clone(),
            },
            "duplicate of kept copy",
        ));

        let mut prompter = Prompter::from_reader(Cursor::new("n\n"));
        let result = drive(plan, &mut prompter, &Reporter::new(), &NullSink, false).unwrap();

        assert!(result.is_none());
        assert!(src.exists());
        assert!(!dst.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn session_walks_the_expected_states() {
        let mut session = Session::new(OperationMode::FlattenToRoot);
        assert_eq!(session.state(), RunState::Scanning);
        session.transition(RunState::Planned);
        session.transition(RunState::AwaitingConfirmation);
        session.transition(RunState::Aborted);
        assert_eq!(session.state(), RunState::Aborted);
    }
}
