use clap::{Parser, ValueEnum};

use crate::ops::OperationMode;

#[derive(Parser)]
#[command(name = "audio-organizer")]
#[command(version = "1.0")]
#[command(about = "Plan, review and apply safe reorganizations of an audio library", long_about = None)]
pub struct Cli {
    /// Run one operation directly instead of showing the menu
    #[arg(short = 'o', long = "operation", value_enum)]
    pub operation: Option<MenuChoice>,

    /// Plan and report without performing any filesystem change
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MenuChoice {
    /// Find duplicate titles and move one copy of each into a new folder
    Dedupe,
    /// Rename files to their embedded metadata title
    Rename,
    /// Pull every audio file up into the root folder
    Flatten,
    /// Move each file into a folder named after it
    Promote,
    /// Delete mp3 files shadowed by a higher-fidelity sibling
    Prune,
}

impl From<MenuChoice> for OperationMode {
    fn from(choice: MenuChoice) -> Self {
        match choice {
            MenuChoice::Dedupe => OperationMode::DedupeMove,
            MenuChoice::Rename => OperationMode::RenameToTitle,
            MenuChoice::Flatten => OperationMode::FlattenToRoot,
            MenuChoice::Promote => OperationMode::PromoteToFolder,
            MenuChoice::Prune => OperationMode::FormatPrune,
        }
    }
}
