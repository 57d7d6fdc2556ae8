use clap::Parser;
use std::process::ExitCode;

use audio_organizer::audio::scanner::{default_extension_list, DEFAULT_EXTENSIONS};
use audio_organizer::cli::commands::Cli;
use audio_organizer::cli::prompt::Prompter;
use audio_organizer::ops::{self, OperationMode};
use audio_organizer::{
    ConsoleReporter, NullProbe, OrganizeError, ProtectedPrefixSet, Reporter, Result, Scanner,
    SymphoniaProbe,
};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut prompter = Prompter::stdin();
    let reporter = Reporter::new();
    let console = ConsoleReporter::new();

    let outcome = match cli.operation {
        Some(choice) => run_operation(
            choice.into(),
            &mut prompter,
            &reporter,
            &console,
            cli.dry_run,
        ),
        None => menu_loop(&mut prompter, &reporter, &console, cli.dry_run),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(OrganizeError::InputClosed) => {
            eprintln!("Input closed unexpectedly.");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn menu_loop(
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    loop {
        println!("\n=== Audio library organizer ===");
        println!("1) Deduplicate by title (move one copy of each into a new folder)");
        println!("2) Rename files to their metadata title");
        println!("3) Flatten a library into its root folder");
        println!("4) Move each file into its own folder");
        println!("5) Prune mp3 files shadowed by m4a/m4b/flac");
        println!("6) Quit");

        let choice = prompter.ask("Select an option: ")?;
        let mode = match choice.as_str() {
            "1" => OperationMode::DedupeMove,
            "2" => OperationMode::RenameToTitle,
            "3" => OperationMode::FlattenToRoot,
            "4" => OperationMode::PromoteToFolder,
            "5" => OperationMode::FormatPrune,
            "6" | "q" | "quit" => return Ok(()),
            other => {
                println!("Unknown option: {}", other);
                continue;
            }
        };

        run_operation(mode, prompter, reporter, console, force_dry_run)?;
    }
}

fn run_operation(
    mode: OperationMode,
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    match mode {
        OperationMode::DedupeMove => run_dedupe(prompter, reporter, console, force_dry_run),
        OperationMode::RenameToTitle => run_rename(prompter, reporter, console, force_dry_run),
        OperationMode::FlattenToRoot => run_flatten(prompter, reporter, console, force_dry_run),
        OperationMode::PromoteToFolder => run_promote(prompter, reporter, console, force_dry_run),
        OperationMode::FormatPrune => run_prune(prompter, reporter, console, force_dry_run),
    }
}

fn ask_dry_run(prompter: &mut Prompter, force: bool) -> Result<bool> {
    if force {
        println!("Dry run forced from the command line.");
        return Ok(true);
    }
    prompter.ask_yes_no("Dry run (report only, change nothing)? [y/N]: ", false)
}

fn run_dedupe(
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    let roots = prompter.ask_paths("Directories to scan (comma-separated): ")?;
    let output = prompter.ask_path("Destination folder for the kept files: ")?;
    let recursive = prompter.ask_yes_no("Scan subdirectories too? [Y/n]: ", true)?;
    let extensions = prompter.ask_extensions(
        "Extensions (comma-separated, empty for defaults): ",
        DEFAULT_EXTENSIONS,
    )?;
    let dry_run = ask_dry_run(prompter, force_dry_run)?;

    println!("Scanning...");
    let probe = SymphoniaProbe::new();
    let files = Scanner::new(&extensions, recursive).scan(&roots, &probe)?;

    let plan = ops::dedupe::plan(&files, &output);
    if let Some((plan, summary)) = ops::drive(plan, prompter, reporter, console, dry_run)? {
        if !summary.dry_run && summary.executed > 0 {
            let report_path = output.join("duplicate_report.csv");
            match reporter.write_csv_report(&plan, &report_path) {
                Ok(()) => println!("Report saved to {}", report_path.display()),
                Err(e) => eprintln!("Could not write report: {}", e),
            }
        }
    }
    Ok(())
}

fn run_rename(
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    let root = prompter.ask_path("Directory to rename in: ")?;
    let recursive = prompter.ask_yes_no("Include subdirectories? [Y/n]: ", true)?;
    let dry_run = ask_dry_run(prompter, force_dry_run)?;

    println!("Scanning...");
    let probe = SymphoniaProbe::new();
    let files = Scanner::with_default_extensions(recursive).scan(&[root], &probe)?;

    let plan = ops::rename::plan(&files);
    ops::drive(plan, prompter, reporter, console, dry_run)?;
    Ok(())
}

fn run_flatten(
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    let root = prompter.ask_path("Root folder to flatten into: ")?;
    let cleanup = prompter.ask_yes_no("Delete emptied subdirectories afterwards? [y/N]: ", false)?;
    let mut protected = ProtectedPrefixSet::new(&root);
    if cleanup {
        let prefixes = prompter
            .ask_optional_paths("Subdirectories to never delete (comma-separated, empty for none): ")?;
        for prefix in prefixes {
            protected.add_prefix(prefix);
        }
    }
    let dry_run = ask_dry_run(prompter, force_dry_run)?;

    println!("Scanning...");
    let probe = SymphoniaProbe::new();
    let extensions = default_extension_list();
    let files = Scanner::new(&extensions, true).scan(&[root.clone()], &probe)?;

    let plan = ops::flatten::plan(&root, &files, &protected, cleanup, &extensions);
    ops::drive(plan, prompter, reporter, console, dry_run)?;
    Ok(())
}

fn run_promote(
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    let dir = prompter.ask_path("Directory with loose files: ")?;
    let dry_run = ask_dry_run(prompter, force_dry_run)?;

    println!("Scanning...");
    let files = Scanner::with_default_extensions(false).scan(&[dir.clone()], &NullProbe)?;

    let plan = ops::promote::plan(&dir, &files);
    ops::drive(plan, prompter, reporter, console, dry_run)?;
    Ok(())
}

fn run_prune(
    prompter: &mut Prompter,
    reporter: &Reporter,
    console: &ConsoleReporter,
    force_dry_run: bool,
) -> Result<()> {
    let root = prompter.ask_path("Root folder to prune: ")?;
    let dry_run = ask_dry_run(prompter, force_dry_run)?;

    println!("Scanning...");
    let files = Scanner::new(&ops::prune::scan_extensions(), true).scan(&[root], &NullProbe)?;

    let plan = ops::prune::plan(&files);
    ops::drive(plan, prompter, reporter, console, dry_run)?;
    Ok(())
}
