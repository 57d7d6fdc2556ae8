use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ops::plan::{ActionKind, Plan, PlannedAction};
use crate::ops::OperationMode;
use crate::AudioFileRef;

/// The format that loses when a better sibling exists.
pub const BASELINE_EXTENSION: &str = "mp3";
/// Formats that supersede the baseline for the same stem.
pub const PREFERRED_EXTENSIONS: &[&str] = &["m4a", "m4b", "flac"];

/// Extension set a prune scan should use.
pub fn scan_extensions() -> Vec<String> {
    let mut exts = vec![BASELINE_EXTENSION.to_string()];
    exts.extend(PREFERRED_EXTENSIONS.iter().map(|e| (*e).to_string()));
    exts
}

/// Within each directory, a stem that exists in both the baseline format and
/// a higher-fidelity one loses its baseline copy. Pure filename logic; the
/// metadata probe is never consulted.
pub fn plan(files: &[AudioFileRef]) -> Plan {
    let mut plan = Plan::new(OperationMode::FormatPrune);
    plan.scanned = files.len();

    // (directory, lowercased stem) -> members
    let mut by_stem: BTreeMap<(PathBuf, String), Vec<&AudioFileRef>> = BTreeMap::new();
    for file in files {
        let Some(parent) = file.path.parent() else {
            continue;
        };
        let Some(stem) = file.path.file_stem() else {
            continue;
        };
        by_stem
            .entry((parent.to_path_buf(), stem.to_string_lossy().to_lowercase()))
            .or_default()
            .push(file);
    }

    for ((_, stem), members) in &by_stem {
        let superseded_by = members
            .iter()
            .find(|f| PREFERRED_EXTENSIONS.contains(&f.extension.as_str()));
        let Some(winner) = superseded_by else {
            continue;
        };

        for file in members {
            if file.extension == BASELINE_EXTENSION {
                plan.push(PlannedAction::new(
                    ActionKind::Delete {
                        path: file.path.clone(),
                    },
                    format!("'{}' superseded by .{}", stem, winner.extension),
                ));
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::metadata::NullProbe;
    use crate::audio::scanner::Scanner;
    use crate::ops::execute::Executor;
    use crate::utils::reporting::NullSink;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn scan(root: &Path) -> Vec<AudioFileRef> {
        Scanner::new(&scan_extensions(), true)
            .scan(&[root.to_path_buf()], &NullProbe)
            .unwrap()
    }

    #[test]
    fn baseline_with_better_sibling_is_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("book.mp3"), b"x").unwrap();
        fs::write(dir.path().join("book.m4b"), b"x").unwrap();
        fs::write(dir.path().join("solo.mp3"), b"x").unwrap();

        let mut plan = plan(&scan(dir.path()));

        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].kind.source(), dir.path().join("book.mp3"));

        Executor::new(&NullSink).execute(&mut plan, false);
        assert!(!dir.path().join("book.mp3").exists());
        assert!(dir.path().join("book.m4b").exists());
        assert!(dir.path().join("solo.mp3").exists());
    }

    #[test]
    fn same_stem_in_different_directories_does_not_compete() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a/book.mp3"), b"x").unwrap();
        fs::write(dir.path().join("b/book.m4a"), b"x").unwrap();

        let plan = plan(&scan(dir.path()));
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn preferred_formats_never_get_deleted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("book.m4a"), b"x").unwrap();
        fs::write(dir.path().join("book.flac"), b"x").unwrap();

        let plan = plan(&scan(dir.path()));
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn stem_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Book.mp3"), b"x").unwrap();
        fs::write(dir.path().join("book.m4b"), b"x").unwrap();

        let plan = plan(&scan(dir.path()));
        assert_eq!(plan.actions.len(), 1);
    }
}
