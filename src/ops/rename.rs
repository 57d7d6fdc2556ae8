use crate::ops::plan::{ActionKind, Plan, PlannedAction};
use crate::ops::OperationMode;
use crate::utils::path::{CollisionResolver, PathSanitizer};
use crate::AudioFileRef;

pub const SKIP_MISSING_TITLE: &str = "missing title";
pub const SKIP_ALREADY_MATCHING: &str = "already matching";

/// Renames each file, in place, to its embedded metadata title. Files
/// without an embedded title are counted and left alone.
pub fn plan(files: &[AudioFileRef]) -> Plan {
    let sanitizer = PathSanitizer::new();
    let mut resolver = CollisionResolver::new();

    let mut plan = Plan::new(OperationMode::RenameToTitle);
    plan.scanned = files.len();

    for file in files {
        let Some(title) = &file.title_raw else {
            plan.record_skip(SKIP_MISSING_TITLE);
            continue;
        };
        let Some(dir) = file.path.parent() else {
            plan.record_skip(SKIP_MISSING_TITLE);
            continue;
        };

        let desired = sanitizer.safe_name(title, &file.extension);
        if desired == file.file_name() {
            plan.record_skip(SKIP_ALREADY_MATCHING);
            continue;
        }

        let dst = resolver.unique_path(dir, &desired);
        plan.push(PlannedAction::new(
            ActionKind::Rename {
                src: file.path.clone(),
                dst,
            },
            format!("title '{}'", title),
        ));
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn file_ref(path: &Path, title: Option<&str>) -> AudioFileRef {
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        AudioFileRef {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default(),
            size_bytes: 1,
            title_display: title.map(str::to_string).unwrap_or(stem),
            title_raw: title.map(str::to_string),
            bitrate: None,
        }
    }

    #[test]
    fn missing_title_and_matching_name_are_skip_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let tagless = dir.path().join("raw_rip.mp3");
        let matching = dir.path().join("Intro.mp3");
        fs::write(&tagless, b"x").unwrap();
        fs::write(&matching, b"x").unwrap();

        let files = vec![
            file_ref(&tagless, None),
            file_ref(&matching, Some("Intro")),
        ];
        let plan = plan(&files);

        assert!(plan.actions.is_empty());
        assert_eq!(plan.skip_counts[SKIP_MISSING_TITLE], 1);
        assert_eq!(plan.skip_counts[SKIP_ALREADY_MATCHING], 1);
    }

    #[test]
    fn same_title_twice_never_plans_identical_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("track01.mp3");
        let b = dir.path().join("track02.mp3");
        fs::write(&a, b"x").unwrap();
        fs::write(&b, b"x").unwrap();

        let files = vec![file_ref(&a, Some("Intro")), file_ref(&b, Some("Intro"))];
        let plan = plan(&files);

        let destinations: Vec<PathBuf> = plan
            .actions
            .iter()
            .filter_map(|a| a.kind.destination().map(Path::to_path_buf))
            .collect();
        assert_eq!(
            destinations,
            vec![
                dir.path().join("Intro.mp3"),
                dir.path().join("Intro-dup1.mp3"),
            ]
        );
    }

    #[test]
    fn rename_stays_in_the_source_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("x.mp3");
        fs::write(&src, b"x").unwrap();

        let plan = plan(&[file_ref(&src, Some("Proper Name"))]);
        assert_eq!(
            plan.actions[0].kind.destination().unwrap().parent().unwrap(),
            dir.path()
        );
    }
}
