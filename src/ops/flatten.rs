use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::ops::plan::{ActionKind, Plan, PlannedAction};
use crate::ops::OperationMode;
use crate::utils::path::{CollisionResolver, PathSanitizer};
use crate::utils::protect::ProtectedPrefixSet;
use crate::AudioFileRef;

pub const SKIP_ALREADY_MATCHING: &str = "already matching";
pub const SKIP_DIR_HOLDS_AUDIO: &str = "directory still holds audio";
pub const SKIP_PROTECTED: &str = "protected directory";

/// Pulls every audio file under `root` up into `root` itself.
///
/// Phase A renames files already at root level to their title-based name.
/// Phase B moves deeper files up, titled name when tags exist, original
/// filename otherwise. Phase C, only when `cleanup` is set, deletes the
/// subdirectories the plan leaves without audio, deepest first, honoring
/// the protected set. `extensions` is the set the scan used; the executor
/// re-checks directory deletes against it.
pub fn plan(
    root: &Path,
    files: &[AudioFileRef],
    protected: &ProtectedPrefixSet,
    cleanup: bool,
    extensions: &[String],
) -> Plan {
    let sanitizer = PathSanitizer::new();
    let mut resolver = CollisionResolver::new();

    let mut plan = Plan::new(OperationMode::FlattenToRoot);
    plan.scanned = files.len();
    plan.audio_extensions = extensions.iter().map(|e| e.to_lowercase()).collect();

    // Directories that will still hold an audio file once the plan runs.
    let mut kept_dirs: HashSet<PathBuf> = HashSet::new();
    let keep_dir = |dir: &Path, kept: &mut HashSet<PathBuf>| {
        let mut current = dir.to_path_buf();
        while current != root && current.starts_with(root) {
            kept.insert(current.clone());
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }
    };

    // Phase A: title-based renames of files already in the root.
    for file in files.iter().filter(|f| f.path.parent() == Some(root)) {
        let desired = sanitizer.safe_name(&file.title_display, &file.extension);
        if desired == file.file_name() {
            plan.record_skip(SKIP_ALREADY_MATCHING);
            continue;
        }
        let dst = resolver.unique_path(root, &desired);
        plan.push(PlannedAction::new(
            ActionKind::Rename {
                src: file.path.clone(),
                dst,
            },
            format!("rename to title '{}'", file.title_display),
        ));
    }

    // Phase B: move everything deeper up into the root.
    for file in files.iter().filter(|f| f.path.parent() != Some(root)) {
        let name = match &file.title_raw {
            Some(title) => sanitizer.safe_name(title, &file.extension),
            None => file.file_name(),
        };
        let dst = resolver.unique_path(root, &name);
        plan.push(PlannedAction::new(
            ActionKind::Move {
                src: file.path.clone(),
                dst,
            },
            "flatten into root",
        ));
    }

    // Phase C: prune directories left without audio.
    if cleanup {
        // A directory survives only if the plan still leaves an audio file
        // in or under it, or a protected rule shields it.
        for file in files {
            if let Some(dir) = planned_final_dir(&plan, file) {
                if dir != root {
                    keep_dir(&dir, &mut kept_dirs);
                }
            }
        }

        let mut dirs: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.path().to_path_buf())
            .collect();
        // Deepest first, so emptied parents can fall in the same pass.
        dirs.sort_by(|a, b| {
            b.components()
                .count()
                .cmp(&a.components().count())
                .then_with(|| a.cmp(b))
        });

        for dir in dirs {
            if kept_dirs.contains(&dir) {
                plan.record_skip(SKIP_DIR_HOLDS_AUDIO);
                continue;
            }
            if protected.is_protected(&dir) || protected.has_protected_descendant(&dir) {
                plan.record_skip(SKIP_PROTECTED);
                continue;
            }
            plan.push(PlannedAction::new(
                ActionKind::Delete { path: dir },
                "no audio left after flatten",
            ));
        }
    }

    plan
}

/// Where the plan leaves this file: the destination directory of its move
/// or rename, or its current directory when no action touches it.
fn planned_final_dir(plan: &Plan, file: &AudioFileRef) -> Option<PathBuf> {
    for action in &plan.actions {
        if action.kind.source() == file.path {
            return action
                .kind
                .destination()
                .and_then(Path::parent)
                .map(Path::to_path_buf);
        }
    }
    file.path.parent().map(Path::to_path_buf)
}
