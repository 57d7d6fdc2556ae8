use std::path::Path;

use crate::ops::grouping::Grouper;
use crate::ops::plan::{ActionKind, Plan, PlannedAction};
use crate::ops::OperationMode;
use crate::utils::path::{CollisionResolver, PathSanitizer};
use crate::AudioFileRef;

const GROUP_SAMPLE_LIMIT: usize = 10;

/// One Move per title group: the kept representative goes into the output
/// directory under a sanitized, collision-resolved name. Non-kept duplicates
/// stay where they are; this operation never deletes anything.
pub fn plan(files: &[AudioFileRef], output_dir: &Path) -> Plan {
    let grouping = Grouper::new().group(files);
    let sanitizer = PathSanitizer::new();
    let mut resolver = CollisionResolver::new();

    let mut plan = Plan::new(OperationMode::DedupeMove);
    plan.scanned = files.len();

    for group in grouping.groups.values() {
        let keep = group.keep();
        let name = sanitizer.safe_name(&keep.title_display, &keep.extension);
        let dst = resolver.unique_path(output_dir, &name);
        plan.push(PlannedAction::new(
            ActionKind::Move {
                src: keep.path.clone(),
                dst,
            },
            format!("kept for title '{}'", group.key),
        ));
    }

    let duplicate_groups = grouping.duplicate_groups().count();
    plan.note(format!("Unique titles: {}", grouping.groups.len()));
    plan.note(format!("Duplicate groups: {}", duplicate_groups));
    plan.note(format!(
        "Duplicate files left in place: {}",
        grouping.duplicate_file_count()
    ));
    plan.note(format!(
        "Titles taken from filenames: {}",
        grouping.missing_title_count
    ));

    for (index, group) in grouping.duplicate_groups().enumerate() {
        if index == GROUP_SAMPLE_LIMIT {
            plan.note(format!(
                "  ... and {} more duplicate groups",
                duplicate_groups - GROUP_SAMPLE_LIMIT
            ));
            break;
        }
        plan.note(format!(
            "  '{}': keeping {}, {} duplicate(s) untouched",
            group.key,
            group.keep().file_name(),
            group.members.len() - 1
        ));
    }

    plan
}
