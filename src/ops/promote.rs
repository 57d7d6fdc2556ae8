use std::path::Path;

use crate::ops::plan::{ActionKind, Plan, PlannedAction};
use crate::ops::OperationMode;
use crate::AudioFileRef;

pub const SKIP_NAME_OCCUPIED: &str = "folder name occupied by a file";
pub const SKIP_DESTINATION_EXISTS: &str = "destination already exists";

/// Gives each direct-child audio file its own folder named after the file's
/// stem, keeping the original filename inside. Input comes from a
/// non-recursive scan; filenames only, no metadata.
pub fn plan(dir: &Path, files: &[AudioFileRef]) -> Plan {
    let mut plan = Plan::new(OperationMode::PromoteToFolder);
    plan.scanned = files.len();

    for file in files {
        let Some(stem) = file.path.file_stem() else {
            continue;
        };
        let folder = dir.join(stem);
        if folder.exists() && !folder.is_dir() {
            plan.record_skip(SKIP_NAME_OCCUPIED);
            continue;
        }

        let dst = folder.join(file.file_name());
        if dst.exists() {
            plan.record_skip(SKIP_DESTINATION_EXISTS);
            continue;
        }

        plan.push(PlannedAction::new(
            ActionKind::CreateDirAndMove {
                src: file.path.clone(),
                dst_dir: folder,
                dst,
            },
            "promote into own folder",
        ));
    }

    plan
}
