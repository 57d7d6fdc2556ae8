use std::collections::BTreeMap;
use regex::Regex;

use crate::AudioFileRef;

/// Files sharing one canonical title key. Members keep scan order
/// (sorted by path), so the group is never empty and never reordered.
#[derive(Debug, Clone)]
pub struct TitleGroup {
    pub key: String,
    pub members: Vec<AudioFileRef>,
}

impl TitleGroup {
    /// The one representative to keep. Single rule for every operation:
    /// higher bitrate wins, then larger file, then smallest path.
    pub fn keep(&self) -> &AudioFileRef {
        let mut best = &self.members[0];
        for candidate in &self.members[1..] {
            if Self::better(candidate, best) {
                best = candidate;
            }
        }
        best
    }

    fn better(a: &AudioFileRef, b: &AudioFileRef) -> bool {
        if let (Some(qa), Some(qb)) = (a.bitrate, b.bitrate) {
            if qa != qb {
                return qa > qb;
            }
        }
        if a.size_bytes != b.size_bytes {
            return a.size_bytes > b.size_bytes;
        }
        a.path < b.path
    }
}

#[derive(Debug)]
pub struct Grouping {
    pub groups: BTreeMap<String, TitleGroup>,
    pub missing_title_count: usize,
}

impl Grouping {
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &TitleGroup> {
        self.groups.values().filter(|g| g.members.len() > 1)
    }

    pub fn duplicate_file_count(&self) -> usize {
        self.groups.values().map(|g| g.members.len() - 1).sum()
    }
}

/// Buckets scanned files by canonicalized display title. Pure; never
/// touches the filesystem.
pub struct Grouper {
    whitespace: Regex,
}

impl Grouper {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Lower-cased, whitespace-collapsed form of a display title.
    pub fn canonical_key(&self, title: &str) -> String {
        self.whitespace
            .replace_all(title.trim(), " ")
            .to_lowercase()
    }

    pub fn group(&self, files: &[AudioFileRef]) -> Grouping {
        let mut groups: BTreeMap<String, TitleGroup> = BTreeMap::new();
        let mut missing_title_count = 0;

        for file in files {
            if file.title_is_fallback() {
                missing_title_count += 1;
            }
            let key = self.canonical_key(&file.title_display);
            groups
                .entry(key.clone())
                .or_insert_with(|| TitleGroup {
                    key,
                    members: Vec::new(),
                })
                .members
                .push(file.clone());
        }

        Grouping {
            groups,
            missing_title_count,
        }
    }
}

impl Default for Grouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn file(path: &str, title: Option<&str>, size: u64, bitrate: Option<u32>) -> AudioFileRef {
        let path = PathBuf::from(path);
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        AudioFileRef {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default(),
            title_display: title.map(str::to_string).unwrap_or(stem),
            title_raw: title.map(str::to_string),
            size_bytes: size,
            bitrate,
            path,
        }
    }

    #[test]
    fn canonical_key_normalizes_case_and_whitespace() {
        let grouper = Grouper::new();
        assert_eq!(grouper.canonical_key("  The   DUNE \t Saga "), "the dune saga");
    }

    #[test]
    fn every_file_lands_in_exactly_one_group() {
        let grouper = Grouper::new();
        let files = vec![
            file("/a/one.mp3", Some("Dune"), 10, None),
            file("/a/two.mp3", Some("dune"), 20, None),
            file("/a/three.mp3", Some("Hyperion"), 5, None),
            file("/a/four.mp3", None, 7, None),
        ];

        let grouping = grouper.group(&files);
        let member_total: usize = grouping.groups.values().map(|g| g.members.len()).sum();
        assert_eq!(member_total, files.len());
        assert_eq!(grouping.groups.len(), 3);
        assert_eq!(grouping.missing_title_count, 1);
    }

    #[test]
    fn untitled_file_forms_singleton_group_keyed_by_stem() {
        let grouper = Grouper::new();
        let files = vec![file("/a/Mystery Track.mp3", None, 1, None)];
        let grouping = grouper.group(&files);
        assert!(grouping.groups.contains_key("mystery track"));
    }

    #[test]
    fn keep_prefers_higher_bitrate_then_size_then_path() {
        let by_bitrate = TitleGroup {
            key: "t".into(),
            members: vec![
                file("/a/low.mp3", Some("T"), 9000, Some(128)),
                file("/a/high.flac", Some("T"), 100, Some(900)),
            ],
        };
        assert_eq!(by_bitrate.keep().path, PathBuf::from("/a/high.flac"));

        let by_size = TitleGroup {
            key: "t".into(),
            members: vec![
                file("/a/small.mp3", Some("T"), 1000, None),
                file("/a/big.m4a", Some("T"), 4000, None),
            ],
        };
        assert_eq!(by_size.keep().path, PathBuf::from("/a/big.m4a"));

        let by_path = TitleGroup {
            key: "t".into(),
            members: vec![
                file("/a/b.mp3", Some("T"), 1000, None),
                file("/a/a.mp3", Some("T"), 1000, None),
            ],
        };
        assert_eq!(by_path.keep().path, PathBuf::from("/a/a.mp3"));
    }

    #[test]
    fn keep_selection_is_stable_across_runs() {
        let grouper = Grouper::new();
        let files = vec![
            file("/a/x.mp3", Some("Same"), 100, Some(128)),
            file("/a/y.mp3", Some("Same"), 100, Some(128)),
        ];
        let first = grouper.group(&files).groups["same"].keep().path.clone();
        for _ in 0..10 {
            assert_eq!(grouper.group(&files).groups["same"].keep().path, first);
        }
    }
}
