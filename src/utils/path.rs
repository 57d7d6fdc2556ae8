use std::collections::HashSet;
use std::path::{Path, PathBuf};
use regex::Regex;

const MAX_STEM_CHARS: usize = 100;
const PLACEHOLDER_STEM: &str = "untitled";

/// Turns an arbitrary title into a safe single path segment.
///
/// Deterministic and idempotent; uniqueness is the resolver's job, not ours.
pub struct PathSanitizer {
    whitespace: Regex,
}

impl PathSanitizer {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    pub fn safe_name(&self, title: &str, ext: &str) -> String {
        format!("{}.{}", self.safe_stem(title), ext)
    }

    pub fn safe_stem(&self, title: &str) -> String {
        let replaced: String = title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        let collapsed = self.whitespace.replace_all(&replaced, " ");
        let stem: String = collapsed.trim().chars().take(MAX_STEM_CHARS).collect();
        // Truncation can expose trailing spaces or dots.
        let stem = stem.trim_end_matches([' ', '.']);

        if stem.is_empty() {
            PLACEHOLDER_STEM.to_string()
        } else {
            stem.to_string()
        }
    }
}

impl Default for PathSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out destination paths that neither exist on disk nor were already
/// promised earlier in the same plan.
///
/// Existence is only checked, never reserved on disk, so a concurrent writer
/// can still race us between planning and execution; that failure surfaces as
/// a per-action error at apply time.
pub struct CollisionResolver {
    reserved: HashSet<PathBuf>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self {
            reserved: HashSet::new(),
        }
    }

    pub fn unique_path(&mut self, dir: &Path, desired_name: &str) -> PathBuf {
        let candidate = dir.join(desired_name);
        if self.is_free(&candidate) {
            self.reserved.insert(candidate.clone());
            return candidate;
        }

        let (stem, ext) = match desired_name.rsplit_once('.') {
            Some((s, e)) if !s.is_empty() => (s, Some(e)),
            _ => (desired_name, None),
        };

        // Keeps counting past -dupN leftovers from earlier runs.
        let mut counter = 1;
        loop {
            let name = match ext {
                Some(ext) => format!("{}-dup{}.{}", stem, counter, ext),
                None => format!("{}-dup{}", stem, counter),
            };
            let candidate = dir.join(name);
            if self.is_free(&candidate) {
                self.reserved.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }

    fn is_free(&self, path: &Path) -> bool {
        !path.exists() && !self.reserved.contains(path)
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}
