use std::path::{Path, PathBuf};

/// Path prefixes the cleanup phase must never delete.
///
/// The root itself is always protected; extra prefixes shield whole subtrees.
/// Consulted only for deletions, never for moves or renames.
#[derive(Debug, Clone)]
pub struct ProtectedPrefixSet {
    root: PathBuf,
    prefixes: Vec<PathBuf>,
}

impl ProtectedPrefixSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefixes: Vec::new(),
        }
    }

    pub fn add_prefix(&mut self, prefix: impl Into<PathBuf>) {
        self.prefixes.push(prefix.into());
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_protected(&self, path: &Path) -> bool {
        path == self.root || self.prefixes.iter().any(|p| path.starts_with(p))
    }

    /// True when a protected prefix lies somewhere under `dir`. A recursive
    /// delete of such a directory would take the protected tree with it.
    pub fn has_protected_descendant(&self, dir: &Path) -> bool {
        self.prefixes.iter().any(|p| p.starts_with(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_always_protected() {
        let set = ProtectedPrefixSet::new("/music");
        assert!(set.is_protected(Path::new("/music")));
        assert!(!set.is_protected(Path::new("/music/old")));
    }

    #[test]
    fn configured_prefix_shields_its_subtree() {
        let mut set = ProtectedPrefixSet::new("/music");
        set.add_prefix("/music/keep");

        assert!(set.is_protected(Path::new("/music/keep")));
        assert!(set.is_protected(Path::new("/music/keep/nested/deep")));
        assert!(!set.is_protected(Path::new("/music/other")));
    }

    #[test]
    fn ancestor_of_protected_prefix_is_flagged() {
        let mut set = ProtectedPrefixSet::new("/music");
        set.add_prefix("/music/a/b/keep");

        assert!(set.has_protected_descendant(Path::new("/music/a")));
        assert!(set.has_protected_descendant(Path::new("/music/a/b")));
        assert!(!set.has_protected_descendant(Path::new("/music/c")));
    }
}
