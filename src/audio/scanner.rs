use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::audio::metadata::MetadataProbe;
use crate::{AudioFileRef, OrganizeError, Result};

pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "m4a", "m4b", "flac", "wav", "ogg", "aac"];

pub fn default_extension_list() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

/// Read-only directory walker that turns matching files into `AudioFileRef`s.
pub struct Scanner {
    extensions: HashSet<String>,
    recursive: bool,
}

impl Scanner {
    pub fn new(extensions: &[String], recursive: bool) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            recursive,
        }
    }

    pub fn with_default_extensions(recursive: bool) -> Self {
        Self::new(&default_extension_list(), recursive)
    }

    /// Scans every root and returns the matches sorted by path.
    ///
    /// Fails with `InvalidRoot` before listing anything if a root does not
    /// exist or is not a directory.
    pub fn scan(&self, roots: &[PathBuf], probe: &dyn MetadataProbe) -> Result<Vec<AudioFileRef>> {
        for root in roots {
            if !root.is_dir() {
                return Err(OrganizeError::InvalidRoot(root.clone()));
            }
        }

        let mut files = Vec::new();
        for root in roots {
            log::info!("scanning {}", root.display());
            files.extend(self.scan_root(root, probe));
        }

        // Deterministic planning order regardless of directory iteration order.
        files.sort_by(|a, b| a.path.cmp(&b.path));
        log::info!("found {} audio files", files.len());
        Ok(files)
    }

    fn scan_root(&self, root: &Path, probe: &dyn MetadataProbe) -> Vec<AudioFileRef> {
        let mut walker = walkdir::WalkDir::new(root).follow_links(true);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("error accessing entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| self.build_ref(e.path(), probe))
            .collect()
    }

    fn build_ref(&self, path: &Path, probe: &dyn MetadataProbe) -> Option<AudioFileRef> {
        let extension = path.extension().and_then(|e| e.to_str())?.to_lowercase();
        if !self.extensions.contains(&extension) {
            log::debug!("skipping non-audio file: {}", path.display());
            return None;
        }

        let size_bytes = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("cannot stat {}: {}", path.display(), e);
                return None;
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());

        let title_raw = probe.probe_title(path);
        let title_display = title_raw.clone().unwrap_or(stem);
        let bitrate = probe.probe_quality(path);

        Some(AudioFileRef {
            path: path.to_path_buf(),
            extension,
            size_bytes,
            title_raw,
            title_display,
            bitrate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::metadata::NullProbe;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn invalid_root_is_fatal() {
        let scanner = Scanner::with_default_extensions(true);
        let result = scanner.scan(&[PathBuf::from("/no/such/dir")], &NullProbe);
        assert!(matches!(result, Err(OrganizeError::InvalidRoot(_))));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.MP3"));
        touch(&dir.path().join("b.flac"));
        touch(&dir.path().join("notes.txt"));

        let scanner = Scanner::with_default_extensions(true);
        let files = scanner.scan(&[dir.path().to_path_buf()], &NullProbe).unwrap();

        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.MP3".to_string(), "b.flac".to_string()]);
        assert_eq!(files[0].extension, "mp3");
    }

    #[test]
    fn non_recursive_scan_stops_at_direct_children() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("top.mp3"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub/deep.mp3"));

        let scanner = Scanner::with_default_extensions(false);
        let files = scanner.scan(&[dir.path().to_path_buf()], &NullProbe).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "top.mp3");
    }

    #[test]
    fn title_falls_back_to_stem() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Some Song.mp3"));

        let scanner = Scanner::with_default_extensions(true);
        let files = scanner.scan(&[dir.path().to_path_buf()], &NullProbe).unwrap();

        assert_eq!(files[0].title_display, "Some Song");
        assert!(files[0].title_is_fallback());
    }
}
