use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Reads a display title and a quality indicator out of an audio container.
///
/// Absence is a normal outcome: a malformed or tagless file yields `None`,
/// never an error, so a bad file can only cost itself a metadata title.
pub trait MetadataProbe {
    fn probe_title(&self, path: &Path) -> Option<String>;
    fn probe_quality(&self, path: &Path) -> Option<u32>;
}

/// Probe that never finds anything. Used by the operations that work on
/// filenames alone, and by tests.
pub struct NullProbe;

impl MetadataProbe for NullProbe {
    fn probe_title(&self, _path: &Path) -> Option<String> {
        None
    }

    fn probe_quality(&self, _path: &Path) -> Option<u32> {
        None
    }
}

/// Symphonia-backed probe. Bitrate is derived from file size and decoded
/// duration since most containers do not carry an explicit bitrate tag.
pub struct SymphoniaProbe;

struct ProbedInfo {
    title: Option<String>,
    bitrate: Option<u32>,
}

impl SymphoniaProbe {
    pub fn new() -> Self {
        Self
    }

    fn probe(&self, path: &Path) -> Option<ProbedInfo> {
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) => {
                log::debug!("cannot open {}: {}", path.display(), e);
                return None;
            }
        };
        let size_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = match symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        ) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("format probe failed for {}: {}", path.display(), e);
                return None;
            }
        };

        let mut format = probed.format;
        let mut info = ProbedInfo {
            title: None,
            bitrate: None,
        };

        if let Some(track) = format.default_track() {
            let params = &track.codec_params;
            if let (Some(time_base), Some(n_frames)) = (params.time_base, params.n_frames) {
                let time = time_base.calc_time(n_frames);
                let duration = time.seconds as f64 + time.frac;
                if duration > 0.0 {
                    let bits_per_sec = (size_bytes * 8) as f64 / duration;
                    info.bitrate = Some((bits_per_sec / 1000.0) as u32); // kbps
                }
            }
        }

        if let Some(metadata) = format.metadata().current() {
            for tag in metadata.tags() {
                if matches!(
                    tag.std_key,
                    Some(symphonia::core::meta::StandardTagKey::TrackTitle)
                ) {
                    let value = tag.value.to_string();
                    let value = value.trim();
                    if !value.is_empty() {
                        info.title = Some(value.to_string());
                    }
                }
            }
        }

        Some(info)
    }
}

impl Default for SymphoniaProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProbe for SymphoniaProbe {
    fn probe_title(&self, path: &Path) -> Option<String> {
        self.probe(path).and_then(|info| info.title)
    }

    fn probe_quality(&self, path: &Path) -> Option<u32> {
        self.probe(path).and_then(|info| info.bitrate)
    }
}
