//! Input format detection.
//!
//! The extension is inspected once at entry and turned into a
//! [`SourceFormat`]; everything downstream matches on that instead of
//! comparing strings.

use std::fmt;
use std::path::Path;

/// Compressed codecs that must be transcoded before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// MPEG-1/2 Layer III.
    Mp3,
    /// AAC inside an MP4 container.
    M4a,
}

impl Codec {
    /// File extension used as a demuxer hint.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Mp3 => "mp3",
            Codec::M4a => "m4a",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// How an input file reaches the waveform loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Handed to the loader as-is.
    Raw,
    /// Transcoded to a temporary WAV first.
    NeedsDecode(Codec),
}

impl SourceFormat {
    /// Classify a path by its (case-insensitive) extension.
    ///
    /// Only `.mp3` and `.m4a` are converted. Anything else, including a
    /// missing extension, is treated as waveform data and left for the
    /// loader to accept or reject.
    pub fn detect(path: &Path) -> Self {
        match extension_lowercase(path).as_deref() {
            Some("mp3") => SourceFormat::NeedsDecode(Codec::Mp3),
            Some("m4a") => SourceFormat::NeedsDecode(Codec::M4a),
            _ => SourceFormat::Raw,
        }
    }
}

/// Lower-cased extension without the leading dot.
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Whether the extension is one the loader is expected to read directly.
pub fn is_waveform_extension(path: &Path) -> bool {
    matches!(
        extension_lowercase(path).as_deref(),
        Some("wav") | Some("wave")
    )
}
