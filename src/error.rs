//! Error types for transcribe.
//!
//! Every variant is terminal. [`TranscribeError::exit_code`] maps each one to
//! the process exit status the command line reports.

use thiserror::Error;

/// Usage line printed when the argument count is wrong.
pub const USAGE: &str = "Usage: transcribe <audio_file_path>";

#[derive(Error, Debug)]
pub enum TranscribeError {
    // Command line
    #[error("Usage: transcribe <audio_file_path>")]
    Usage,

    // Configuration errors
    #[error("Failed to parse configuration at {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Could not determine configuration directory")]
    ConfigDirUnavailable,

    // Audio preparation errors
    #[error("Error converting audio to WAV: {message}")]
    Conversion { message: String },

    #[error("Error reading audio file: {message}")]
    AudioRead { message: String },

    // Recognition errors
    #[error("Speech Recognition could not understand audio")]
    UnrecognizedSpeech,

    #[error("Request error: {message}")]
    RecognitionService { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscribeError {
    /// Process exit status for this error.
    ///
    /// `2` conversion/read, `3` unintelligible speech, `4` service failure,
    /// `5` usage. Anything outside that contract (bad config, broken stdout)
    /// exits with `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Conversion { .. } | Self::AudioRead { .. } => 2,
            Self::UnrecognizedSpeech => 3,
            Self::RecognitionService { .. } => 4,
            Self::Usage => 5,
            Self::ConfigParse { .. } | Self::ConfigDirUnavailable | Self::Io(_) => 1,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TranscribeError>;
