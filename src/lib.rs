//! transcribe - audio file to text
//!
//! Converts MP3/M4A input to WAV when needed and sends the audio to a
//! remote speech recognizer.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod stt;

// Core seam (audio in → text out)
pub use stt::transcriber::{MockTranscriber, Transcriber};

// Pipeline
pub use pipeline::{PipelineOptions, transcribe_file};

// Error handling
pub use error::{Result, TranscribeError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
